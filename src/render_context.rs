//! Render context ownership.
//!
//! Renderer-visible buffers may only be rewritten while the caller owns the
//! render context. Ownership is taken through [`RenderContextGuard`], which
//! releases it on drop so every exit path, including unwinding, gives the
//! context back.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Exclusive-access token provider for the shared rendering context.
///
/// `mask` identifies the calling thread to engines that track ownership per
/// thread; implementations are free to ignore it.
pub trait RenderContext {
    fn acquire(&self, mask: u32);
    fn release(&self, mask: u32);
}

impl<T: RenderContext + ?Sized> RenderContext for &T {
    fn acquire(&self, mask: u32) {
        (**self).acquire(mask)
    }

    fn release(&self, mask: u32) {
        (**self).release(mask)
    }
}

/// Scoped ownership of a [`RenderContext`].
#[must_use = "the render context is released as soon as the guard is dropped"]
pub struct RenderContextGuard<'a, C: RenderContext + ?Sized> {
    context: &'a C,
    mask: u32,
}

impl<'a, C: RenderContext + ?Sized> RenderContextGuard<'a, C> {
    /// Acquire `context` until the returned guard is dropped.
    pub fn acquire(context: &'a C, mask: u32) -> Self {
        context.acquire(mask);
        Self { context, mask }
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }
}

impl<C: RenderContext + ?Sized> Drop for RenderContextGuard<'_, C> {
    fn drop(&mut self) {
        self.context.release(self.mask);
    }
}

/// In-process render context backed by a mutex and condition variable.
///
/// Suitable when the renderer and the particle update share an address space
/// and nothing else arbitrates access. `acquire` blocks while another caller
/// owns the context.
#[derive(Debug, Default)]
pub struct LocalRenderContext {
    owned: Mutex<bool>,
    released: Condvar,
    acquisitions: AtomicUsize,
}

impl LocalRenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether some caller currently owns the context.
    pub fn is_owned(&self) -> bool {
        *self.owned.lock()
    }

    /// How many times ownership has been taken.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::Relaxed)
    }
}

impl RenderContext for LocalRenderContext {
    fn acquire(&self, _mask: u32) {
        let mut owned = self.owned.lock();
        while *owned {
            self.released.wait(&mut owned);
        }
        *owned = true;
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    fn release(&self, _mask: u32) {
        *self.owned.lock() = false;
        self.released.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_guard_releases_on_drop() {
        let context = LocalRenderContext::new();
        {
            let guard = RenderContextGuard::acquire(&context, 1);
            assert_eq!(guard.mask(), 1);
            assert!(context.is_owned());
        }
        assert!(!context.is_owned());
        assert_eq!(context.acquisitions(), 1);
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let context = LocalRenderContext::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RenderContextGuard::acquire(&context, 0);
            panic!("rebuild failed");
        }));
        assert!(result.is_err());
        assert!(!context.is_owned());

        let _guard = RenderContextGuard::acquire(&context, 0);
        assert_eq!(context.acquisitions(), 2);
    }

    #[test]
    fn test_second_owner_waits() {
        let context = Arc::new(LocalRenderContext::new());
        let guard = RenderContextGuard::acquire(context.as_ref(), 0);

        let other = Arc::clone(&context);
        let handle = thread::spawn(move || {
            let _guard = RenderContextGuard::acquire(other.as_ref(), 1);
            other.acquisitions()
        });

        thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(context.acquisitions(), 1);
        drop(guard);

        assert_eq!(handle.join().unwrap(), 2);
        assert!(!context.is_owned());
    }
}
