//! GPU upload for particle geometry.
//!
//! Enabled with the `gpu` cargo feature. [`GpuMesh`] implements
//! [`MeshSink`](crate::MeshSink) on top of wgpu. Each attribute gets a buffer
//! the first time it carries data; later builds rewrite it in place and grow
//! it when the particle count outgrows the allocation.

mod mesh;

pub use mesh::GpuMesh;
