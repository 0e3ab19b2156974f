//! Particle system driver.
//!
//! [`ParticleSystem`] ties a [`ParticlePool`] to a [`GeometryBuilder`] and a
//! [`MeshSink`], and tracks where it is in its lifecycle:
//!
//! ```text
//! Uninitialized --create--> Created --gather--> Loaded --gather--> Refreshing
//!                                                                   |    ^
//!                                                                   +----+
//! ```
//!
//! The host calls [`tick`](ParticleSystem::tick) once per frame and
//! [`gather`](ParticleSystem::gather) when collecting draw calls. `gather`
//! rebuilds geometry while holding the render context.
//!
//! # Example
//!
//! ```ignore
//! let context = LocalRenderContext::new();
//! let mut mesh = CpuMesh::new();
//! let mut system = ParticleSystem::new();
//! system.create(ParticleTemplate::snow())?;
//!
//! loop {
//!     let camera = orbit.basis();
//!     system.tick(frame_seconds, &camera);
//!     system.gather(&context, 0, &camera, &mut mesh);
//! }
//! ```

use crate::camera::CameraBasis;
use crate::error::InvalidField;
use crate::geometry::{Capabilities, GeometryBuffers, GeometryBuilder};
use crate::mesh::{MaterialBinding, MeshSink};
use crate::pool::{AdvanceStats, ParticlePool};
use crate::render_context::{RenderContext, RenderContextGuard};
use crate::spawn;
use crate::template::ParticleTemplate;
use crate::transform::Transform;

/// Fixed step used when the draw-gather phase advances the pool.
pub const GATHER_STEP: f32 = 1.0 / 60.0;

/// Lifecycle of a [`ParticleSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemState {
    /// No pool yet.
    #[default]
    Uninitialized,
    /// Pool exists, no geometry has been built.
    Created,
    /// Geometry built once and the mesh created.
    Loaded,
    /// Advancing and rebuilding every cycle.
    Refreshing,
}

/// Which entry points advance the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvancePolicy {
    /// Only [`ParticleSystem::tick`] advances.
    #[default]
    TickOnly,
    /// `tick` advances by the frame time and `gather` advances again by
    /// [`GATHER_STEP`]. Motion is integrated twice per rendered frame.
    TickAndGather,
}

/// A configured particle emitter plus its render geometry.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    offset: Transform,
    pool: Option<ParticlePool>,
    builder: GeometryBuilder,
    caps: Capabilities,
    color_output: bool,
    state: SystemState,
    policy: AdvancePolicy,
    seed: Option<u64>,
    last_count: Option<usize>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            offset: Transform::IDENTITY,
            pool: None,
            builder: GeometryBuilder::new(),
            caps: Capabilities::default(),
            color_output: true,
            state: SystemState::Uninitialized,
            policy: AdvancePolicy::default(),
            seed: None,
            last_count: None,
        }
    }

    /// Place the spawn base relative to the owning node.
    pub fn with_offset(mut self, offset: Transform) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_policy(mut self, policy: AdvancePolicy) -> Self {
        if policy == AdvancePolicy::TickAndGather {
            log::debug!("gather advances by {GATHER_STEP}s on top of tick; motion is double-integrated");
        }
        self.policy = policy;
        self
    }

    /// Seed the pool's RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable the color buffer. Enabled by default.
    pub fn with_color_output(mut self, enabled: bool) -> Self {
        self.color_output = enabled;
        self
    }

    /// Validate `template` and build the pool from it.
    ///
    /// Calling this again replaces the pool. A mesh that was already created
    /// keeps its material and receives the new geometry as an update. An
    /// invalid template leaves the system unchanged.
    pub fn create(&mut self, template: ParticleTemplate) -> Result<(), InvalidField> {
        if let Err(field) = template.validate() {
            log::error!("rejecting particle template: {field}");
            return Err(field);
        }

        log::info!(
            "creating particle system: rate {}, duration {}s, capacity {}",
            template.rate,
            template.duration,
            template.capacity()
        );

        self.caps = Capabilities::new(template.has_texture(), self.color_output);
        let rng = match self.seed {
            Some(seed) => spawn::seeded_rng(seed),
            None => spawn::entropy_rng(),
        };
        self.pool = Some(ParticlePool::with_rng(template, self.offset, rng));

        if self.state == SystemState::Uninitialized {
            self.state = SystemState::Created;
        }
        Ok(())
    }

    /// Advance the pool by `dt` seconds. Does nothing before [`create`](Self::create).
    pub fn tick(&mut self, dt: f32, camera: &CameraBasis) -> Option<AdvanceStats> {
        let pool = self.pool.as_mut()?;
        Some(pool.advance(dt, camera))
    }

    /// [`tick`](Self::tick) with an engine frame time in milliseconds.
    pub fn tick_millis(&mut self, frame_ms: f32, camera: &CameraBasis) -> Option<AdvanceStats> {
        self.tick(frame_ms / 1000.0, camera)
    }

    /// Turn billboards to `camera`, then rebuild geometry and hand it to
    /// `sink` while owning `context`.
    ///
    /// The first call creates the mesh; later calls update it. Returns the
    /// rebuilt buffers, or `None` before [`create`](Self::create).
    pub fn gather<C, S>(
        &mut self,
        context: &C,
        mask: u32,
        camera: &CameraBasis,
        sink: &mut S,
    ) -> Option<&GeometryBuffers>
    where
        C: RenderContext + ?Sized,
        S: MeshSink + ?Sized,
    {
        let Some(pool) = self.pool.as_mut() else {
            log::debug!("gather skipped: particle system not created");
            return None;
        };

        if self.policy == AdvancePolicy::TickAndGather {
            pool.advance(GATHER_STEP, camera);
        } else {
            pool.face(camera);
        }
        let pool = &*pool;

        let count = pool.len();
        if self.last_count != Some(count) {
            log::debug!("particle count changed: {:?} -> {}", self.last_count, count);
            self.last_count = Some(count);
        }

        let guard = RenderContextGuard::acquire(context, mask);
        let buffers = self.builder.rebuild(pool, self.caps);
        match self.state {
            SystemState::Created | SystemState::Uninitialized => {
                let material = MaterialBinding::for_template(pool.template(), self.caps.has_color);
                log::debug!("creating particle mesh: {} vertices, {:?}", buffers.vertex_count(), material);
                sink.create(buffers, &material);
                self.state = SystemState::Loaded;
            }
            SystemState::Loaded | SystemState::Refreshing => {
                sink.update(buffers);
                self.state = SystemState::Refreshing;
            }
        }
        drop(guard);

        Some(self.builder.buffers())
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    /// Optional buffers filled on each rebuild.
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn pool(&self) -> Option<&ParticlePool> {
        self.pool.as_ref()
    }

    pub fn pool_mut(&mut self) -> Option<&mut ParticlePool> {
        self.pool.as_mut()
    }

    /// Buffers from the last [`gather`](Self::gather).
    pub fn buffers(&self) -> &GeometryBuffers {
        self.builder.buffers()
    }

    pub fn offset(&self) -> &Transform {
        &self.offset
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
