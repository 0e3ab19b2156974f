//! # billboard-particles
//!
//! CPU particle pools rebuilt into camera-facing billboard geometry every
//! frame.
//!
//! A [`ParticlePool`] spawns, ages, recycles and drifts a fixed-capacity set
//! of particles. A [`GeometryBuilder`] turns the live set into flat position,
//! index, color, texture-coordinate and normal arrays, two triangles per
//! particle, sized exactly to the live count. [`ParticleSystem`] drives both
//! and hands the result to a renderer through [`MeshSink`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use billboard_particles::prelude::*;
//!
//! let context = LocalRenderContext::new();
//! let mut mesh = CpuMesh::new();
//! let camera = OrbitCamera::new();
//!
//! let mut system = ParticleSystem::new();
//! system.create(ParticleTemplate::snow())?;
//!
//! for _ in 0..600 {
//!     let basis = camera.basis();
//!     system.tick(1.0 / 60.0, &basis);
//!     system.gather(&context, 0, &basis, &mut mesh);
//! }
//!
//! println!("{} quads", mesh.buffers().quad_count());
//! ```
//!
//! ## Core Concepts
//!
//! ### Templates
//!
//! [`ParticleTemplate`] holds rate, speed, lifetime, looping, size, texture
//! and color. Capacity is `floor(duration * rate)`. Templates load from and
//! save to JSON.
//!
//! ### Advancing
//!
//! Each [`ParticlePool::advance`] call ages particles, respawns expired ones
//! in place, applies drift, swirl and a size pulse, grows a looping pool
//! toward capacity, and turns every billboard to the camera.
//!
//! ### Geometry
//!
//! | Buffer | Per particle | When |
//! |--------|--------------|------|
//! | positions | 12 floats | always |
//! | indices | 6 | always |
//! | colors | 12 floats | color output on |
//! | tex coords | 8 floats | template has a texture |
//! | normals | 12 floats (zero) | template has a texture |
//!
//! ### Render context
//!
//! [`ParticleSystem::gather`] rebuilds geometry under a
//! [`RenderContextGuard`], so the renderer never observes a half-written
//! buffer.

pub mod camera;
pub mod error;
pub mod geometry;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod lifecycle;
pub mod mesh;
mod particle;
mod pool;
pub mod render_context;
pub mod spawn;
pub mod system;
pub mod template;
mod transform;

pub use camera::{CameraBasis, OrbitCamera};
pub use error::{InvalidField, TemplateError};
pub use geometry::{Capabilities, GeometryBuffers, GeometryBuilder, IndexRange};
pub use glam::{Vec2, Vec3};
pub use mesh::{CpuMesh, MaterialBinding, MeshSink, Technique};
pub use particle::Particle;
pub use pool::{AdvanceStats, ParticlePool};
pub use render_context::{LocalRenderContext, RenderContext, RenderContextGuard};
pub use spawn::SpawnSample;
pub use system::{AdvancePolicy, ParticleSystem, SystemState, GATHER_STEP};
pub use template::{ParticleTemplate, Shape};
pub use transform::Transform;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use billboard_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::{CameraBasis, OrbitCamera};
    pub use crate::geometry::{Capabilities, GeometryBuffers, GeometryBuilder, IndexRange};
    pub use crate::mesh::{CpuMesh, MaterialBinding, MeshSink, Technique};
    pub use crate::pool::ParticlePool;
    pub use crate::render_context::{LocalRenderContext, RenderContext, RenderContextGuard};
    pub use crate::system::{AdvancePolicy, ParticleSystem, SystemState, GATHER_STEP};
    pub use crate::template::{ParticleTemplate, Shape};
    pub use crate::transform::Transform;
    pub use crate::{Vec2, Vec3};
}
