//! Camera orientation used for billboarding.
//!
//! Particles never look up an active camera themselves. The host reads the
//! camera once per refresh into a [`CameraBasis`] and passes it to
//! [`ParticlePool::advance`](crate::ParticlePool::advance).

use glam::{Mat4, Vec3};

/// Forward/right/up vectors of the active camera, read once per refresh.
///
/// Every billboard in a pool takes this exact basis; there is no
/// per-particle distance or facing check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    /// Camera looking down +Z with +X right and +Y up.
    pub const IDENTITY: Self = Self {
        forward: Vec3::Z,
        right: Vec3::X,
        up: Vec3::Y,
    };

    /// Basis of a camera at `eye` looking at `target`.
    ///
    /// Falls back to [`CameraBasis::IDENTITY`] when `eye == target` or the
    /// view direction is parallel to `world_up`.
    pub fn look_at(eye: Vec3, target: Vec3, world_up: Vec3) -> Self {
        let forward = (target - eye).normalize_or_zero();
        let right = forward.cross(world_up).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let up = right.cross(forward);
        Self { forward, right, up }
    }

    /// Extract the basis from a right-handed view matrix.
    pub fn from_view_matrix(view: Mat4) -> Self {
        let world = view.inverse();
        Self {
            forward: -world.z_axis.truncate().normalize_or_zero(),
            right: world.x_axis.truncate().normalize_or_zero(),
            up: world.y_axis.truncate().normalize_or_zero(),
        }
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A camera circling a point, used by the demo and tests to drive billboards
/// from a moving viewpoint.
///
/// Angles are in radians. At `yaw = 0` the camera sits on +Z of `target`;
/// positive `pitch` lifts it above the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl OrbitCamera {
    /// Three units out, slightly above the emitter at the origin.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 3.0,
            target: Vec3::ZERO,
        }
    }

    /// Advance around the target by `radians` of yaw.
    pub fn orbit(&mut self, radians: f32) {
        self.yaw = (self.yaw + radians) % std::f32::consts::TAU;
    }

    /// Eye position on the orbit sphere.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        self.target + offset * self.distance
    }

    /// Right-handed view matrix, for renderers that want one alongside the basis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// The orientation every billboard takes this frame.
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::look_at(self.position(), self.target, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
