//! Rigid transform used to place and orient billboards.

use glam::{Mat4, Vec3};

/// Position plus an orthonormal orientation basis.
///
/// Axes follow the engine convention: `right` is +U, `up` is +V and
/// `forward` is +N.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        right: Vec3::X,
        up: Vec3::Y,
        forward: Vec3::Z,
    };

    /// Identity orientation at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Return a copy placed at `position` with the same orientation.
    #[inline]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    #[inline]
    pub fn move_left(&mut self, distance: f32) {
        self.position -= self.right * distance;
    }

    #[inline]
    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up * distance;
    }

    #[inline]
    pub fn move_down(&mut self, distance: f32) {
        self.position -= self.up * distance;
    }

    /// Column-major matrix with the basis in the first three columns.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            self.forward.extend(0.0),
            self.position.extend(1.0),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
