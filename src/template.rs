//! Particle spawn configuration.
//!
//! A [`ParticleTemplate`] is supplied once when a particle system is
//! configured and never mutated afterwards. It can be built in code, taken
//! from a preset, or loaded from JSON:
//!
//! ```ignore
//! let snow = ParticleTemplate::snow();
//! snow.save("snow.json")?;
//!
//! let loaded = ParticleTemplate::load("snow.json")?;
//! assert_eq!(loaded, snow);
//! ```

use crate::error::{InvalidField, TemplateError};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Spawn shape tag.
///
/// Carried through configuration but not read by the simulation; every
/// particle spawns on a disc regardless of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    Cone,
    #[default]
    Sphere,
}

/// Largest accepted spawn rate, the range of a signed 16-bit count.
pub const MAX_RATE: u32 = i16::MAX as u32;

/// Largest accepted pool capacity.
pub const MAX_CAPACITY: usize = 1 << 20;

fn default_spawn_radius() -> f32 {
    0.5
}

/// Immutable spawn configuration for one particle system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTemplate {
    /// Particles spawned per second.
    pub rate: u32,
    /// Multiplier on each particle's unit velocity.
    pub speed: f32,
    /// Particle lifetime in seconds.
    pub duration: f32,
    /// Keep growing the pool toward capacity as time advances.
    pub looping: bool,
    /// Base billboard size (width, height).
    pub size: Vec2,
    pub shape: Shape,
    /// Texture identifier. Empty means untextured.
    pub texture: String,
    /// Base RGB color, each channel 0.0-1.0.
    pub color: Vec3,
    /// Radius of the spawn disc around the base position.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
}

impl Default for ParticleTemplate {
    fn default() -> Self {
        Self {
            rate: 80,
            speed: 0.05,
            duration: 8.0,
            looping: true,
            size: Vec2::new(0.02, 0.02),
            shape: Shape::Sphere,
            texture: String::new(),
            color: Vec3::new(0.9, 0.95, 0.8),
            spawn_radius: default_spawn_radius(),
        }
    }
}

impl ParticleTemplate {
    /// Create a template with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Snow preset: slow, pale, long-lived flakes.
    pub fn snow() -> Self {
        Self {
            rate: 120,
            speed: 0.04,
            duration: 10.0,
            size: Vec2::new(0.025, 0.025),
            color: Vec3::new(0.95, 0.97, 1.0),
            spawn_radius: 1.0,
            ..Default::default()
        }
    }

    /// Ash preset: dim grey specks that fall a little faster.
    pub fn ash() -> Self {
        Self {
            rate: 60,
            speed: 0.12,
            duration: 5.0,
            size: Vec2::new(0.015, 0.015),
            color: Vec3::new(0.35, 0.33, 0.3),
            ..Default::default()
        }
    }

    /// Pollen preset: warm, short-lived motes in a tight disc.
    pub fn pollen() -> Self {
        Self {
            rate: 40,
            speed: 0.02,
            duration: 4.0,
            size: Vec2::new(0.01, 0.01),
            color: Vec3::new(1.0, 0.85, 0.3),
            spawn_radius: 0.25,
            ..Default::default()
        }
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    /// Set the spawn rate in particles per second.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the velocity multiplier.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the particle lifetime in seconds.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Enable or disable growth toward capacity.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set the base billboard size.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Set the texture identifier.
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }

    /// Set the base color.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Set the spawn disc radius.
    pub fn with_spawn_radius(mut self, radius: f32) -> Self {
        self.spawn_radius = radius;
        self
    }

    // =========================================================================
    // DERIVED VALUES
    // =========================================================================

    /// Maximum number of live particles, `floor(duration * rate)`.
    ///
    /// Never negative: a zero, negative or non-finite product yields 0.
    pub fn capacity(&self) -> usize {
        let product = (self.duration * self.rate as f32).floor();
        if product.is_finite() && product > 0.0 {
            product as usize
        } else {
            0
        }
    }

    /// Whether the template names a texture.
    pub fn has_texture(&self) -> bool {
        !self.texture.is_empty()
    }

    /// Check that every numeric field is usable and the pool it sizes is
    /// bounded.
    pub fn validate(&self) -> Result<(), InvalidField> {
        fn non_negative(v: f32) -> bool {
            v.is_finite() && v >= 0.0
        }

        if self.rate > MAX_RATE {
            return Err(InvalidField::Rate);
        }
        if !non_negative(self.speed) {
            return Err(InvalidField::Speed);
        }
        if !non_negative(self.duration) {
            return Err(InvalidField::Duration);
        }
        if self.capacity() > MAX_CAPACITY {
            return Err(InvalidField::Capacity);
        }
        if !non_negative(self.size.x) || !non_negative(self.size.y) {
            return Err(InvalidField::Size);
        }
        if !self.color.to_array().iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(InvalidField::Color);
        }
        if !non_negative(self.spawn_radius) {
            return Err(InvalidField::SpawnRadius);
        }
        Ok(())
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Save the template as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TemplateError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a template from JSON.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a template from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(ParticleTemplate::default().capacity(), 640);
    }

    #[test]
    fn test_capacity_rounds_down() {
        let t = ParticleTemplate::new().with_rate(10).with_duration(2.55);
        assert_eq!(t.capacity(), 25);
    }

    #[test]
    fn test_capacity_never_negative() {
        let t = ParticleTemplate::new().with_duration(-3.0);
        assert_eq!(t.capacity(), 0);

        let t = ParticleTemplate::new().with_rate(0);
        assert_eq!(t.capacity(), 0);

        let t = ParticleTemplate::new().with_duration(f32::NAN);
        assert_eq!(t.capacity(), 0);
    }

    #[test]
    fn test_has_texture() {
        assert!(!ParticleTemplate::default().has_texture());
        assert!(ParticleTemplate::default().with_texture("flake.dds").has_texture());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert_eq!(
            ParticleTemplate::new().with_duration(-1.0).validate(),
            Err(InvalidField::Duration)
        );
        assert_eq!(
            ParticleTemplate::new().with_speed(f32::INFINITY).validate(),
            Err(InvalidField::Speed)
        );
        assert_eq!(
            ParticleTemplate::new().with_color(Vec3::new(1.5, 0.0, 0.0)).validate(),
            Err(InvalidField::Color)
        );
        assert_eq!(
            ParticleTemplate::new().with_size(Vec2::new(-0.1, 0.1)).validate(),
            Err(InvalidField::Size)
        );
        assert!(ParticleTemplate::snow().validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_pool_size() {
        assert_eq!(
            ParticleTemplate::new().with_rate(MAX_RATE + 1).validate(),
            Err(InvalidField::Rate)
        );
        assert!(ParticleTemplate::new().with_rate(MAX_RATE).with_duration(8.0).validate().is_ok());
        assert_eq!(
            ParticleTemplate::new().with_rate(MAX_RATE).with_duration(1.0e6).validate(),
            Err(InvalidField::Capacity)
        );

        let err = ParticleTemplate::from_json(r#"{ "rate": 4000000000 }"#).unwrap_err();
        assert!(matches!(err, TemplateError::Invalid(InvalidField::Rate)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = ParticleTemplate::from_json(r#"{ "rate": 10, "duration": 2.0 }"#).unwrap();
        assert_eq!(t.rate, 10);
        assert_eq!(t.duration, 2.0);
        assert_eq!(t.spawn_radius, 0.5);
        assert!(t.looping);
    }

    #[test]
    fn test_json_rejects_invalid_template() {
        let err = ParticleTemplate::from_json(r#"{ "duration": -2.0 }"#).unwrap_err();
        assert!(matches!(err, TemplateError::Invalid(InvalidField::Duration)));
    }

    #[test]
    fn test_json_rejects_garbage() {
        let err = ParticleTemplate::from_json("not json").unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)));
    }
}
