//! A single simulated particle.

use crate::spawn::SpawnSample;
use crate::template::ParticleTemplate;
use crate::transform::Transform;
use glam::{Vec2, Vec3};

/// One billboard in a [`ParticlePool`](crate::ParticlePool).
///
/// `age` is never negative. Once it reaches `duration` the particle is
/// respawned in place on the next advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position plus billboard orientation.
    pub transform: Transform,
    /// Current render size (width, height).
    pub size: Vec2,
    /// Seconds since spawn.
    pub age: f32,
    /// Lifetime copied from the template at spawn.
    pub duration: f32,
    /// Unit direction of drift.
    pub velocity: Vec3,
}

impl Particle {
    /// Build a particle at `sample` with the template's size and duration.
    pub fn spawn(template: &ParticleTemplate, base: &Transform, sample: SpawnSample, age: f32) -> Self {
        Self {
            transform: base.with_position(sample.position),
            size: template.size,
            age,
            duration: template.duration,
            velocity: sample.velocity,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Whether the particle is due for respawn.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.duration
    }

    /// Normalized age, clamped to `0.0..=1.0`.
    #[inline]
    pub fn age_fraction(&self) -> f32 {
        crate::lifecycle::age_fraction(self.age, self.duration)
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            size: Vec2::new(0.1, 0.1),
            age: 0.0,
            duration: 1.0,
            velocity: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_copies_template() {
        let template = ParticleTemplate::new()
            .with_duration(3.0)
            .with_size(Vec2::new(0.2, 0.4));
        let sample = SpawnSample {
            position: Vec3::new(1.0, 0.0, 0.0),
            velocity: Vec3::NEG_Y,
        };
        let p = Particle::spawn(&template, &Transform::IDENTITY, sample, 0.0);

        assert_eq!(p.duration, 3.0);
        assert_eq!(p.size, Vec2::new(0.2, 0.4));
        assert_eq!(p.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let mut p = Particle::default();
        p.age = p.duration;
        assert!(p.is_expired());
        assert_eq!(p.age_fraction(), 1.0);
    }
}
