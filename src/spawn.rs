//! Randomized spawn routine.
//!
//! Initialization, respawn and looping growth all place new particles through
//! [`spawn_sample`], so the three paths always share one distribution. The
//! random source is passed in; seed a [`SmallRng`] for reproducible runs.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Maximum vertical offset above the base position.
pub const SPAWN_HEIGHT: f32 = 0.5;

/// Position and unit velocity for a freshly spawned particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSample {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Sample a spawn point on a disc around `base` and a downward velocity.
///
/// Horizontal offset is `(cos θ · radius · r, sin θ · radius · r)` on X/Z with
/// `r ∈ [0, 1)` and `θ ∈ [0, 2π)`. Vertical offset is uniform in
/// `[0, SPAWN_HEIGHT)`.
pub fn spawn_sample<R: Rng + ?Sized>(rng: &mut R, base: Vec3, radius: f32) -> SpawnSample {
    let r: f32 = rng.gen();
    let theta = rng.gen_range(0.0..TAU);
    let y_offset = rng.gen_range(0.0..SPAWN_HEIGHT);

    let position = base
        + Vec3::new(
            theta.cos() * radius * r,
            y_offset,
            theta.sin() * radius * r,
        );

    SpawnSample {
        position,
        velocity: random_velocity(rng),
    }
}

/// Random unit vector pointing mostly sideways and always slightly down.
///
/// Horizontal components are uniform in `[-1, 1]`, the vertical component is
/// uniform in `[-0.2, -0.1]`, then the vector is normalized.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let rx = rng.gen_range(-1.0..=1.0);
    let rz = rng.gen_range(-1.0..=1.0);
    let vy = rng.gen_range(-0.2..=-0.1);
    // vy is never zero, so the vector always normalizes
    Vec3::new(rx, vy, rz).normalize()
}

/// Deterministic RNG for tests and replays.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// RNG seeded from the operating system.
pub fn entropy_rng() -> SmallRng {
    SmallRng::from_entropy()
}
