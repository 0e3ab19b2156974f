//! Per-particle lifetime curves.
//!
//! Pure functions of a particle's age, shared by the pool (motion and size)
//! and the geometry builder (color).
//!
//! | Curve | Input | Shape |
//! |-------|-------|-------|
//! | [`brightness`] | age fraction | fade in over 20%, hold, fade out over the last 30% |
//! | [`size_pulse`] | age (s) | `1 + 0.05 sin(2 age)` |
//! | [`swirl`] | age (s), slot index | horizontal circle, phase offset per slot |

use glam::{Vec2, Vec3};

/// Scale applied to all per-frame displacement.
pub const MOVE_SCALE: f32 = 0.02;
/// Swirl amplitude before [`MOVE_SCALE`].
pub const SWIRL_STRENGTH: f32 = 0.1;
/// Swirl angular speed in radians per second of age.
pub const SWIRL_SPEED: f32 = 1.0;
/// Phase offset between neighbouring slots.
pub const SWIRL_SLOT_PHASE: f32 = 0.37;
/// Relative size oscillation.
pub const PULSE_AMPLITUDE: f32 = 0.05;
/// Size oscillation frequency in radians per second of age.
pub const PULSE_FREQUENCY: f32 = 2.0;

const FADE_IN_END: f32 = 0.2;
const FADE_OUT_START: f32 = 0.7;

/// `age / duration` clamped to `0.0..=1.0`.
///
/// A zero or negative duration counts as fully aged.
#[inline]
pub fn age_fraction(age: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    let t = age / duration;
    if t.is_nan() {
        return 1.0;
    }
    t.clamp(0.0, 1.0)
}

/// Brightness envelope over a normalized lifetime.
///
/// Ramps 0 → 1 over `[0, 0.2]`, holds 1 over `[0.2, 0.7]`, ramps 1 → 0 over
/// `[0.7, 1]`. Input is clamped first.
pub fn brightness(t: f32) -> f32 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    let b = if t < FADE_IN_END {
        t / FADE_IN_END
    } else if t > FADE_OUT_START {
        (1.0 - t) / (1.0 - FADE_OUT_START)
    } else {
        1.0
    };
    b.max(0.0)
}

/// Size multiplier at a given age.
#[inline]
pub fn size_pulse(age: f32) -> f32 {
    1.0 + PULSE_AMPLITUDE * (age * PULSE_FREQUENCY).sin()
}

/// Base size modulated by [`size_pulse`].
#[inline]
pub fn pulsed_size(base: Vec2, age: f32) -> Vec2 {
    base * size_pulse(age)
}

/// Swirl displacement for one step of `dt` seconds.
pub fn swirl(age: f32, slot: usize, dt: f32) -> Vec3 {
    let phase = SWIRL_SPEED * age + slot as f32 * SWIRL_SLOT_PHASE;
    Vec3::new(phase.cos(), 0.0, phase.sin()) * (SWIRL_STRENGTH * dt * MOVE_SCALE)
}

/// Straight-line displacement for one step of `dt` seconds.
#[inline]
pub fn drift(velocity: Vec3, speed: f32, dt: f32) -> Vec3 {
    velocity * (speed * dt * MOVE_SCALE)
}
