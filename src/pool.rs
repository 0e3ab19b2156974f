//! Fixed-capacity particle pool.
//!
//! The pool is a recycling buffer, not an allocator. Storage for
//! `floor(duration * rate)` slots is reserved up front when the allocator
//! allows it. Expired particles are overwritten in place and looping
//! templates append new particles until the pool is full.
//!
//! The pool trusts its template. Run [`ParticleTemplate::validate`] first to
//! keep the capacity bounded; [`ParticleSystem::create`](crate::ParticleSystem::create)
//! does.
//!
//! # Example
//!
//! ```ignore
//! let template = ParticleTemplate::new().with_rate(10).with_duration(2.0);
//! let mut pool = ParticlePool::seeded(template, Transform::IDENTITY, 7);
//! assert_eq!(pool.capacity(), 20);
//! assert_eq!(pool.len(), 10);
//!
//! pool.advance(1.0, &CameraBasis::IDENTITY);
//! pool.advance(1.0, &CameraBasis::IDENTITY);
//! assert_eq!(pool.len(), 20);
//! ```

use crate::camera::CameraBasis;
use crate::lifecycle;
use crate::particle::Particle;
use crate::spawn::{self, spawn_sample};
use crate::template::ParticleTemplate;
use crate::transform::Transform;
use rand::rngs::SmallRng;
use rand::Rng;

/// Counts from one [`ParticlePool::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceStats {
    /// Expired particles recycled in place.
    pub respawned: usize,
    /// Particles appended by looping growth.
    pub spawned: usize,
}

/// Bounded, order-irrelevant collection of particles plus a simulation clock.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
    clock: f32,
    template: ParticleTemplate,
    base: Transform,
    rng: SmallRng,
}

impl ParticlePool {
    /// Create and populate a pool using an OS-seeded RNG.
    pub fn initialize(template: ParticleTemplate, base: Transform) -> Self {
        Self::with_rng(template, base, spawn::entropy_rng())
    }

    /// Create and populate a pool with a reproducible RNG.
    pub fn seeded(template: ParticleTemplate, base: Transform, seed: u64) -> Self {
        Self::with_rng(template, base, spawn::seeded_rng(seed))
    }

    /// Create and populate a pool drawing from `rng`.
    ///
    /// The first second's worth of particles (`rate`, clamped to capacity) is
    /// spawned immediately with random ages in `[0, duration)`, so the system
    /// does not appear to start from nothing. A template whose capacity is
    /// zero yields an empty pool.
    pub fn with_rng(template: ParticleTemplate, base: Transform, mut rng: SmallRng) -> Self {
        let capacity = template.capacity();
        let mut particles = Vec::new();
        if particles.try_reserve_exact(capacity).is_err() {
            log::warn!("could not reserve {capacity} particle slots; growing on demand");
        }

        if capacity == 0 {
            log::warn!(
                "particle template has no capacity (rate {}, duration {}); pool stays empty",
                template.rate,
                template.duration
            );
        }

        let initial = (template.rate as usize).min(capacity);
        for _ in 0..initial {
            let sample = spawn_sample(&mut rng, base.position, template.spawn_radius);
            let age = random_age(&mut rng, template.duration);
            particles.push(Particle::spawn(&template, &base, sample, age));
        }

        log::debug!("particle pool initialized: {} of {} slots", particles.len(), capacity);

        Self {
            particles,
            capacity,
            clock: 0.0,
            template,
            base,
            rng,
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Ages every particle, respawns expired ones in place, drifts and swirls
    /// the rest, grows a looping pool toward capacity, then turns every
    /// billboard to face `camera`.
    ///
    /// Each call integrates its own `dt`; calling it twice in one frame moves
    /// particles twice as far.
    ///
    /// A negative or non-finite `dt` is treated as zero so ages never go
    /// negative and the clock stays finite.
    pub fn advance(&mut self, dt: f32, camera: &CameraBasis) -> AdvanceStats {
        let dt = sanitize_step(dt);
        let mut stats = AdvanceStats::default();
        self.clock += dt;

        let template = &self.template;
        for (slot, particle) in self.particles.iter_mut().enumerate() {
            particle.age += dt;

            if particle.is_expired() {
                let sample = spawn_sample(&mut self.rng, self.base.position, template.spawn_radius);
                *particle = Particle::spawn(template, &self.base, sample, 0.0);
                stats.respawned += 1;
                continue;
            }

            let step = lifecycle::drift(particle.velocity, template.speed, dt)
                + lifecycle::swirl(particle.age, slot, dt);
            particle.transform.position += step;
            particle.size = lifecycle::pulsed_size(template.size, particle.age);
        }

        stats.spawned = self.grow();
        self.face(camera);

        stats
    }

    /// Turn every billboard to `camera` without advancing time.
    pub fn face(&mut self, camera: &CameraBasis) {
        for particle in &mut self.particles {
            particle.transform.forward = camera.forward;
            particle.transform.right = camera.right;
            particle.transform.up = camera.up;
        }
    }

    /// Append particles owed by the clock, never exceeding capacity.
    fn grow(&mut self) -> usize {
        if !self.template.looping || self.is_full() {
            return 0;
        }

        let target = self.target_count();
        if target <= self.particles.len() {
            return 0;
        }

        let count = (target - self.particles.len()).min(self.capacity - self.particles.len());
        for _ in 0..count {
            let sample = spawn_sample(&mut self.rng, self.base.position, self.template.spawn_radius);
            self.particles
                .push(Particle::spawn(&self.template, &self.base, sample, 0.0));
        }

        log::debug!(
            "particle pool grew by {} to {} of {}",
            count,
            self.particles.len(),
            self.capacity
        );
        count
    }

    /// `floor(clock * rate)`, zero when not finite or negative.
    fn target_count(&self) -> usize {
        let target = (self.clock * self.template.rate as f32).floor();
        if target.is_finite() && target > 0.0 {
            target as usize
        } else {
            0
        }
    }

    /// Live particles in slot order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to live particles. The count cannot change through it.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Declared maximum, `floor(duration * rate)`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Seconds simulated since creation.
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    #[inline]
    pub fn template(&self) -> &ParticleTemplate {
        &self.template
    }

    /// Transform new particles are spawned around.
    #[inline]
    pub fn base(&self) -> &Transform {
        &self.base
    }
}

fn sanitize_step(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("ignoring invalid particle step {dt}; advancing by 0");
        0.0
    }
}

fn random_age<R: Rng + ?Sized>(rng: &mut R, duration: f32) -> f32 {
    if duration > 0.0 && duration.is_finite() {
        rng.gen_range(0.0..duration)
    } else {
        0.0
    }
}
