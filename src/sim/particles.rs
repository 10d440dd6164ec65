//! Sparkle feedback particles
//!
//! A fixed pool; spawning takes the first free particle or silently drops
//! the request. Purely visual: nothing here feeds back into gameplay.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::ticks_to_secs;

/// Spin per tick, radians
const SPIN_PER_TICK: f32 = 0.1;

/// A single sparkle
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    /// Drift in units per tick
    pub vel: Vec2,
    pub rotation: f32,
    pub scale: f32,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub active: bool,
}

impl Particle {
    /// Opacity, fading from 1 to 0 over the particle's life
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fixed-size sparkle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a sparkle at `pos`. Returns false when every particle is busy.
    pub fn spawn_star(&mut self, pos: Vec2) -> bool {
        let Some(p) = self.particles.iter_mut().find(|p| !p.active) else {
            return false;
        };
        let life = 0.5 + self.rng.random::<f32>() * 0.5;
        *p = Particle {
            pos,
            vel: Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0,
                (self.rng.random::<f32>() - 0.5) * 2.0,
            ),
            rotation: self.rng.random::<f32>() * PI,
            scale: 0.5 + self.rng.random::<f32>() * 0.5,
            life,
            max_life: life,
            active: true,
        };
        true
    }

    /// Advance one tick of `delta` frames
    pub fn update(&mut self, delta: f32) {
        let dt = ticks_to_secs(delta);
        for p in self.particles.iter_mut().filter(|p| p.active) {
            p.life -= dt;
            if p.life <= 0.0 {
                p.active = false;
                continue;
            }
            p.pos += p.vel * delta;
            p.rotation += SPIN_PER_TICK * delta;
        }
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_exhaustion_drops_requests() {
        let mut pool = ParticlePool::new(3, 1);
        for _ in 0..3 {
            assert!(pool.spawn_star(Vec2::ZERO));
        }
        assert!(!pool.spawn_star(Vec2::ZERO));
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_particles_fade_and_expire() {
        let mut pool = ParticlePool::new(1, 2);
        pool.spawn_star(Vec2::new(10.0, 10.0));
        let alpha = pool.iter_active().next().map(Particle::alpha);
        assert_eq!(alpha, Some(1.0));

        pool.update(6.0);
        let p = pool.iter_active().next().unwrap();
        assert!(p.alpha() < 1.0);

        // Longest life is one second = 60 ticks
        for _ in 0..60 {
            pool.update(1.0);
        }
        assert_eq!(pool.active_count(), 0);
        assert!(pool.spawn_star(Vec2::ZERO));
    }

    #[test]
    fn test_zero_capacity_is_noop() {
        let mut pool = ParticlePool::new(0, 3);
        assert!(!pool.spawn_star(Vec2::ZERO));
        pool.update(1.0);
        assert_eq!(pool.capacity(), 0);
    }
}
