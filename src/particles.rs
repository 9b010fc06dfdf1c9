//! Tracer particles drifting on the finalized velocity field.
//!
//! Purely cosmetic: particles read the velocity readout and never write back.
//! The domain is open, so a particle that drifts off the grid keeps going
//! until its lifetime runs out and it respawns.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::FieldReadout;

const LIFETIME_MIN: f32 = 5.0;
const LIFETIME_SPAN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Normalized `[0, 1]²` position, `y` up.
    pub position: Vec2,
    /// Seconds left before respawning.
    pub lifetime: f32,
    /// Sampled fluid speed in texels per second, kept for drawing.
    pub speed: f32,
    /// Dye under the particle at its last update.
    pub color: [f32; 3],
}

#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Multiplier on the sampled fluid velocity.
    pub speed: f32,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut system = Self {
            particles: Vec::with_capacity(count),
            speed: 1.0,
            rng: StdRng::seed_from_u64(seed),
        };
        system.set_count(count);
        system
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn set_count(&mut self, count: usize) {
        if count < self.particles.len() {
            self.particles.truncate(count);
            return;
        }
        while self.particles.len() < count {
            let particle = self.spawn();
            self.particles.push(particle);
        }
    }

    fn spawn(&mut self) -> Particle {
        Particle {
            position: Vec2::new(self.rng.r#gen::<f32>(), self.rng.r#gen::<f32>()),
            lifetime: LIFETIME_MIN + self.rng.r#gen::<f32>() * LIFETIME_SPAN,
            speed: 0.0,
            color: [0.0; 3],
        }
    }

    pub fn update(&mut self, simulation: &impl FieldReadout, dt: f32) {
        let velocity = simulation.velocity();
        let dye = simulation.dye();
        let (width, height) = velocity.resolution();
        let extent = Vec2::new(width as f32, height as f32);

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];

            let texel = particle.position * extent - Vec2::splat(0.5);
            let v = Vec2::from_array(velocity.sample(texel));
            particle.position += v / extent * dt * self.speed;
            particle.speed = v.length();
            particle.color = dye.sample(texel);
            particle.lifetime -= dt;

            if particle.lifetime <= 0.0 {
                let fresh = self.spawn();
                self.particles[i] = fresh;
            }
        }
    }

    /// Particles currently inside the grid.
    pub fn visible(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| {
            (0.0..=1.0).contains(&p.position.x) && (0.0..=1.0).contains(&p.position.y)
        })
    }
}
