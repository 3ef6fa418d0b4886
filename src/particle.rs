//! Particle data.

use glam::Vec2;

/// Life removed from every particle per nominal tick.
pub const LIFE_DECAY: f32 = 0.018;

/// Floor added to remaining life when scaling motion, so dying particles
/// still drift.
pub const MOTION_FLOOR: f32 = 0.3;

/// Life given to every particle in a line formation.
pub const LINE_LIFE: f32 = 0.7;

/// How a particle came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Scattered at a random screen position while no direction key is held.
    Ambient,
    /// Part of a four-particle row spawned while direction keys are held.
    Line,
}

/// A single live particle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Remaining life; the particle is removed once this reaches zero.
    pub life: f32,
    /// Life at spawn, used to derive the fade.
    pub max_life: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(position: Vec2, life: f32, kind: ParticleKind) -> Self {
        Self {
            position,
            life,
            max_life: life,
            kind,
        }
    }

    /// Fraction of life remaining, in `(0, 1]` for a live particle.
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            0.0
        }
    }

    /// Age by `decay`, returning whether the particle is still alive.
    ///
    /// A live particle then moves by `velocity * (life + MOTION_FLOOR)`;
    /// an expired one is left untouched.
    pub fn advance(&mut self, velocity: Vec2, decay: f32) -> bool {
        self.life -= decay;
        if self.life <= 0.0 {
            return false;
        }
        self.position += velocity * (self.life + MOTION_FLOOR);
        true
    }
}
