//! The per-tick pipeline.
//!
//! [`Simulation`] wires the three stateful stages together:
//!
//! ```text
//! RawInput ─▶ VelocityModel ─▶ ParticleSystem ─▶ Renderer ─▶ Frame
//! ```
//!
//! It has no window or GPU dependency, so the whole effect can be driven
//! headlessly, which is how the tests and benches use it.
//!
//! # Example
//!
//! ```
//! use driftfield::prelude::*;
//!
//! let input = InputAggregator::new();
//! let mut sim = Simulation::new(1920.0, 1080.0).with_seed(1);
//! let config = Config::default();
//!
//! input.on_pointer_delta(120.0, 0.0);
//! let frame = sim.tick(&input, &config, 1.0);
//! assert!(frame.velocity.x < 0.0);
//! assert_eq!(frame.sprites.len(), sim.particles().len());
//! ```

use crate::config::Config;
use crate::input::{InputAggregator, RawInput};
use crate::particle::Particle;
use crate::render::{Renderer, Sprite};
use crate::system::ParticleSystem;
use crate::velocity::{VelocityModel, RAW_DELTA_DECAY};
use glam::Vec2;

/// Everything a presenter needs for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub sprites: Vec<Sprite>,
    pub velocity: Vec2,
    pub speed: f32,
}

/// Velocity, population and sprite generation for one overlay.
#[derive(Debug, Clone)]
pub struct Simulation {
    velocity: VelocityModel,
    system: ParticleSystem,
}

impl Simulation {
    /// Fresh simulation for a `width` x `height` screen.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            velocity: VelocityModel::new(),
            system: ParticleSystem::new(width, height),
        }
    }

    /// Use a deterministic spawn RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        let size = self.system.screen_size();
        self.system = ParticleSystem::with_seed(size.x, size.y, seed);
        self
    }

    /// Change the spawn area.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.system.resize(width, height);
    }

    pub fn particles(&self) -> &[Particle] {
        self.system.particles()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.velocity()
    }

    /// Take input from `input` and run one tick.
    pub fn tick(&mut self, input: &InputAggregator, config: &Config, step_scale: f32) -> Frame {
        let raw = input.take(RAW_DELTA_DECAY);
        self.step(&raw, config, step_scale)
    }

    /// Run one tick on an already-taken input snapshot.
    pub fn step(&mut self, raw: &RawInput, config: &Config, step_scale: f32) -> Frame {
        let velocity = self.velocity.step(raw, config);
        self.system
            .update(config, raw.keyboard_active(), velocity, step_scale);

        let sprites = Renderer::new(config.dot_radius).draw(self.system.particles(), velocity);
        Frame {
            sprites,
            velocity,
            speed: self.velocity.speed(),
        }
    }
}
