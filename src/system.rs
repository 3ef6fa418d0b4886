//! The bounded particle population.
//!
//! Each tick [`ParticleSystem::update`] runs the spawn policy and then ages,
//! culls and advances every particle. The population cap is checked once per
//! spawn unit: a line formation that starts just under the cap still adds all
//! four particles, so the count can overshoot the cap by up to three.
//! Lowering the cap never removes live particles; it only holds back spawning
//! until the population ages out below it.

use crate::config::Config;
use crate::particle::{Particle, LIFE_DECAY};
use crate::spawn::{generation_count, Spawner};
use glam::Vec2;

/// Owner of all live particles.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    screen: Vec2,
    spawner: Spawner,
}

impl ParticleSystem {
    /// Empty system covering a `width` x `height` screen.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_spawner(width, height, Spawner::new())
    }

    /// Empty system with a deterministic spawner.
    pub fn with_seed(width: f32, height: f32, seed: u64) -> Self {
        Self::with_spawner(width, height, Spawner::from_seed(seed))
    }

    fn with_spawner(width: f32, height: f32, spawner: Spawner) -> Self {
        Self {
            particles: Vec::new(),
            screen: Vec2::new(width, height),
            spawner,
        }
    }

    /// Change the area new particles spawn into. Live particles are kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.screen = Vec2::new(width, height);
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
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

    /// Run the spawn policy once.
    ///
    /// Returns the number of particles added.
    pub fn spawn(&mut self, config: &Config, keyboard_active: bool) -> usize {
        let before = self.particles.len();
        for _ in 0..generation_count(config.gen_rate, keyboard_active) {
            if self.particles.len() >= config.max_particles {
                // Stays true for the rest of this tick.
                break;
            }
            if keyboard_active {
                let row = self.spawner.line(self.screen, config.line_spacing);
                self.particles.extend(row);
            } else if let Some(p) = self.spawner.ambient(self.screen) {
                self.particles.push(p);
            }
        }
        self.particles.len() - before
    }

    /// Age, cull and move every particle.
    ///
    /// `step_scale` multiplies the nominal life decrement; pass `1.0` for a
    /// standard tick.
    pub fn advance(&mut self, velocity: Vec2, step_scale: f32) {
        let decay = LIFE_DECAY * step_scale;
        self.particles.retain_mut(|p| p.advance(velocity, decay));
    }

    /// Full tick: spawn, then advance.
    pub fn update(&mut self, config: &Config, keyboard_active: bool, velocity: Vec2, step_scale: f32) {
        self.spawn(config, keyboard_active);
        self.advance(velocity, step_scale);
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ParticleKind, LINE_LIFE};

    fn config(max_particles: usize, gen_rate: f32) -> Config {
        Config {
            max_particles,
            gen_rate,
            ..Config::default()
        }
    }

    #[test]
    fn test_ambient_spawn_count() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 1);
        assert_eq!(system.spawn(&config(100, 3.0), false), 3);
        assert!(system.particles().iter().all(|p| p.kind == ParticleKind::Ambient));
    }

    #[test]
    fn test_keyboard_spawn_triples_units() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 1);
        // 2 units * 3 = 6 formations of 4
        assert_eq!(system.spawn(&config(1000, 2.0), true), 24);
        assert!(system.particles().iter().all(|p| p.kind == ParticleKind::Line));
    }

    #[test]
    fn test_line_formation_overshoots_by_at_most_three() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 5);
        system.spawn(&config(9, 1.0), true);
        // 0 -> 4 -> 8 -> 12: the third unit started at 8 < 9
        assert_eq!(system.len(), 12);
        assert!(system.len() <= 9 + 3);
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 2);
        system.spawn(&config(5, 20.0), false);
        assert_eq!(system.len(), 5);
        assert_eq!(system.spawn(&config(5, 20.0), false), 0);
    }

    #[test]
    fn test_lowering_cap_keeps_particles() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 2);
        system.spawn(&config(50, 20.0), false);
        assert_eq!(system.len(), 20);

        system.update(&config(5, 20.0), false, Vec2::ZERO, 1.0);
        assert_eq!(system.len(), 20);
    }

    #[test]
    fn test_line_particles_expire_together() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 4);
        system.spawn(&config(100, 1.0), true);
        let ticks_alive = (LINE_LIFE / LIFE_DECAY).floor() as usize;

        let mut ticks = 0;
        while !system.is_empty() {
            system.advance(Vec2::ZERO, 1.0);
            ticks += 1;
            assert!(ticks <= ticks_alive + 1);
        }
        assert!(ticks >= ticks_alive);
    }

    #[test]
    fn test_step_scale_speeds_ageing() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 4);
        system.spawn(&config(100, 1.0), true);
        system.advance(Vec2::ZERO, 2.0);
        let expected = LINE_LIFE - 2.0 * LIFE_DECAY;
        assert!(system.particles().iter().all(|p| (p.life - expected).abs() < 1e-6));
    }

    #[test]
    fn test_resize_affects_new_spawns_only() {
        let mut system = ParticleSystem::with_seed(100.0, 100.0, 8);
        // gen_rate 1 with keys held is three formations of four.
        assert_eq!(system.spawn(&config(100, 1.0), true), 12);
        system.resize(1000.0, 100.0);
        assert_eq!(system.particles()[3].position.x, 60.0);
        assert_eq!(system.particles()[11].position.x, 60.0);

        assert_eq!(system.spawn(&config(100, 1.0), true), 12);
        assert_eq!(system.len(), 24);
        assert_eq!(system.particles()[15].position.x, 960.0);
        assert_eq!(system.particles().last().map(|p| p.position.x), Some(960.0));
    }

    #[test]
    fn test_spawning_resumes_below_lowered_cap() {
        let mut system = ParticleSystem::with_seed(800.0, 600.0, 9);
        system.spawn(&config(50, 20.0), false);
        assert_eq!(system.len(), 20);

        let lowered = config(5, 1.0);
        let mut resumed = false;
        // Ambient lives are at most 1.0, so everything is gone within 56 ticks.
        for _ in 0..100 {
            let before = system.len();
            let added = system.spawn(&lowered, false);
            if before < lowered.max_particles {
                assert_eq!(added, 1);
                resumed = true;
                break;
            }
            assert_eq!(added, 0);
            system.advance(Vec2::ZERO, 1.0);
        }
        assert!(resumed);
        assert!(system.len() <= lowered.max_particles);
    }
}
