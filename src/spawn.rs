//! Spawn policy for new particles.
//!
//! Two patterns exist, picked by whether a direction key is held:
//!
//! - **Ambient**: one particle at a uniformly random screen position with a
//!   random life in `[0.5, 1.0]`.
//! - **Line**: four particles on one randomly chosen row, pinned near the left
//!   and right screen edges, all with life [`LINE_LIFE`].
//!
//! Holding keys triples the number of spawn units per tick, and each unit of a
//! line formation adds four particles.

use crate::particle::{Particle, ParticleKind, LINE_LIFE};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Horizontal offsets of a line formation, measured from the nearer edge.
pub const LINE_EDGE_OFFSETS: [f32; 2] = [40.0, 80.0];

/// Row indices a line formation may land on, relative to the screen centre.
pub const LINE_ROWS: RangeInclusive<i32> = -10..=10;

/// Life range for ambient particles.
pub const AMBIENT_LIFE: RangeInclusive<f32> = 0.5..=1.0;

/// Multiplier on spawn units while keys are held.
pub const KEYBOARD_GEN_MULTIPLIER: usize = 3;

/// Number of spawn units for this tick.
pub fn generation_count(gen_rate: f32, keyboard_active: bool) -> usize {
    let base = gen_rate.max(0.0).floor() as usize;
    if keyboard_active {
        base * KEYBOARD_GEN_MULTIPLIER
    } else {
        base
    }
}

/// x coordinates of the four particles in a line formation.
pub fn line_columns(width: f32) -> [f32; 4] {
    let [near, far] = LINE_EDGE_OFFSETS;
    [near, far, width - far, width - near]
}

/// RNG-backed source of spawn positions and lives.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SmallRng,
}

impl Spawner {
    /// Spawner seeded from the system clock.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    /// Deterministic spawner, for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// One ambient particle inside `[0, size.x) x [0, size.y)`.
    ///
    /// Returns `None` when the screen has no area.
    pub fn ambient(&mut self, size: Vec2) -> Option<Particle> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let position = Vec2::new(self.rng.gen_range(0.0..size.x), self.rng.gen_range(0.0..size.y));
        let life = self.rng.gen_range(AMBIENT_LIFE);
        Some(Particle::new(position, life, ParticleKind::Ambient))
    }

    /// A row of four line particles.
    pub fn line(&mut self, size: Vec2, spacing: f32) -> [Particle; 4] {
        let row = self.rng.gen_range(LINE_ROWS);
        let y = size.y / 2.0 + row as f32 * spacing;
        line_columns(size.x).map(|x| Particle::new(Vec2::new(x, y), LINE_LIFE, ParticleKind::Line))
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_count() {
        assert_eq!(generation_count(2.0, false), 2);
        assert_eq!(generation_count(2.0, true), 6);
        assert_eq!(generation_count(2.9, false), 2);
        assert_eq!(generation_count(0.5, true), 0);
        assert_eq!(generation_count(-3.0, false), 0);
    }

    #[test]
    fn test_line_columns() {
        assert_eq!(line_columns(1920.0), [40.0, 80.0, 1840.0, 1880.0]);
    }

    #[test]
    fn test_ambient_bounds() {
        let mut spawner = Spawner::from_seed(7);
        let size = Vec2::new(320.0, 200.0);
        for _ in 0..1000 {
            let p = spawner.ambient(size).unwrap();
            assert!(p.position.x >= 0.0 && p.position.x < size.x);
            assert!(p.position.y >= 0.0 && p.position.y < size.y);
            assert!(AMBIENT_LIFE.contains(&p.life));
            assert_eq!(p.life, p.max_life);
            assert_eq!(p.kind, ParticleKind::Ambient);
        }
    }

    #[test]
    fn test_ambient_needs_area() {
        let mut spawner = Spawner::from_seed(1);
        assert!(spawner.ambient(Vec2::new(0.0, 100.0)).is_none());
    }

    #[test]
    fn test_line_rows_on_grid() {
        let mut spawner = Spawner::from_seed(3);
        let size = Vec2::new(800.0, 600.0);
        for _ in 0..200 {
            let row = spawner.line(size, 45.0);
            let y = row[0].position.y;
            let index = (y - 300.0) / 45.0;
            assert_eq!(index, index.round());
            assert!((-10.0..=10.0).contains(&index));
            assert!(row.iter().all(|p| p.position.y == y && p.life == LINE_LIFE));
        }
    }

    #[test]
    fn test_seeded_spawners_agree() {
        let size = Vec2::new(640.0, 480.0);
        let mut a = Spawner::from_seed(99);
        let mut b = Spawner::from_seed(99);
        assert_eq!(a.ambient(size), b.ambient(size));
        assert_eq!(a.line(size, 30.0), b.line(size, 30.0));
    }
}
