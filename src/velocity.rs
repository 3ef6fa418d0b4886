//! Smoothed drift velocity.
//!
//! Each tick the velocity is decayed by friction and then kicked by an impulse
//! built from the accumulated pointer delta and the keyboard direction. The
//! two terms are added, not blended, so held input keeps pushing the field.

use crate::config::Config;
use crate::input::RawInput;
use glam::Vec2;

/// Factor applied to the stored pointer delta after each tick.
pub const RAW_DELTA_DECAY: f32 = 0.1;

/// Owner of the persistent drift velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityModel {
    velocity: Vec2,
}

impl VelocityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Impulse contributed by one input snapshot.
    ///
    /// Pointer motion is sign-inverted relative to keys so the field drifts
    /// against the mouse but with the keys.
    pub fn impulse(raw: &RawInput, config: &Config) -> Vec2 {
        -raw.delta * config.mouse_sens + raw.keys * config.key_sens
    }

    /// Advance one tick and return the new velocity.
    pub fn step(&mut self, raw: &RawInput, config: &Config) -> Vec2 {
        self.velocity = self.velocity * config.friction + Self::impulse(raw, config);
        self.velocity
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Magnitude of the current velocity.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(friction: f32, mouse_sens: f32, key_sens: f32) -> Config {
        Config {
            friction,
            mouse_sens,
            key_sens,
            ..Config::default()
        }
    }

    #[test]
    fn test_single_pointer_tick() {
        let cfg = config(0.92, 0.015, 2.7);
        let mut model = VelocityModel::new();
        let raw = RawInput {
            delta: Vec2::new(100.0, 0.0),
            keys: Vec2::ZERO,
        };
        let v = model.step(&raw, &cfg);
        assert!((v.x + 1.5).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_keys_push_with_direction() {
        let cfg = config(0.5, 0.015, 2.0);
        let mut model = VelocityModel::new();
        let raw = RawInput {
            delta: Vec2::ZERO,
            keys: Vec2::new(1.0, -1.0),
        };
        assert_eq!(model.step(&raw, &cfg), Vec2::new(2.0, -2.0));
        // Held keys accumulate: 2 * 0.5 + 2
        assert_eq!(model.step(&raw, &cfg), Vec2::new(3.0, -3.0));
    }

    #[test]
    fn test_friction_decay_without_input() {
        let cfg = config(0.5, 0.0, 0.0);
        let mut model = VelocityModel {
            velocity: Vec2::new(8.0, -4.0),
        };
        model.step(&RawInput::default(), &cfg);
        assert_eq!(model.velocity(), Vec2::new(4.0, -2.0));
        assert!((model.speed() - 20.0_f32.sqrt()).abs() < 1e-5);
    }
}
