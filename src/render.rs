//! Turning particles into draw primitives.
//!
//! The [`Renderer`] knows nothing about the GPU. It produces a flat list of
//! [`Sprite`]s that any presenter can rasterise; the wgpu presenter
//! draws each as a rotated rounded box.
//!
//! Above [`STREAK_THRESHOLD`] every particle becomes a streak aligned with the
//! drift direction, lengthened by speed and remaining life. At or below it
//! particles are plain discs.

use crate::particle::Particle;
use glam::Vec2;

/// Opacity of a freshly spawned particle.
pub const BASE_ALPHA: f32 = 210.0 / 255.0;

/// Speed above which particles are drawn as streaks. Strictly greater-than.
pub const STREAK_THRESHOLD: f32 = 0.5;

/// Streak stretch per unit of speed and life.
pub const STREAK_GAIN: f32 = 2.0;

/// Longest stretch a streak may get, in pixels.
pub const MAX_STRETCH: f32 = 45.0;

/// Outline of a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled circle.
    Disc { radius: f32 },
    /// Rounded box of `length` x `thickness`, rotated by `angle` radians.
    Streak {
        angle: f32,
        length: f32,
        thickness: f32,
        corner_radius: f32,
    },
}

/// One drawable particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: Vec2,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    pub shape: Shape,
}

impl Sprite {
    /// Half-size of the unrotated box enclosing this sprite.
    pub fn half_extents(&self) -> Vec2 {
        match self.shape {
            Shape::Disc { radius } => Vec2::splat(radius),
            Shape::Streak { length, thickness, .. } => Vec2::new(length, thickness) * 0.5,
        }
    }

    /// Rotation in radians.
    pub fn angle(&self) -> f32 {
        match self.shape {
            Shape::Disc { .. } => 0.0,
            Shape::Streak { angle, .. } => angle,
        }
    }

    /// Radius of the rounded corners.
    pub fn corner_radius(&self) -> f32 {
        match self.shape {
            Shape::Disc { radius } => radius,
            Shape::Streak { corner_radius, .. } => corner_radius,
        }
    }
}

/// Whether a drift speed renders as streaks.
#[inline]
pub fn is_streaking(speed: f32) -> bool {
    speed > STREAK_THRESHOLD
}

/// Stretch of a streak for a given speed and remaining life.
#[inline]
pub fn stretch(speed: f32, life: f32) -> f32 {
    (speed * STREAK_GAIN * life).min(MAX_STRETCH)
}

/// Builds sprites from particle state.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub dot_radius: f32,
}

impl Renderer {
    pub fn new(dot_radius: f32) -> Self {
        Self { dot_radius }
    }

    /// Sprite for one particle under the given drift velocity.
    pub fn sprite(&self, particle: &Particle, velocity: Vec2) -> Sprite {
        let speed = velocity.length();
        let alpha = BASE_ALPHA * particle.life_fraction();
        let r = self.dot_radius;

        let shape = if is_streaking(speed) {
            Shape::Streak {
                angle: velocity.y.atan2(velocity.x),
                length: r * 2.0 + stretch(speed, particle.life),
                thickness: r * 2.0,
                corner_radius: r,
            }
        } else {
            Shape::Disc { radius: r }
        };

        Sprite {
            center: particle.position,
            alpha,
            shape,
        }
    }

    /// Sprites for every particle, in order.
    pub fn draw(&self, particles: &[Particle], velocity: Vec2) -> Vec<Sprite> {
        particles.iter().map(|p| self.sprite(p, velocity)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleKind;

    fn particle(life: f32, max_life: f32) -> Particle {
        Particle {
            position: Vec2::new(50.0, 60.0),
            life,
            max_life,
            kind: ParticleKind::Ambient,
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let renderer = Renderer::new(3.0);
        let p = particle(1.0, 1.0);

        let at = renderer.sprite(&p, Vec2::new(0.0, -0.5));
        assert_eq!(at.shape, Shape::Disc { radius: 3.0 });

        let above = renderer.sprite(&p, Vec2::new(0.0, 0.51));
        assert!(matches!(above.shape, Shape::Streak { .. }));
    }

    #[test]
    fn test_alpha_fades_linearly() {
        let renderer = Renderer::new(3.0);
        let fresh = renderer.sprite(&particle(0.8, 0.8), Vec2::ZERO);
        assert!((fresh.alpha - BASE_ALPHA).abs() < 1e-6);

        let half = renderer.sprite(&particle(0.4, 0.8), Vec2::ZERO);
        assert!((half.alpha - BASE_ALPHA * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_streak_geometry() {
        let renderer = Renderer::new(2.0);
        let sprite = renderer.sprite(&particle(0.5, 1.0), Vec2::new(0.0, 4.0));
        match sprite.shape {
            Shape::Streak {
                angle,
                length,
                thickness,
                corner_radius,
            } => {
                assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
                // stretch = 4 * 2 * 0.5 = 4
                assert!((length - 8.0).abs() < 1e-6);
                assert_eq!(thickness, 4.0);
                assert_eq!(corner_radius, 2.0);
            }
            other => panic!("expected streak, got {other:?}"),
        }
        assert_eq!(sprite.half_extents(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_stretch_capped() {
        assert_eq!(stretch(100.0, 1.0), MAX_STRETCH);
        assert!((stretch(10.0, 0.5) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_draw_preserves_order() {
        let renderer = Renderer::new(1.0);
        let mut a = particle(1.0, 1.0);
        let mut b = particle(1.0, 1.0);
        a.position = Vec2::new(1.0, 1.0);
        b.position = Vec2::new(2.0, 2.0);
        let sprites = renderer.draw(&[a, b], Vec2::ZERO);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[1].center, Vec2::new(2.0, 2.0));
    }
}
