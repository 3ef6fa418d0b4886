//! # driftfield
//!
//! A full-screen, click-through overlay that turns recent mouse and keyboard
//! motion into a drifting field of particles.
//!
//! ## Pipeline
//!
//! Once per tick (about 60 Hz):
//!
//! ```text
//! InputAggregator ─▶ VelocityModel ─▶ ParticleSystem ─▶ Renderer ─▶ GPU
//!        ▲                 ▲                 ▲
//!   InputListener     SharedConfig ──────────┘
//! ```
//!
//! - [`InputAggregator`] accumulates pointer delta and the WASD direction.
//! - [`VelocityModel`] decays the drift velocity by friction and adds an
//!   impulse from the accumulated input.
//! - [`ParticleSystem`] spawns ambient particles (or line formations while
//!   keys are held), ages them and moves them with the drift.
//! - [`Renderer`] turns particles into discs, or into velocity-aligned streaks
//!   once the drift is fast enough.
//!
//! The pieces are usable headlessly through [`Simulation`]:
//!
//! ```
//! use driftfield::prelude::*;
//!
//! let input = InputAggregator::new();
//! let mut sim = Simulation::new(1280.0, 720.0).with_seed(7);
//! let frame = sim.tick(&input, &Config::default(), 1.0);
//! assert_eq!(frame.sprites.len(), 2);
//! ```
//!
//! [`Overlay`] wraps everything in a transparent winit window rendered with
//! wgpu.

pub mod config;
pub mod control;
pub mod error;
mod gpu;
pub mod input;
pub mod listener;
mod overlay;
pub mod particle;
pub mod render;
mod simulation;
pub mod spawn;
pub mod system;
pub mod time;
pub mod velocity;

pub use config::{Config, Param, SharedConfig, TickMode};
pub use error::{ConfigError, GpuError, OverlayError};
pub use glam::Vec2;
pub use input::{ExitSignal, InputAggregator, InputEvent, Key, RawInput};
pub use listener::{InputListener, InputSender};
pub use overlay::Overlay;
pub use particle::{Particle, ParticleKind};
pub use render::{Renderer, Shape, Sprite};
pub use simulation::{Frame, Simulation};
pub use system::ParticleSystem;
pub use velocity::VelocityModel;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, Param, SharedConfig, TickMode};
    pub use crate::input::{ExitSignal, InputAggregator, InputEvent, Key, RawInput};
    pub use crate::listener::{InputListener, InputSender};
    pub use crate::overlay::Overlay;
    pub use crate::particle::{Particle, ParticleKind};
    pub use crate::render::{Renderer, Shape, Sprite};
    pub use crate::simulation::{Frame, Simulation};
    pub use crate::system::ParticleSystem;
    pub use crate::time::TickClock;
    pub use crate::velocity::VelocityModel;
    pub use crate::Vec2;
}
