//! Runtime configuration and the parameter port.
//!
//! [`Config`] holds every tunable the tick reads. It is shared between the
//! render thread and whatever control surface is feeding it through
//! [`SharedConfig`]; writes are last-writer-wins per field and become visible
//! on the next tick.
//!
//! # Parameters
//!
//! | Name | Meaning | Clamp |
//! |------|---------|-------|
//! | `mouse_sens` | multiplier on pointer delta | none |
//! | `key_sens` | multiplier on key direction | none |
//! | `dot_radius` | particle radius in px | `>= 0` |
//! | `max_particles` | population cap | `>= 0`, truncated |
//! | `gen_rate` | base spawn units per tick | `>= 0` |
//! | `friction` | velocity decay per tick | `[0, 0.999]` |
//! | `line_spacing` | px between keyboard rows | `>= 0` |
//!
//! # Example
//!
//! ```
//! use driftfield::config::SharedConfig;
//!
//! let shared = SharedConfig::default();
//! shared.set_parameter("friction", 1.5).unwrap();
//! assert!(shared.snapshot().friction < 1.0);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Upper bound friction is clamped to; keeps it strictly below 1.
pub const MAX_FRICTION: f32 = 0.999;

/// How the per-tick life decrement relates to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Every tick ages particles by exactly one nominal step.
    #[default]
    Fixed,
    /// Ageing is scaled by the measured time since the previous tick.
    Elapsed,
}

/// Simulation parameters, read once at the start of every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Particle radius in pixels.
    pub dot_radius: f32,
    /// Population cap checked before each spawn unit.
    pub max_particles: usize,
    /// Base spawn units per tick (floored).
    pub gen_rate: f32,
    /// Multiplicative velocity decay per tick, in `[0, 1)`.
    pub friction: f32,
    /// Vertical distance between keyboard-mode rows, in pixels.
    pub line_spacing: f32,
    /// Multiplier applied to accumulated pointer delta.
    pub mouse_sens: f32,
    /// Multiplier applied to the keyboard direction vector.
    pub key_sens: f32,
    /// Whether ageing follows fixed ticks or measured time.
    pub tick_mode: TickMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dot_radius: 3.2,
            max_particles: 250,
            gen_rate: 2.0,
            friction: 0.92,
            line_spacing: 45.0,
            mouse_sens: 0.02,
            key_sens: 5.0,
            tick_mode: TickMode::Fixed,
        }
    }
}

/// A recognised parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    MouseSens,
    KeySens,
    DotRadius,
    MaxParticles,
    GenRate,
    Friction,
    LineSpacing,
}

impl Param {
    /// All parameters, in the order the control console lists them.
    pub const ALL: [Param; 7] = [
        Param::MouseSens,
        Param::KeySens,
        Param::MaxParticles,
        Param::DotRadius,
        Param::Friction,
        Param::GenRate,
        Param::LineSpacing,
    ];

    /// The wire name used by [`Config::set_parameter`].
    pub fn name(self) -> &'static str {
        match self {
            Param::MouseSens => "mouse_sens",
            Param::KeySens => "key_sens",
            Param::DotRadius => "dot_radius",
            Param::MaxParticles => "max_particles",
            Param::GenRate => "gen_rate",
            Param::Friction => "friction",
            Param::LineSpacing => "line_spacing",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownParameter(s.to_string()))
    }
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&text)?;
        config.sanitize();
        Ok(config)
    }

    /// Apply a named parameter update.
    ///
    /// Returns the value actually stored, which differs from `value` when the
    /// input was clamped into its legal range.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<f32, ConfigError> {
        let param: Param = name.parse()?;
        self.set(param, value)
    }

    /// Typed form of [`set_parameter`](Self::set_parameter).
    pub fn set(&mut self, param: Param, value: f32) -> Result<f32, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite {
                name: param.name(),
                value,
            });
        }

        let applied = match param {
            Param::MouseSens => {
                self.mouse_sens = value;
                value
            }
            Param::KeySens => {
                self.key_sens = value;
                value
            }
            Param::DotRadius => {
                self.dot_radius = value.max(0.0);
                self.dot_radius
            }
            Param::MaxParticles => {
                self.max_particles = value.max(0.0) as usize;
                self.max_particles as f32
            }
            Param::GenRate => {
                self.gen_rate = value.max(0.0);
                self.gen_rate
            }
            Param::Friction => {
                self.friction = value.clamp(0.0, MAX_FRICTION);
                self.friction
            }
            Param::LineSpacing => {
                self.line_spacing = value.max(0.0);
                self.line_spacing
            }
        };

        if applied != value {
            log::warn!("{param} clamped from {value} to {applied}");
        }
        Ok(applied)
    }

    /// Current value of a parameter as `f32`.
    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::MouseSens => self.mouse_sens,
            Param::KeySens => self.key_sens,
            Param::DotRadius => self.dot_radius,
            Param::MaxParticles => self.max_particles as f32,
            Param::GenRate => self.gen_rate,
            Param::Friction => self.friction,
            Param::LineSpacing => self.line_spacing,
        }
    }

    /// Pull every field back into its legal range.
    ///
    /// Used after deserializing, where values bypass [`set`](Self::set).
    pub fn sanitize(&mut self) {
        for param in Param::ALL {
            let value = self.get(param);
            let value = if value.is_finite() {
                value
            } else {
                log::warn!("{param} is not finite, restoring default");
                Config::default().get(param)
            };
            // Finite by construction, so this cannot fail.
            let _ = self.set(param, value);
        }
    }
}

/// Process-wide handle to the live [`Config`].
///
/// Cloning shares the same underlying configuration.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
}

impl SharedConfig {
    /// Wrap an initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the configuration as it stands right now.
    pub fn snapshot(&self) -> Config {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply a named parameter update; see [`Config::set_parameter`].
    pub fn set_parameter(&self, name: &str, value: f32) -> Result<f32, ConfigError> {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.set_parameter(name, value)
    }

    /// Switch between fixed and elapsed-time ageing.
    pub fn set_tick_mode(&self, mode: TickMode) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.tick_mode = mode;
    }
}
