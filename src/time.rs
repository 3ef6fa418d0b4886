//! Tick timing.
//!
//! The simulation is tuned for a nominal 60 Hz tick: one tick ages every
//! particle by exactly [`LIFE_DECAY`](crate::particle::LIFE_DECAY). The
//! [`TickClock`] schedules ticks at a fixed interval and measures the real
//! time between them, so [`TickMode::Elapsed`] can age particles by wall-clock
//! time when the host falls behind.
//!
//! # Example
//!
//! ```
//! use driftfield::config::TickMode;
//! use driftfield::time::TickClock;
//! use std::time::Duration;
//!
//! let mut clock = TickClock::new(Duration::from_millis(16));
//! let step = clock.tick(TickMode::Fixed);
//! assert_eq!(step.scale, 1.0);
//! assert_eq!(clock.frame(), 1);
//! ```

use crate::config::TickMode;
use std::time::{Duration, Instant};

/// Duration of one nominal tick, in seconds.
pub const NOMINAL_DT: f32 = 1.0 / 60.0;

/// Largest ageing scale a single elapsed-mode tick may apply.
pub const MAX_STEP_SCALE: f32 = 4.0;

/// Smallest ageing scale, so life still strictly decreases on a tick that
/// measured no elapsed time.
pub const MIN_STEP_SCALE: f32 = 0.05;

/// Default interval between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Result of advancing the clock by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStep {
    /// Measured seconds since the previous tick.
    pub dt: f32,
    /// Multiplier for the nominal life decrement.
    pub scale: f32,
}

/// Ageing scale for a measured `dt`.
///
/// Fixed mode always yields exactly `1.0`; elapsed mode yields
/// `dt / NOMINAL_DT` clamped to `[MIN_STEP_SCALE, MAX_STEP_SCALE]`.
pub fn step_scale(dt: f32, mode: TickMode) -> f32 {
    match mode {
        TickMode::Fixed => 1.0,
        TickMode::Elapsed => (dt / NOMINAL_DT).clamp(MIN_STEP_SCALE, MAX_STEP_SCALE),
    }
}

/// Fixed-interval tick scheduler with FPS measurement.
#[derive(Debug)]
pub struct TickClock {
    interval: Duration,
    /// Deadline of the next tick.
    next_tick: Instant,
    last_tick: Instant,
    frame_count: u64,
    /// Calculated ticks per second (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl TickClock {
    /// Clock whose first tick is due immediately.
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            next_tick: now,
            last_tick: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(1000),
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick should run.
    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.next_tick
    }

    /// Whether the next tick is due at `now`.
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Total ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured ticks per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Record a tick happening now and schedule the next one.
    pub fn tick(&mut self, mode: TickMode) -> TickStep {
        self.tick_at(Instant::now(), mode)
    }

    /// Same as [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant, mode: TickMode) -> TickStep {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.frame_count += 1;

        // Don't try to catch up on missed ticks; resume the cadence from now.
        self.next_tick += self.interval;
        if self.next_tick <= now {
            self.next_tick = now + self.interval;
        }

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            log::trace!("tick rate {:.1}/s", self.fps);
        }

        TickStep {
            dt,
            scale: step_scale(dt, mode),
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
