//! Input aggregation for the overlay.
//!
//! The overlay never has focus, so it cannot rely on ordinary window events.
//! Instead raw device events are translated into [`InputEvent`]s and folded
//! into an [`InputAggregator`], which accumulates pointer motion and tracks
//! the WASD direction vector between ticks.
//!
//! The tick reads the aggregator with [`InputAggregator::take`], which returns
//! a consistent snapshot and decays the stored pointer delta under one lock,
//! so a burst of motion feeds several ticks with shrinking impulses.
//!
//! # Key layout
//!
//! | Key | Contribution |
//! |-----|--------------|
//! | `W` | `+y` |
//! | `S` | `-y` |
//! | `A` | `+x` |
//! | `D` | `-x` |
//! | `End` | exit |

use glam::Vec2;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    /// Terminates the process.
    End,
    /// Anything else; ignored by the aggregator.
    Other,
}

impl Key {
    /// Unit contribution of this key to the direction vector.
    pub fn direction(self) -> Option<(i8, i8)> {
        match self {
            Key::W => Some((0, 1)),
            Key::S => Some((0, -1)),
            Key::A => Some((1, 0)),
            Key::D => Some((-1, 0)),
            Key::End | Key::Other => None,
        }
    }

    /// Whether this key requests shutdown.
    pub fn is_exit(self) -> bool {
        self == Key::End
    }
}

impl From<WinitKeyCode> for Key {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyW => Key::W,
            WinitKeyCode::KeyA => Key::A,
            WinitKeyCode::KeyS => Key::S,
            WinitKeyCode::KeyD => Key::D,
            WinitKeyCode::End => Key::End,
            _ => Key::Other,
        }
    }
}

impl Key {
    /// Map a winit physical key, if it carries a known code.
    pub fn from_physical(key: PhysicalKey) -> Option<Self> {
        match key {
            PhysicalKey::Code(code) => Some(Key::from(code)),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// A single input observation, as delivered by the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Absolute pointer position in screen pixels.
    PointerMoved { x: f64, y: f64 },
    /// Relative pointer motion since the previous sample.
    PointerDelta { dx: f64, dy: f64 },
    /// A key went down (`pressed`) or up.
    Key { key: Key, pressed: bool },
}

/// Snapshot of accumulated input, consumed once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInput {
    /// Accumulated pointer delta since it was last decayed to nothing.
    pub delta: Vec2,
    /// Keyboard direction vector, each component in `{-1, 0, 1}`.
    pub keys: Vec2,
}

impl RawInput {
    /// True iff any directional key combination is non-zero.
    pub fn keyboard_active(&self) -> bool {
        self.keys != Vec2::ZERO
    }
}

#[derive(Debug, Default)]
pub(crate) struct RawInputState {
    delta: Vec2,
    key_x: i8,
    key_y: i8,
    pressed: HashSet<Key>,
    last_pointer: Option<(f64, f64)>,
}

impl RawInputState {
    fn recompute_direction(&mut self) {
        let (x, y) = self
            .pressed
            .iter()
            .filter_map(|k| k.direction())
            .fold((0, 0), |(x, y), (dx, dy)| (x + dx, y + dy));
        self.key_x = x;
        self.key_y = y;
    }
}

/// Thread-safe accumulator for raw pointer and key input.
#[derive(Debug, Default)]
pub struct InputAggregator {
    state: Mutex<RawInputState>,
}

impl InputAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, RawInputState> {
        // A panic mid-update leaves plain numbers behind; keep going.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record an absolute pointer position.
    ///
    /// The first sample only sets the reference point; later samples add the
    /// distance travelled since the previous one.
    pub fn on_pointer_move(&self, x: f64, y: f64) {
        let mut state = self.lock();
        if let Some((last_x, last_y)) = state.last_pointer {
            state.delta += Vec2::new((x - last_x) as f32, (y - last_y) as f32);
        }
        state.last_pointer = Some((x, y));
    }

    /// Record relative pointer motion.
    pub fn on_pointer_delta(&self, dx: f64, dy: f64) {
        self.lock().delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Record a key transition. Non-directional keys are ignored.
    pub fn on_key_change(&self, key: Key, pressed: bool) {
        if key.direction().is_none() {
            return;
        }
        let mut state = self.lock();
        let changed = if pressed {
            state.pressed.insert(key)
        } else {
            state.pressed.remove(&key)
        };
        if changed {
            state.recompute_direction();
        }
    }

    /// Fold one event into the accumulated state.
    pub fn apply(&self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerDelta { dx, dy } => self.on_pointer_delta(dx, dy),
            InputEvent::Key { key, pressed } => self.on_key_change(key, pressed),
        }
    }

    /// Snapshot the current state, then scale the stored pointer delta by
    /// `decay`. Both happen under a single lock.
    pub fn take(&self, decay: f32) -> RawInput {
        let mut state = self.lock();
        let snapshot = RawInput {
            delta: state.delta,
            keys: Vec2::new(state.key_x as f32, state.key_y as f32),
        };
        state.delta *= decay;
        snapshot
    }

    /// Current snapshot without decaying anything.
    pub fn peek(&self) -> RawInput {
        self.take(1.0)
    }
}

/// One-way latch raised when the exit key is seen.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    raised: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
