//! Background input listener.
//!
//! OS input arrives on the event-loop thread, at whatever cadence the platform
//! delivers it. Rather than touching shared state from there, events are
//! pushed to a dedicated worker that folds them into the [`InputAggregator`].
//! The worker also watches for the exit key.
//!
//! Pointer motion goes through a bounded channel and is dropped when it is
//! full; the aggregator sums motion anyway. Key transitions use their own
//! unbounded channel so a release or the exit key is never lost.
//!
//! ```text
//! event loop ──InputEvent──▶ listener thread ──▶ InputAggregator ◀── tick
//!                                   │
//!                                   └──▶ ExitSignal
//! ```
//!
//! Shutdown is an explicit cancellation: [`InputListener::shutdown`] signals
//! the worker and joins it.

use crate::error::OverlayError;
use crate::input::{ExitSignal, InputAggregator, InputEvent};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default capacity of the event channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Producer side of the listener's event channels.
#[derive(Debug, Clone)]
pub struct InputSender {
    motion: Sender<InputEvent>,
    keys: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event without blocking.
    ///
    /// Returns `false` if the event was dropped: pointer motion while the
    /// motion channel is full, or anything once the listener has stopped.
    pub fn send(&self, event: InputEvent) -> bool {
        if let InputEvent::Key { .. } = event {
            return self.keys.send(event).is_ok();
        }
        match self.motion.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::trace!("input channel full, dropping {event:?}");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle to the running listener thread.
#[derive(Debug)]
pub struct InputListener {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl InputListener {
    /// Start the listener thread.
    pub fn spawn(
        aggregator: Arc<InputAggregator>,
        exit: ExitSignal,
        capacity: usize,
    ) -> Result<(Self, InputSender), OverlayError> {
        let (motion, motion_rx) = bounded(capacity.max(1));
        let (keys, keys_rx) = unbounded();
        let (cancel, cancel_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("input-listener".into())
            .spawn(move || run(motion_rx, keys_rx, cancel_rx, &aggregator, &exit))
            .map_err(OverlayError::Listener)?;

        log::debug!("input listener started (capacity {capacity})");
        Ok((
            Self {
                cancel,
                handle: Some(handle),
            },
            InputSender { motion, keys },
        ))
    }

    /// Whether the worker thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the worker to stop and wait for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.cancel.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("input listener panicked");
            }
            log::debug!("input listener stopped");
        }
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    motion: Receiver<InputEvent>,
    keys: Receiver<InputEvent>,
    cancel: Receiver<()>,
    aggregator: &InputAggregator,
    exit: &ExitSignal,
) {
    loop {
        // Both senders live in the same `InputSender`, so either one
        // disconnecting means every sender is gone.
        let event = select! {
            recv(keys) -> event => event,
            recv(motion) -> event => event,
            recv(cancel) -> _ => break,
        };
        let Ok(event) = event else { break };

        if let InputEvent::Key { key, pressed: true } = event {
            if key.is_exit() {
                log::info!("exit key pressed");
                exit.raise();
            }
        }
        aggregator.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use glam::Vec2;
    use std::time::{Duration, Instant};

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        cond()
    }

    #[test]
    fn test_events_reach_aggregator() {
        let aggregator = Arc::new(InputAggregator::new());
        let (listener, sender) =
            InputListener::spawn(aggregator.clone(), ExitSignal::new(), 16).unwrap();

        assert!(sender.send(InputEvent::PointerDelta { dx: 5.0, dy: -2.0 }));
        assert!(sender.send(InputEvent::Key { key: Key::A, pressed: true }));

        assert!(wait_until(|| {
            let raw = aggregator.peek();
            raw.keyboard_active() && raw.delta == Vec2::new(5.0, -2.0)
        }));
        listener.shutdown();
    }

    #[test]
    fn test_exit_key_raises_signal() {
        let exit = ExitSignal::new();
        let (listener, sender) =
            InputListener::spawn(Arc::new(InputAggregator::new()), exit.clone(), 4).unwrap();

        sender.send(InputEvent::Key { key: Key::End, pressed: false });
        sender.send(InputEvent::Key { key: Key::End, pressed: true });

        assert!(wait_until(|| exit.is_raised()));
        listener.shutdown();
    }

    #[test]
    fn test_shutdown_stops_worker() {
        let (listener, sender) =
            InputListener::spawn(Arc::new(InputAggregator::new()), ExitSignal::new(), 4).unwrap();
        assert!(listener.is_running());
        listener.shutdown();

        // The receiver is gone once the worker returns.
        assert!(!sender.send(InputEvent::PointerDelta { dx: 1.0, dy: 1.0 }));
    }

    #[test]
    fn test_key_transitions_survive_full_motion_channel() {
        let aggregator = Arc::new(InputAggregator::new());
        let exit = ExitSignal::new();
        let (listener, sender) = InputListener::spawn(aggregator.clone(), exit.clone(), 1).unwrap();

        {
            // Stall the worker on the aggregator so the motion channel fills up.
            let _held = aggregator.lock();
            assert!(sender.send(InputEvent::PointerDelta { dx: 1.0, dy: 0.0 }));
            let mut dropped = false;
            for _ in 0..100 {
                if !sender.send(InputEvent::PointerDelta { dx: 1.0, dy: 0.0 }) {
                    dropped = true;
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
            assert!(dropped);

            assert!(sender.send(InputEvent::Key { key: Key::W, pressed: true }));
            assert!(sender.send(InputEvent::Key { key: Key::A, pressed: true }));
            assert!(sender.send(InputEvent::Key { key: Key::A, pressed: false }));
            assert!(sender.send(InputEvent::Key { key: Key::End, pressed: true }));
        }

        assert!(wait_until(|| exit.is_raised()));
        assert!(wait_until(|| aggregator.peek().keys == Vec2::new(0.0, 1.0)));
        listener.shutdown();
    }

    #[test]
    fn test_dropping_senders_ends_worker() {
        let (listener, sender) =
            InputListener::spawn(Arc::new(InputAggregator::new()), ExitSignal::new(), 4).unwrap();
        drop(sender);
        assert!(wait_until(|| !listener.is_running()));
    }
}
