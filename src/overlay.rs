//! Overlay host: window, event loop and tick scheduling.
//!
//! The overlay is a borderless, transparent, always-on-top window covering
//! the primary monitor with cursor hit-testing disabled, so clicks fall
//! through to whatever is underneath. It never needs focus: raw device events
//! are enabled unconditionally and forwarded to the [`InputListener`]. Raw
//! mouse motion is the only pointer source; window cursor events are ignored
//! so motion over the window is not counted twice.
//!
//! Ticks run on the event-loop thread at a fixed interval using
//! `ControlFlow::WaitUntil`. Each tick reads a config snapshot, runs the
//! [`Simulation`] and uploads the resulting sprites; the redraw that follows
//! presents them.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! Overlay::new(SharedConfig::default()).run()?;
//! ```

use crate::config::SharedConfig;
use crate::error::OverlayError;
use crate::gpu::GpuState;
use crate::input::{ExitSignal, InputAggregator, InputEvent, Key};
use crate::listener::{InputListener, InputSender, DEFAULT_CAPACITY};
use crate::simulation::Simulation;
use crate::time::{TickClock, DEFAULT_TICK_INTERVAL};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, RawKeyEvent, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, DeviceEvents, EventLoop},
    window::{Window, WindowId, WindowLevel},
};

/// Builder and runner for the overlay.
pub struct Overlay {
    config: SharedConfig,
    seed: Option<u64>,
    tick_interval: Duration,
    listener_capacity: usize,
    exit: ExitSignal,
}

impl Overlay {
    /// Overlay driven by `config`.
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            seed: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            listener_capacity: DEFAULT_CAPACITY,
            exit: ExitSignal::new(),
        }
    }

    /// Handle that stops the overlay when raised, e.g. from the control
    /// console.
    pub fn exit_signal(&self) -> ExitSignal {
        self.exit.clone()
    }

    /// Seed the spawn RNG for a reproducible pattern.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Capacity of the input event channel.
    pub fn with_listener_capacity(mut self, capacity: usize) -> Self {
        self.listener_capacity = capacity;
        self
    }

    /// Open the overlay and block until the exit key is pressed or the
    /// window is closed.
    pub fn run(self) -> Result<(), OverlayError> {
        let event_loop = EventLoop::new()?;
        event_loop.listen_device_events(DeviceEvents::Always);

        let aggregator = Arc::new(InputAggregator::new());
        let exit = self.exit;
        let (listener, sender) =
            InputListener::spawn(aggregator.clone(), exit.clone(), self.listener_capacity)?;

        let mut app = OverlayApp {
            config: self.config,
            seed: self.seed,
            aggregator,
            exit,
            sender,
            clock: TickClock::new(self.tick_interval),
            window: None,
            gpu: None,
            simulation: None,
            error: None,
        };

        log::info!("overlay running; press End to quit");
        let result = event_loop.run_app(&mut app);

        // Particle and velocity state is simply dropped with the app.
        listener.shutdown();
        log::info!("overlay stopped");

        result?;
        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct OverlayApp {
    config: SharedConfig,
    seed: Option<u64>,
    aggregator: Arc<InputAggregator>,
    exit: ExitSignal,
    sender: InputSender,
    clock: TickClock,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    simulation: Option<Simulation>,
    /// Fatal error raised inside a callback, reported once the loop returns.
    error: Option<OverlayError>,
}

impl OverlayApp {
    fn create_overlay(&mut self, event_loop: &ActiveEventLoop) -> Result<(), OverlayError> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or(OverlayError::NoMonitor)?;
        let scale = monitor.scale_factor();
        let logical: LogicalSize<f32> = monitor.size().to_logical(scale);

        let window_attrs = Window::default_attributes()
            .with_title("driftfield")
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_position(monitor.position())
            .with_inner_size(monitor.size());

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        if let Err(e) = window.set_cursor_hittest(false) {
            log::warn!("click-through unavailable: {e}");
        }
        log::debug!(
            "overlay window {}x{} (scale {scale})",
            logical.width,
            logical.height
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            (logical.width, logical.height),
        ))?;

        let simulation = Simulation::new(logical.width, logical.height);
        self.simulation = Some(match self.seed {
            Some(seed) => simulation.with_seed(seed),
            None => simulation,
        });
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn run_tick(&mut self) {
        let config = self.config.snapshot();
        let step = self.clock.tick(config.tick_mode);

        let (Some(simulation), Some(gpu)) = (&mut self.simulation, &mut self.gpu) else {
            return;
        };
        let frame = simulation.tick(&self.aggregator, &config, step.scale);
        gpu.upload(&frame.sprites);

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: OverlayError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for OverlayApp {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        if self.exit.is_raised() {
            event_loop.exit();
            return;
        }
        // Device events wake the loop far more often than the tick rate.
        if self.clock.is_due(Instant::now()) {
            self.run_tick();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.create_overlay(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) {
                    gpu.resize(physical_size);
                    let logical: LogicalSize<f32> = physical_size.to_logical(window.scale_factor());
                    gpu.set_viewport(logical.width, logical.height);
                    if let Some(simulation) = &mut self.simulation {
                        simulation.resize(logical.width, logical.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &mut self.gpu {
                    match gpu.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(event) = device_input(event) {
            self.sender.send(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit.is_raised() {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
    }
}

/// Translate a raw device event into listener input.
fn device_input(event: DeviceEvent) -> Option<InputEvent> {
    match event {
        DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::PointerDelta { dx, dy }),
        DeviceEvent::Key(RawKeyEvent {
            physical_key,
            state,
        }) => Key::from_physical(physical_key).map(|key| InputEvent::Key {
            key,
            pressed: state == ElementState::Pressed,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::velocity::VelocityModel;
    use crate::Config;
    use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

    #[test]
    fn test_mouse_motion_counted_once() {
        let input = InputAggregator::new();
        let event = device_input(DeviceEvent::MouseMotion { delta: (10.0, 0.0) });
        assert_eq!(event, Some(InputEvent::PointerDelta { dx: 10.0, dy: 0.0 }));

        if let Some(event) = event {
            input.apply(event);
        }
        let raw = input.peek();
        assert_eq!(raw.delta.x, 10.0);
        let impulse = VelocityModel::impulse(&raw, &Config::default());
        assert!((impulse.x - -0.2).abs() < 1e-6);
    }

    #[test]
    fn test_raw_keys_translated() {
        let press = device_input(DeviceEvent::Key(RawKeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::KeyS),
            state: ElementState::Pressed,
        }));
        assert_eq!(press, Some(InputEvent::Key { key: Key::S, pressed: true }));

        let release = device_input(DeviceEvent::Key(RawKeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::End),
            state: ElementState::Released,
        }));
        assert_eq!(release, Some(InputEvent::Key { key: Key::End, pressed: false }));

        let unknown = device_input(DeviceEvent::Key(RawKeyEvent {
            physical_key: PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            state: ElementState::Pressed,
        }));
        assert_eq!(unknown, None);
    }
}
