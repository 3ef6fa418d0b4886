//! Error types for driftfield.
//!
//! Particle bookkeeping never fails; everything here comes from the edges of
//! the program: configuration input, GPU setup, and the window/event loop.

use thiserror::Error;

/// Errors produced when applying or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter name is not one of the recognised names.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    /// The value was NaN or infinite.
    #[error("parameter '{name}' must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    /// A control line could not be split into `name value`.
    #[error("malformed control line '{0}', expected '<name> <value>'")]
    Malformed(String),
    /// Failed to read a configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file was not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports Vulkan, Metal, DX12 or GL")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the overlay.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the overlay window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The input listener thread could not be started.
    #[error("failed to start input listener: {0}")]
    Listener(#[source] std::io::Error),
    /// No monitor was available to size the overlay against.
    #[error("no monitor available to cover")]
    NoMonitor,
}
