//! Error types for backdrop.
//!
//! The simulator itself never fails at runtime: degenerate viewports and
//! missing drawing surfaces are handled by doing nothing. Errors only come
//! from invalid tuning values and from the hosts (window, GPU, PNG export).

use thiserror::Error;

/// Invalid tuning values in a [`FieldConfig`](crate::FieldConfig) or
/// [`SparkConfig`](crate::SparkConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The density constant divides the viewport area and must be non-zero.
    #[error("density must be greater than zero")]
    ZeroDensity,

    /// A random range has `start >= end` or non-finite bounds.
    #[error("{name} range is empty or not finite: {start}..{end}")]
    EmptyRange {
        name: &'static str,
        start: f32,
        end: f32,
    },

    /// A value that must be strictly positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// A value outside of its closed unit interval.
    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
}

/// Errors from GPU setup and presentation.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan/Metal/DX12/WebGPU capable device is required")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The surface reported no supported texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,

    /// Presenting a frame exhausted GPU memory.
    #[error("GPU ran out of memory")]
    OutOfMemory,
}

/// Errors surfaced by the backdrop hosts.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Rejected tuning values.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// Headless render target bigger than the rasteriser allows.
    #[error("{width}x{height} framebuffer exceeds the {max} pixel limit")]
    FramebufferTooLarge { width: u32, height: u32, max: u64 },

    /// Encoding or writing a snapshot failed.
    #[error("failed to write snapshot: {0}")]
    Image(#[from] image::ImageError),
}
