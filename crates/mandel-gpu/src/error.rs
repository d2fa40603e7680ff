//! GPU error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("No GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("Surface reports no supported texture formats")]
    NoSurfaceFormat,

    /// A shader module, layout or pipeline failed validation.
    #[error("Failed to set up {resource}: {message}")]
    Setup {
        resource: &'static str,
        message: String,
    },
}
