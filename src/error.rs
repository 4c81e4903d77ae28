use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the program. All of them come from the window or the
/// GPU; creature physics never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load sprite {path}: {source}")]
    Sprite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no usable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

pub type Result<T> = std::result::Result<T, Error>;
