use topo_planet::PlanetError;
use topo_render::{RenderContextError, SurfaceError, TextureError};

/// Anything that stops the viewer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    RenderContext(#[from] RenderContextError),

    #[error("frame presentation failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Planet(#[from] PlanetError),
}
