//! Errors surfaced by the thumbnail tools
use meshthumb_core::MeshError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("expected exactly two arguments, got {0}")]
    Usage(usize),
}
