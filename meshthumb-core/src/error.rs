//! Errors raised while loading or preparing a mesh
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid STL data: {0}")]
    Parse(String),
    #[error("truncated binary STL: header declares {expected} triangles but only {found} fit")]
    Truncated { expected: usize, found: usize },
    /// The mesh is empty, collapses to a point, or has non-finite coordinates
    #[error("mesh has no extent to normalize")]
    Degenerate,
}
