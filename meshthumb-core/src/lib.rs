//! meshthumb core library - mesh geometry shared by the thumbnail tools
//!
//! Provides STL loading, mesh normalization, decorative primitives, and the
//! transformation and camera matrices the rasterizer consumes.

pub mod error;
pub mod geometry;
pub mod normalize;
pub mod projection;
pub mod shapes;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use error::MeshError;
pub use geometry::{BoundingBox, Mesh, Triangle, Vertex};
pub use normalize::{normalize, Normalization};
pub use projection::Camera;
pub use stl::load_stl;
pub use transform::Transform;
