//! Rescaling a loaded mesh into the canonical viewing volume
use nalgebra::Matrix4;

use crate::error::MeshError;
use crate::geometry::Mesh;

/// How a mesh is brought into the [-1, 1] cube before rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Center the bounding box on the origin and fit it to the cube
    #[default]
    CenterAndFit,
    /// Uniform scale about the origin only; placement is preserved
    ScaleOnly,
}

/// Normalize `mesh` in place and return the applied matrix.
pub fn normalize(mesh: &mut Mesh, policy: Normalization) -> Result<Matrix4<f32>, MeshError> {
    let matrix = match policy {
        Normalization::CenterAndFit => mesh.bi_unit_cube()?,
        Normalization::ScaleOnly => mesh.unit_scale()?,
    };
    log::debug!("normalized mesh ({policy:?}) with {matrix}");
    Ok(matrix)
}
