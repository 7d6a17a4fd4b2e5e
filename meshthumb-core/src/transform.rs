//! 3D transformation matrices
use nalgebra::{Matrix4, Rotation3, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Rotation that maps direction `from` onto direction `to`.
    ///
    /// Opposite directions rotate half a turn around an axis perpendicular
    /// to `from`.
    pub fn rotate_to(from: &Vector3<f32>, to: &Vector3<f32>) -> Matrix4<f32> {
        let rotation = Rotation3::rotation_between(from, to).unwrap_or_else(|| {
            let axis = Unit::new_normalize(perpendicular(from));
            Rotation3::from_axis_angle(&axis, std::f32::consts::PI)
        });
        rotation.to_homogeneous()
    }

    /// Combine model, view and projection into one matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

/// Any vector perpendicular to `v`
fn perpendicular(v: &Vector3<f32>) -> Vector3<f32> {
    let other = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&other)
}
