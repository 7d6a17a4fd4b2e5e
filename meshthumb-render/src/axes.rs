//! Coordinate axis indicators drawn behind the model
use meshthumb_core::{shapes, Mesh, Transform};
use nalgebra::{Matrix4, Vector3};

use crate::preset::Palette;

const SEGMENT_DEGREES: u32 = 30;
const SHAFT_RADIUS: f32 = 0.01;
const SHAFT_LENGTH: f32 = 2.0;
const HEAD_RADIUS: f32 = 0.03;
const HEAD_LENGTH: f32 = 0.1;
const ORIGIN_RADIUS: f32 = 0.025;
const SPHERE_DETAIL: u32 = 2;

/// A colored decoration mesh
#[derive(Debug, Clone)]
pub struct Indicator {
    pub mesh: Mesh,
    pub color: crate::shader::Color,
}

/// Shaft and head for each axis, then the origin marker.
pub fn axis_indicators(palette: &Palette) -> Vec<Indicator> {
    // Primitives are built along +z
    let up = Vector3::z();
    let axes = [
        (Vector3::x(), palette.x_axis),
        (Vector3::y(), palette.y_axis),
        (Vector3::z(), palette.z_axis),
    ];

    let mut indicators = Vec::with_capacity(axes.len() * 2 + 1);
    for (axis, color) in axes {
        let rotation = Transform::rotate_to(&up, &axis);

        let shaft = placed(
            shapes::cylinder(SEGMENT_DEGREES, false),
            rotation
                * Transform::translation_matrix(0.0, 0.0, SHAFT_LENGTH / 2.0)
                * Transform::scale_matrix(SHAFT_RADIUS, SHAFT_RADIUS, SHAFT_LENGTH),
        );
        indicators.push(Indicator { mesh: shaft, color });

        let head = placed(
            shapes::cone(SEGMENT_DEGREES, false),
            rotation
                * Transform::translation_matrix(0.0, 0.0, SHAFT_LENGTH)
                * Transform::scale_matrix(HEAD_RADIUS, HEAD_RADIUS, HEAD_LENGTH),
        );
        indicators.push(Indicator { mesh: head, color });
    }

    let origin = placed(
        shapes::icosphere(SPHERE_DETAIL),
        Transform::scale_matrix(ORIGIN_RADIUS, ORIGIN_RADIUS, ORIGIN_RADIUS),
    );
    indicators.push(Indicator {
        mesh: origin,
        color: palette.origin,
    });

    indicators
}

fn placed(mut mesh: Mesh, matrix: Matrix4<f32>) -> Mesh {
    mesh.transform(&matrix);
    mesh.smooth_normals();
    mesh
}
