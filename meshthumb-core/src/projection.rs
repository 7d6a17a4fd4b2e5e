//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Orthographic camera looking at `target` from `position`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Half width and half height of the view volume
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        Self {
            position,
            target,
            up,
            half_extent: 2.0,
            near: 1.0,
            far: 10.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_orthographic(
            -self.half_extent,
            self.half_extent,
            -self.half_extent,
            self.half_extent,
            self.near,
            self.far,
        )
    }

    /// World space to clip space
    pub fn view_projection(&self) -> Matrix4<f32> {
        Transform::mvp_matrix(
            &Matrix4::identity(),
            &self.view_matrix(),
            &self.projection_matrix(),
        )
    }
}
