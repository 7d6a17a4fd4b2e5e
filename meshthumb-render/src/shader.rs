//! Colors and the Phong fragment model
use std::ops::{Add, Mul};

use image::Rgba;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Linear RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value, 1.0)
    }

    /// Opaque color from 8-bit channels, e.g. `Color::rgb8(0xBF, 0x15, 0x06)`
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, self.a * factor)
    }

    /// Component-wise minimum with `other`
    pub fn min(self, other: Color) -> Self {
        Self::new(
            self.r.min(other.r),
            self.g.min(other.g),
            self.b.min(other.b),
            self.a.min(other.a),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba8(self) -> Rgba<u8> {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(self.r), channel(self.g), channel(self.b), channel(self.a)])
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

/// Phong shading with a single directional light
#[derive(Debug, Clone)]
pub struct PhongShader {
    /// World space to clip space
    pub matrix: Matrix4<f32>,
    /// Unit vector pointing towards the light
    pub light_direction: Vector3<f32>,
    pub camera_position: Point3<f32>,
    pub object_color: Color,
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub specular_power: f32,
}

impl PhongShader {
    pub fn new(
        matrix: Matrix4<f32>,
        light_direction: Vector3<f32>,
        camera_position: Point3<f32>,
    ) -> Self {
        Self {
            matrix,
            light_direction: light_direction.normalize(),
            camera_position,
            object_color: Color::WHITE,
            ambient_color: Color::gray(0.2),
            diffuse_color: Color::gray(0.8),
            specular_color: Color::WHITE,
            specular_power: 32.0,
        }
    }

    /// Project a world position into clip space
    pub fn vertex(&self, position: &Point3<f32>) -> Vector4<f32> {
        self.matrix * position.to_homogeneous()
    }

    /// Shade a fragment at world `position` with interpolated `normal`
    pub fn fragment(&self, position: &Point3<f32>, normal: &Vector3<f32>) -> Color {
        let normal = normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        let mut light = self.ambient_color;
        let diffuse = normal.dot(&self.light_direction).max(0.0);
        light = light + self.diffuse_color.scale(diffuse);

        if diffuse > 0.0 && self.specular_power > 0.0 {
            let to_camera = (self.camera_position - position)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let reflected = reflect(&-self.light_direction, &normal);
            let specular = to_camera.dot(&reflected).max(0.0);
            if specular > 0.0 {
                light = light + self.specular_color.scale(specular.powf(self.specular_power));
            }
        }

        (self.object_color * light)
            .min(Color::WHITE)
            .with_alpha(self.object_color.a)
    }
}

fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}
