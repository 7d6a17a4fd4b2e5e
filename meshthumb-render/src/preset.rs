//! Visualization presets and the per-invocation render configuration
use std::path::Path;

use meshthumb_core::Camera;
use nalgebra::{Point3, Vector3};

use crate::shader::Color;

/// File names starting with this prefix are rendered as flat 2D shapes
pub const TWO_D_PREFIX: &str = "2d_";

/// Fixed camera and lighting setups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Isometric view with coordinate axes
    ThreeD,
    /// Top-down view, no axes, cropped to content
    TwoD,
}

impl Preset {
    /// Pick the preset from the base name of `path`
    pub fn from_path(path: &Path) -> Self {
        let is_2d = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with(TWO_D_PREFIX))
            .unwrap_or(false);
        if is_2d {
            Preset::TwoD
        } else {
            Preset::ThreeD
        }
    }
}

/// Colors used by both rendering passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub x_axis: Color,
    pub y_axis: Color,
    pub z_axis: Color,
    pub origin: Color,
    pub model: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            x_axis: Color::rgb8(0xBF, 0x15, 0x06),
            y_axis: Color::rgb8(0x5A, 0xBF, 0x56),
            z_axis: Color::rgb8(0x1B, 0x52, 0xBF),
            origin: Color::rgb8(0x33, 0x33, 0x33),
            model: Color::rgb8(0x21, 0x85, 0xC5),
            background: Color::TRANSPARENT,
        }
    }
}

/// Everything a render needs; built once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub preset: Preset,
    pub camera: Camera,
    pub axis_light: Vector3<f32>,
    pub model_light: Vector3<f32>,
    pub palette: Palette,
    /// Output size in pixels
    pub width: u32,
    pub height: u32,
    /// Framebuffer is this many times larger than the output on each axis
    pub supersample: u32,
    pub draw_axes: bool,
    /// Margin kept around the content when cropping; `None` disables cropping
    pub crop_margin: Option<u32>,
}

impl RenderConfig {
    pub fn for_preset(preset: Preset) -> Self {
        let (camera, model_light) = match preset {
            Preset::ThreeD => (
                Camera::new(Point3::new(3.0, 3.0, 3.0), Point3::origin(), Vector3::z()),
                Vector3::new(0.75, 0.25, 1.0),
            ),
            Preset::TwoD => (
                Camera::new(Point3::new(0.0, 0.0, 3.0), Point3::origin(), Vector3::y()),
                Vector3::new(0.25, 0.5, 1.0),
            ),
        };

        Self {
            preset,
            camera,
            axis_light: Vector3::new(1.0, 1.0, 1.0),
            model_light,
            palette: Palette::default(),
            width: 1024,
            height: 1024,
            supersample: 4,
            draw_axes: preset == Preset::ThreeD,
            crop_margin: (preset == Preset::TwoD).then_some(1),
        }
    }

    pub fn for_input(path: &Path) -> Self {
        Self::for_preset(Preset::from_path(path))
    }

    /// Framebuffer size before downsampling
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let factor = self.supersample.max(1);
        (self.width * factor, self.height * factor)
    }
}
