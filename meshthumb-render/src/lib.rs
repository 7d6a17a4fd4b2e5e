//! meshthumb render library - documentation thumbnails for STL meshes
//!
//! Renders a normalized mesh with a fixed camera, optional axis indicators
//! and Phong lighting into a supersampled RGBA framebuffer, then downsamples
//! and optionally crops it into a PNG.

pub mod axes;
pub mod cli;
pub mod crop;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod preset;
pub mod rasterizer;
pub mod shader;

pub use error::RenderError;
pub use pipeline::{Pipeline, Thumbnail};
pub use preset::{Palette, Preset, RenderConfig};
pub use rasterizer::{RenderStats, Rasterizer};
pub use shader::{Color, PhongShader};
