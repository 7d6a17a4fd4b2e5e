//! load → normalize → rasterize → downsample → crop → save
use std::path::Path;

use image::{imageops, imageops::FilterType, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use meshthumb_core::{load_stl, normalize, Mesh, Normalization};

use crate::axes::axis_indicators;
use crate::crop::crop_transparent;
use crate::error::RenderError;
use crate::preset::RenderConfig;
use crate::rasterizer::{RenderStats, Rasterizer};
use crate::shader::{Color, PhongShader};

/// Result of one render: the final image and the model pass statistics
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub image: RgbaImage,
    pub stats: RenderStats,
}

/// One configured render of one mesh
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RenderConfig,
    normalization: Normalization,
}

impl Pipeline {
    pub fn new(config: RenderConfig, normalization: Normalization) -> Self {
        Self {
            config,
            normalization,
        }
    }

    /// Pipeline with the preset implied by the input file name
    pub fn for_input(input: &Path, normalization: Normalization) -> Self {
        Self::new(RenderConfig::for_input(input), normalization)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Load, render and write a thumbnail; returns the model pass stats.
    pub fn run(&self, input: &Path, output: &Path) -> Result<RenderStats, RenderError> {
        let thumbnail = self.render_file(input)?;
        thumbnail
            .image
            .save_with_format(output, ImageFormat::Png)?;
        log::info!(
            "wrote {}x{} thumbnail to {}",
            thumbnail.image.width(),
            thumbnail.image.height(),
            output.display()
        );
        Ok(thumbnail.stats)
    }

    pub fn render_file(&self, input: &Path) -> Result<Thumbnail, RenderError> {
        let mesh = load_stl(input)?;
        log::info!("loaded {} triangles from {}", mesh.len(), input.display());
        self.render(mesh)
    }

    pub fn render(&self, mut mesh: Mesh) -> Result<Thumbnail, RenderError> {
        normalize(&mut mesh, self.normalization)?;

        let config = &self.config;
        let (width, height) = config.framebuffer_size();
        let mut rasterizer = Rasterizer::new(width, height);
        rasterizer.clear(config.palette.background);

        let matrix = config.camera.view_projection();
        let eye = config.camera.position;

        if config.draw_axes {
            let mut shader = PhongShader::new(matrix, config.axis_light, eye);
            shader.ambient_color = Color::gray(0.4);
            shader.diffuse_color = Color::gray(0.7);
            shader.specular_color = Color::gray(0.0);
            for indicator in axis_indicators(&config.palette) {
                shader.object_color = indicator.color;
                rasterizer.draw_mesh(&indicator.mesh, &shader);
            }
        }

        // the model pass runs last so the axes never hide it
        let mut shader = PhongShader::new(matrix, config.model_light, eye);
        shader.object_color = config.palette.model;
        shader.ambient_color = Color::gray(0.3);
        shader.diffuse_color = Color::gray(0.9);
        shader.specular_color = Color::gray(0.2);
        shader.specular_power = 10.0;
        let stats = rasterizer.draw_mesh(&mesh, &shader);
        log::debug!("model pass: {stats}");

        let mut image = rasterizer.into_image();
        if image.dimensions() != (config.width, config.height) {
            image = downsample(&image, config.width, config.height);
        }
        if let Some(margin) = config.crop_margin {
            image = crop_transparent(&image, margin);
        }

        Ok(Thumbnail { image, stats })
    }
}

/// Bilinear resize in premultiplied alpha.
///
/// Color channels are weighted by alpha while filtering and divided back out
/// afterwards, so the transparent background adds no color to edge pixels.
pub fn downsample(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied: ImageBuffer<Rgba<u16>, Vec<u16>> =
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
            let coverage = f32::from(a) / 255.0;
            let channel = |c: u8| (f32::from(c) * coverage * 257.0).round() as u16;
            Rgba([channel(r), channel(g), channel(b), u16::from(a) * 257])
        });

    let resized = imageops::resize(&premultiplied, width, height, FilterType::Triangle);

    RgbaImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *resized.get_pixel(x, y);
        if a == 0 {
            return Color::TRANSPARENT.to_rgba8();
        }
        let alpha = f32::from(a);
        let channel = |c: u16| f32::from(c) / alpha;
        Color::new(channel(r), channel(g), channel(b), alpha / 65535.0).to_rgba8()
    })
}
