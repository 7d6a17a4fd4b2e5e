//! Z-buffered triangle rasterizer writing into an RGBA framebuffer
use std::fmt;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use meshthumb_core::{Mesh, Triangle};
use nalgebra::{Point3, Vector3};

use crate::shader::{Color, PhongShader};

/// Counters reported for one `draw_mesh` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub total_faces: usize,
    pub rendered_faces: usize,
    pub total_pixels: usize,
    pub updated_pixels: usize,
    pub duration: Duration,
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = |part: usize, whole: usize| {
            if whole == 0 {
                0.0
            } else {
                100.0 * part as f64 / whole as f64
            }
        };
        write!(
            f,
            "{} / {} ({:.0}%) faces, {} / {} ({:.0}%) pixels",
            self.rendered_faces,
            self.total_faces,
            percent(self.rendered_faces, self.total_faces),
            self.updated_pixels,
            self.total_pixels,
            percent(self.updated_pixels, self.total_pixels),
        )
    }
}

/// A vertex after projection to screen space
#[derive(Debug, Clone, Copy, Default)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
}

/// Software rasterizer with a depth buffer.
///
/// Counter-clockwise triangles face the camera; back faces are culled.
pub struct Rasterizer {
    width: u32,
    height: u32,
    depth_buffer: Vec<f32>,
    color_buffer: RgbaImage,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            color_buffer: RgbaImage::new(width, height),
        }
    }

    /// Reset the depth buffer and fill the color buffer with `color`
    pub fn clear(&mut self, color: Color) {
        self.depth_buffer.fill(f32::INFINITY);
        let pixel = color.to_rgba8();
        for p in self.color_buffer.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn draw_mesh(&mut self, mesh: &Mesh, shader: &PhongShader) -> RenderStats {
        let start = Instant::now();
        let mut stats = RenderStats {
            total_faces: mesh.len(),
            total_pixels: self.depth_buffer.len(),
            ..RenderStats::default()
        };

        for triangle in &mesh.triangles {
            if let Some(updated) = self.draw_triangle(triangle, shader) {
                stats.rendered_faces += 1;
                stats.updated_pixels += updated;
            }
        }

        stats.duration = start.elapsed();
        stats
    }

    /// Returns the number of pixels written, or `None` if the triangle was
    /// clipped or culled.
    fn draw_triangle(&mut self, triangle: &Triangle, shader: &PhongShader) -> Option<usize> {
        let mut screen = [ScreenVertex::default(); 3];
        let mut ndc = [(0.0f32, 0.0f32); 3];
        for (i, vertex) in triangle.vertices.iter().enumerate() {
            let clip = shader.vertex(&vertex.position);
            if clip.w <= f32::EPSILON {
                return None;
            }
            let (x, y, z) = (clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
            ndc[i] = (x, y);
            screen[i] = ScreenVertex {
                x: (x + 1.0) * 0.5 * self.width as f32,
                y: (1.0 - y) * 0.5 * self.height as f32,
                depth: z,
            };
        }

        // Signed area in NDC, where y points up
        let [a, b, c] = ndc;
        let area = (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1);
        if area <= 0.0 {
            return None;
        }

        Some(self.rasterize_triangle(triangle, &screen, shader))
    }

    fn rasterize_triangle(
        &mut self,
        triangle: &Triangle,
        coords: &[ScreenVertex; 3],
        shader: &PhongShader,
    ) -> usize {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        let [a, b, c] = &triangle.vertices;
        let mut updated = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width as usize + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let position = Point3::from(
                    a.position.coords * w0 + b.position.coords * w1 + c.position.coords * w2,
                );
                let normal: Vector3<f32> = a.normal * w0 + b.normal * w1 + c.normal * w2;
                let color = shader.fragment(&position, &normal);

                self.depth_buffer[idx] = depth;
                self.color_buffer.put_pixel(x as u32, y as u32, color.to_rgba8());
                updated += 1;
            }
        }

        updated
    }

    /// Depth of the nearest fragment at a pixel, `None` if nothing was drawn
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        let depth = self.depth_buffer[y as usize * self.width as usize + x as usize];
        depth.is_finite().then_some(depth)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.color_buffer.get_pixel(x, y)
    }

    pub fn into_image(self) -> RgbaImage {
        self.color_buffer
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
