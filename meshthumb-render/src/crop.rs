//! Trimming transparent borders from the final image
use image::{imageops, RgbaImage};

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Grow by `margin` on every side without leaving a `width`×`height` image
    pub fn expand(&self, margin: u32, width: u32, height: u32) -> Bounds {
        Bounds {
            left: self.left.saturating_sub(margin),
            top: self.top.saturating_sub(margin),
            right: self.right.saturating_add(margin).min(width - 1),
            bottom: self.bottom.saturating_add(margin).min(height - 1),
        }
    }
}

/// Bounding rectangle of all pixels with non-zero alpha.
///
/// Each edge is scanned inward on its own; the bottom and right scans stop at
/// the bounds already found by the top and left scans. Returns `None` for a
/// fully transparent image.
pub fn content_bounds(image: &RgbaImage) -> Option<Bounds> {
    let (width, height) = image.dimensions();
    let opaque = |x: u32, y: u32| image.get_pixel(x, y)[3] != 0;
    let row_has_content = |y: u32| (0..width).any(|x| opaque(x, y));

    let top = (0..height).find(|&y| row_has_content(y))?;
    let bottom = (top..height).rev().find(|&y| row_has_content(y))?;

    let column_has_content = |x: u32| (top..=bottom).any(|y| opaque(x, y));
    let left = (0..width).find(|&x| column_has_content(x))?;
    let right = (left..width).rev().find(|&x| column_has_content(x))?;

    Some(Bounds {
        left,
        top,
        right,
        bottom,
    })
}

/// Crop to the non-transparent content plus `margin` pixels on each side.
///
/// The margin is clamped to the image. A fully transparent image is
/// returned unchanged.
pub fn crop_transparent(image: &RgbaImage, margin: u32) -> RgbaImage {
    let Some(content) = content_bounds(image) else {
        log::warn!("nothing to crop: image is fully transparent");
        return image.clone();
    };

    let (width, height) = image.dimensions();
    let bounds = content.expand(margin, width, height);
    log::debug!("cropping {width}x{height} to {bounds:?}");

    imageops::crop_imm(image, bounds.left, bounds.top, bounds.width(), bounds.height()).to_image()
}
