use image::{Rgba, RgbaImage};

use crate::formats::acquire_surface;
use crate::model::ImagePoint;

use super::{RenderError, Result};

/// Fill colour with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

/// RGBA8 backing store. Pixels are stored unpremultiplied; drawing uses source-over.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
        }
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    /// Reallocates the backing store. The new store is fully transparent.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixels = acquire_surface(width, height)?;
        Ok(())
    }

    /// Drops the backing store entirely.
    pub fn release(&mut self) {
        self.pixels = RgbaImage::new(0, 0);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        for (sx, sy, source) in image.enumerate_pixels() {
            let dx = u32::try_from(x + i64::from(sx));
            let dy = u32::try_from(y + i64::from(sy));
            let (Ok(dx), Ok(dy)) = (dx, dy) else {
                continue;
            };
            if let Some(target) = self.pixels.get_pixel_mut_checked(dx, dy) {
                let alpha = f32::from(source.0[3]) / 255.0;
                *target = blend(*target, [source.0[0], source.0[1], source.0[2]], alpha);
            }
        }
    }

    /// Fills every pixel whose centre lies within `radius` of `center`. Pixels outside the
    /// canvas are skipped.
    pub fn fill_circle(&mut self, center: ImagePoint, radius: f32, paint: Paint) {
        if !center.x.is_finite() || !center.y.is_finite() || radius <= 0.0 {
            return;
        }
        let (width, height) = (self.width() as f32, self.height() as f32);
        let min_x = (center.x - radius).floor().max(0.0);
        let max_x = (center.x + radius).ceil().min(width);
        let min_y = (center.y - radius).floor().max(0.0);
        let max_y = (center.y + radius).ceil().min(height);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let radius_sq = radius * radius;
        for py in min_y as u32..max_y as u32 {
            for px in min_x as u32..max_x as u32 {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                if let Some(target) = self.pixels.get_pixel_mut_checked(px, py) {
                    *target = blend(*target, paint.rgb, paint.alpha);
                }
            }
        }
    }

    /// Copy of the full RGBA buffer, row-major, four bytes per pixel.
    pub fn image_data(&self) -> Vec<u8> {
        self.pixels.as_raw().clone()
    }

    /// Writes back a buffer previously taken with [`Canvas::image_data`].
    pub fn put_image_data(&mut self, data: Vec<u8>) -> Result<()> {
        let (width, height) = self.pixels.dimensions();
        let expected = width as usize * height as usize * 4;
        let found = data.len();
        let mismatch = RenderError::BufferLength {
            width,
            height,
            expected,
            found,
        };
        if found != expected {
            return Err(mismatch);
        }
        self.pixels = RgbaImage::from_raw(width, height, data).ok_or(mismatch)?;
        Ok(())
    }
}

fn blend(target: Rgba<u8>, rgb: [u8; 3], alpha: f32) -> Rgba<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let dst_alpha = f32::from(target.0[3]) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |src: u8, dst: u8| {
        let value =
            (f32::from(src) * alpha + f32::from(dst) * dst_alpha * (1.0 - alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(rgb[0], target.0[0]),
        channel(rgb[1], target.0[1]),
        channel(rgb[2], target.0[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
