use image::RgbaImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;
use rayon::prelude::*;

use crate::model::{EncodedImage, MATRIX_SIZE, PixelMatrix};

use super::{IoError, Result, acquire_surface, decode_rgba};

/// Decodes `image`, resamples it onto a `MATRIX_SIZE x MATRIX_SIZE` surface and reduces
/// every pixel to its luminance. Rows run top to bottom, columns left to right.
pub fn extract_pixel_matrix(image: &EncodedImage) -> Result<PixelMatrix> {
    let decoded = decode_rgba(image)?;
    let surface = resample_to_surface(&decoded, MATRIX_SIZE as u32)?;
    luminance_matrix(&surface)
}

/// Draws `source` stretched over a fresh square surface of edge `size`.
pub fn resample_to_surface(source: &RgbaImage, size: u32) -> Result<RgbaImage> {
    let mut surface = acquire_surface(size, size)?;
    if source.dimensions() == (size, size) {
        imageops::replace(&mut surface, source, 0, 0);
    } else {
        let resized = imageops::resize(source, size, size, FilterType::Triangle);
        imageops::replace(&mut surface, &resized, 0, 0);
    }
    Ok(surface)
}

/// `round(0.299 R + 0.587 G + 0.114 B)`; alpha is ignored.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    value.round().clamp(0.0, 255.0) as u8
}

pub fn luminance_matrix(surface: &RgbaImage) -> Result<PixelMatrix> {
    let (width, height) = (surface.width() as usize, surface.height() as usize);
    let values = surface
        .as_raw()
        .par_chunks_exact(4)
        .map(|pixel| luminance(pixel[0], pixel[1], pixel[2]))
        .collect::<Vec<_>>();
    let values = Array2::from_shape_vec((height, width), values).map_err(|error| {
        IoError::Surface(format!("pixel buffer does not match {width}x{height}: {error}"))
    })?;
    Ok(PixelMatrix::new(values))
}
