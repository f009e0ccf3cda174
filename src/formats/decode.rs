use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageBuffer, RgbaImage};

use crate::model::EncodedImage;

use super::{IoError, Result};

/// Decodes a base64 bitmap string, with or without a `data:<mime>;base64,` prefix.
pub fn decode_base64_image(text: &str) -> Result<EncodedImage> {
    let payload = match text.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => text,
    };
    let compact = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|error| IoError::Load(format!("invalid base64 payload: {error}")))?;
    Ok(EncodedImage::from_bytes(bytes))
}

/// Decodes the slice bitmap to RGBA8 at its natural size.
pub fn decode_rgba(image: &EncodedImage) -> Result<RgbaImage> {
    if image.is_empty() {
        return Err(IoError::Load("empty image payload".to_string()));
    }
    let decoded =
        image::load_from_memory(image.bytes()).map_err(|error| IoError::Load(error.to_string()))?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(IoError::Surface(format!(
            "decoded image has zero area ({}x{})",
            rgba.width(),
            rgba.height()
        )));
    }
    Ok(rgba)
}

/// Allocates a transparent RGBA surface.
pub(crate) fn acquire_surface(width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(IoError::Surface(format!(
            "surface size {width}x{height} has zero area"
        )));
    }
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| IoError::Surface(format!("surface size {width}x{height} overflows")))?;
    ImageBuffer::from_raw(width, height, vec![0_u8; len])
        .ok_or_else(|| IoError::Surface(format!("buffer does not fit {width}x{height}")))
}
