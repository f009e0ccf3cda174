use image::RgbaImage;

use crate::model::{ImagePoint, Mask};

use super::{Canvas, Paint, Result};

pub const POINT_RADIUS: f32 = 5.0;

pub const POINT_PAINT: Paint = Paint {
    rgb: [255, 0, 0],
    alpha: 0.3,
};

/// Value written verbatim into every masked pixel.
pub const MASK_RGBA: [u8; 4] = [255, 0, 0, 128];

/// Composites one frame: base image at native size, then the point marker, then the
/// mask overlay. The canvas is resized to the base image before anything is drawn.
pub fn compose(
    canvas: &mut Canvas,
    base: &RgbaImage,
    point: Option<ImagePoint>,
    mask: Option<&Mask>,
) -> Result<()> {
    canvas.resize(base.width(), base.height())?;
    canvas.clear();
    canvas.draw_image(base, 0, 0);

    if let Some(point) = point {
        canvas.fill_circle(point, POINT_RADIUS, POINT_PAINT);
    }

    if let Some(mask) = mask {
        overlay_mask(canvas, mask)?;
    }
    Ok(())
}

/// Reads the whole buffer, overwrites every in-bounds masked cell with [`MASK_RGBA`] and
/// writes it back. Mask cells past the canvas edge are ignored. Returns the number of
/// pixels written.
pub fn overlay_mask(canvas: &mut Canvas, mask: &Mask) -> Result<usize> {
    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    let mut data = canvas.image_data();
    let mut written = 0;

    for ((row, col), included) in mask.cells().indexed_iter() {
        if !*included || row >= height || col >= width {
            continue;
        }
        let offset = (row * width + col) * 4;
        data[offset..offset + 4].copy_from_slice(&MASK_RGBA);
        written += 1;
    }

    canvas.put_image_data(data)?;
    Ok(written)
}
