use eframe::egui;

use crate::model::{ImagePoint, MATRIX_SIZE};

/// Maps a pointer position inside the on-screen canvas box to backing-bitmap pixels.
/// No clamping: positions just outside the box map just outside the bitmap.
pub fn pointer_to_pixel(
    display: egui::Rect,
    bitmap_width: usize,
    bitmap_height: usize,
    pointer: egui::Pos2,
) -> ImagePoint {
    let (scale_x, scale_y) = display_scale(display, bitmap_width, bitmap_height);
    ImagePoint::new(
        (pointer.x - display.min.x) * scale_x,
        (pointer.y - display.min.y) * scale_y,
    )
}

/// Inverse of [`pointer_to_pixel`], used to draw bitmap-space shapes over the canvas box.
pub fn pixel_to_pointer(
    display: egui::Rect,
    bitmap_width: usize,
    bitmap_height: usize,
    point: ImagePoint,
) -> egui::Pos2 {
    let (scale_x, scale_y) = display_scale(display, bitmap_width, bitmap_height);
    let x = if scale_x > 0.0 { point.x / scale_x } else { 0.0 };
    let y = if scale_y > 0.0 { point.y / scale_y } else { 0.0 };
    egui::pos2(display.min.x + x, display.min.y + y)
}

/// Rescales a bitmap pixel into the `MATRIX_SIZE x MATRIX_SIZE` space of the resampled
/// matrix sent to the backend. ROI seeds live in that space.
pub fn pixel_to_matrix(
    bitmap_width: usize,
    bitmap_height: usize,
    point: ImagePoint,
) -> ImagePoint {
    ImagePoint::new(
        rescale(point.x, bitmap_width, MATRIX_SIZE),
        rescale(point.y, bitmap_height, MATRIX_SIZE),
    )
}

/// Inverse of [`pixel_to_matrix`].
pub fn matrix_to_pixel(
    bitmap_width: usize,
    bitmap_height: usize,
    point: ImagePoint,
) -> ImagePoint {
    ImagePoint::new(
        rescale(point.x, MATRIX_SIZE, bitmap_width),
        rescale(point.y, MATRIX_SIZE, bitmap_height),
    )
}

/// `value * to / from`; zero when `from` is.
fn rescale(value: f32, from: usize, to: usize) -> f32 {
    if from == 0 {
        return 0.0;
    }
    value * to as f32 / from as f32
}

/// `(bitmap / display)` per axis; zero for a degenerate box.
fn display_scale(display: egui::Rect, bitmap_width: usize, bitmap_height: usize) -> (f32, f32) {
    let scale_x = if display.width() > 0.0 {
        bitmap_width as f32 / display.width()
    } else {
        0.0
    };
    let scale_y = if display.height() > 0.0 {
        bitmap_height as f32 / display.height()
    } else {
        0.0
    };
    (scale_x, scale_y)
}

/// Largest square that fits `available`, centred in it.
pub fn square_display(available: egui::Rect) -> egui::Rect {
    let side = available.width().min(available.height()).max(1.0);
    egui::Rect::from_center_size(available.center(), egui::vec2(side, side))
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::{
        matrix_to_pixel, pixel_to_matrix, pixel_to_pointer, pointer_to_pixel, square_display,
    };
    use crate::model::ImagePoint;

    #[test]
    fn box_center_maps_to_bitmap_center() {
        let cases = [
            ((10.0, 20.0), (400.0, 400.0), (512, 512)),
            ((0.0, 0.0), (300.0, 150.0), (640, 480)),
            ((-5.0, 7.5), (1000.0, 250.0), (256, 1024)),
        ];
        for ((left, top), (width, height), (bw, bh)) in cases {
            let display =
                egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(width, height));
            let mapped = pointer_to_pixel(display, bw, bh, display.center());
            assert!((mapped.x - bw as f32 / 2.0).abs() < 1e-3);
            assert!((mapped.y - bh as f32 / 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn mapping_is_linear_and_unclamped() {
        let display = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(256.0, 256.0));
        let origin = pointer_to_pixel(display, 512, 512, egui::pos2(100.0, 50.0));
        assert_eq!(origin, ImagePoint::new(0.0, 0.0));
        let inside = pointer_to_pixel(display, 512, 512, egui::pos2(110.0, 60.5));
        assert_eq!(inside, ImagePoint::new(20.0, 21.0));
        let outside = pointer_to_pixel(display, 512, 512, egui::pos2(99.5, 306.5));
        assert_eq!(outside, ImagePoint::new(-1.0, 513.0));
    }

    #[test]
    fn mapping_is_deterministic() {
        let display = egui::Rect::from_min_size(egui::pos2(3.3, 4.4), egui::vec2(123.0, 77.0));
        let pointer = egui::pos2(50.1, 60.2);
        assert_eq!(
            pointer_to_pixel(display, 300, 200, pointer),
            pointer_to_pixel(display, 300, 200, pointer)
        );
    }

    #[test]
    fn inverse_mapping_returns_pointer() {
        let display = egui::Rect::from_min_size(egui::pos2(20.0, 30.0), egui::vec2(200.0, 100.0));
        let pixel = pointer_to_pixel(display, 400, 400, egui::pos2(70.0, 55.0));
        let back = pixel_to_pointer(display, 400, 400, pixel);
        assert!((back.x - 70.0).abs() < 1e-3);
        assert!((back.y - 55.0).abs() < 1e-3);
    }

    #[test]
    fn square_display_fits_shorter_side() {
        let available = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 500.0));
        let square = square_display(available);
        assert_eq!(square.width(), 500.0);
        assert_eq!(square.height(), 500.0);
        assert_eq!(square.center(), available.center());
    }

    #[test]
    fn bitmap_pixels_rescale_into_matrix_space() {
        assert_eq!(
            pixel_to_matrix(1024, 1024, ImagePoint::new(512.0, 1024.0)),
            ImagePoint::new(256.0, 512.0)
        );
        assert_eq!(
            pixel_to_matrix(256, 128, ImagePoint::new(64.0, 32.0)),
            ImagePoint::new(128.0, 128.0)
        );
        assert_eq!(
            pixel_to_matrix(512, 512, ImagePoint::new(263.0, 145.5)),
            ImagePoint::new(263.0, 145.5)
        );
        assert_eq!(
            matrix_to_pixel(256, 128, ImagePoint::new(128.0, 128.0)),
            ImagePoint::new(64.0, 32.0)
        );
        assert_eq!(pixel_to_matrix(0, 0, ImagePoint::new(5.0, 5.0)), ImagePoint::new(0.0, 0.0));
    }
}
