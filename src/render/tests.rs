use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};

use super::{Canvas, MASK_RGBA, RenderKey, RenderPipeline, compose, overlay_mask};
use crate::model::{
    EncodedImage, ImagePoint, MATRIX_SIZE, Mask, SliceSequence, ViewerState,
};

const BASE: [u8; 4] = [10, 20, 30, 255];

fn base_image(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_pixel(width, height, Rgba(BASE))
}

fn encoded(width: u32, height: u32) -> EncodedImage {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(base_image(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    EncodedImage::from_bytes(bytes)
}

#[test]
fn base_image_is_drawn_at_native_size() {
    let mut canvas = Canvas::new();
    compose(&mut canvas, &base_image(7, 3), None, None).expect("compose");
    assert_eq!((canvas.width(), canvas.height()), (7, 3));
    assert!(canvas.pixels().pixels().all(|pixel| pixel.0 == BASE));
}

#[test]
fn point_marker_is_translucent_red_disc() {
    let mut canvas = Canvas::new();
    let point = ImagePoint::new(10.0, 10.0);
    compose(&mut canvas, &base_image(20, 20), Some(point), None).expect("compose");

    let center = canvas.pixel(10, 10).expect("center");
    assert!(center[0] > BASE[0]);
    assert!(center[1] < BASE[1]);
    assert!(center[2] < BASE[2]);
    assert_eq!(center[3], 255);

    assert_eq!(canvas.pixel(10, 16), Some(BASE));
    assert_eq!(canvas.pixel(0, 0), Some(BASE));
    assert_eq!(canvas.pixel(14, 10), Some(center));
}

#[test]
fn point_outside_canvas_is_skipped() {
    let mut canvas = Canvas::new();
    compose(
        &mut canvas,
        &base_image(8, 8),
        Some(ImagePoint::new(-50.0, 400.0)),
        None,
    )
    .expect("compose");
    assert!(canvas.pixels().pixels().all(|pixel| pixel.0 == BASE));

    compose(
        &mut canvas,
        &base_image(8, 8),
        Some(ImagePoint::new(f32::NAN, 2.0)),
        None,
    )
    .expect("compose");
    assert!(canvas.pixels().pixels().all(|pixel| pixel.0 == BASE));
}

#[test]
fn full_mask_replaces_every_pixel_within_bounds() {
    let mut canvas = Canvas::new();
    let mask = Mask::filled(MATRIX_SIZE, MATRIX_SIZE, true);
    compose(&mut canvas, &base_image(16, 12), None, Some(&mask)).expect("compose");
    assert!(canvas.pixels().pixels().all(|pixel| pixel.0 == MASK_RGBA));
}

#[test]
fn smaller_mask_leaves_remaining_pixels_untouched() {
    let mut canvas = Canvas::new();
    compose(&mut canvas, &base_image(4, 4), None, None).expect("compose");
    let mask = Mask::from_rows(vec![vec![true, false], vec![true, true]]).expect("mask");
    let written = overlay_mask(&mut canvas, &mask).expect("overlay");
    assert_eq!(written, 3);
    assert_eq!(canvas.pixel(0, 0), Some(MASK_RGBA));
    assert_eq!(canvas.pixel(1, 0), Some(BASE));
    assert_eq!(canvas.pixel(0, 1), Some(MASK_RGBA));
    assert_eq!(canvas.pixel(1, 1), Some(MASK_RGBA));
    assert_eq!(canvas.pixel(2, 0), Some(BASE));
    assert_eq!(canvas.pixel(3, 3), Some(BASE));
}

#[test]
fn wide_mask_does_not_wrap_into_next_row() {
    let mut canvas = Canvas::new();
    compose(&mut canvas, &base_image(2, 2), None, None).expect("compose");
    let mask = Mask::from_rows(vec![vec![false, false, true, true]]).expect("mask");
    assert_eq!(overlay_mask(&mut canvas, &mask).expect("overlay"), 0);
    assert!(canvas.pixels().pixels().all(|pixel| pixel.0 == BASE));
}

#[test]
fn mask_overrides_point_marker() {
    let mut canvas = Canvas::new();
    let mask = Mask::filled(MATRIX_SIZE, MATRIX_SIZE, true);
    compose(
        &mut canvas,
        &base_image(12, 12),
        Some(ImagePoint::new(6.0, 6.0)),
        Some(&mask),
    )
    .expect("compose");
    assert_eq!(canvas.pixel(6, 6), Some(MASK_RGBA));
}

#[test]
fn put_image_data_rejects_wrong_length() {
    let mut canvas = Canvas::new();
    canvas.resize(2, 2).expect("resize");
    assert!(canvas.put_image_data(vec![0; 3]).is_err());
    assert!(canvas.resize(0, 5).is_err());
}

#[test]
fn pipeline_redraws_only_on_state_change() {
    let mut viewer = ViewerState::new(SliceSequence::new(vec![encoded(6, 4), encoded(3, 5)]));
    let mut pipeline = RenderPipeline::new();
    assert!(pipeline.last_key().is_none());

    assert!(pipeline.ensure_rendered(&viewer).expect("first"));
    assert_eq!(pipeline.last_key(), RenderKey::for_viewer(&viewer).as_ref());
    assert!(!pipeline.ensure_rendered(&viewer).expect("unchanged"));
    assert_eq!(pipeline.canvas().width(), 6);

    pipeline.invalidate();
    assert!(pipeline.last_key().is_none());
    assert!(pipeline.ensure_rendered(&viewer).expect("invalidated"));

    viewer.navigation_mut().step_forward();
    assert!(pipeline.needs_redraw(&viewer));
    assert!(pipeline.ensure_rendered(&viewer).expect("navigated"));
    assert_eq!((pipeline.canvas().width(), pipeline.canvas().height()), (3, 5));

    viewer
        .set_active_point(ImagePoint::new(1.0, 1.0))
        .expect("point");
    assert!(pipeline.ensure_rendered(&viewer).expect("point change"));

    viewer
        .set_mask(1, Mask::filled(MATRIX_SIZE, MATRIX_SIZE, true))
        .expect("mask");
    assert!(pipeline.ensure_rendered(&viewer).expect("mask change"));
    assert!(pipeline.canvas().pixels().pixels().all(|pixel| pixel.0 == MASK_RGBA));

    viewer.navigation_mut().step_backward();
    assert!(pipeline.ensure_rendered(&viewer).expect("back"));
    assert!(pipeline.canvas().pixels().pixels().all(|pixel| pixel.0 == BASE));
}

#[test]
fn undecodable_slice_fails_once_without_retry() {
    let viewer = ViewerState::new(SliceSequence::new(vec![EncodedImage::from_bytes(vec![0, 1])]));
    let mut pipeline = RenderPipeline::new();
    assert!(pipeline.ensure_rendered(&viewer).is_err());
    assert!(!pipeline.ensure_rendered(&viewer).expect("not retried"));
    assert_eq!(pipeline.canvas().width(), 0);
}

#[test]
fn empty_viewer_renders_nothing() {
    let viewer = ViewerState::default();
    let mut pipeline = RenderPipeline::new();
    assert!(!pipeline.ensure_rendered(&viewer).expect("empty"));
    assert_eq!(pipeline.canvas().width(), 0);
}
