mod canvas;
mod compose;
mod error;
mod pipeline;

#[cfg(test)]
mod tests;

pub use canvas::{Canvas, Paint};
pub use compose::{MASK_RGBA, POINT_PAINT, POINT_RADIUS, compose, overlay_mask};
pub use error::{RenderError, Result};
pub use pipeline::{RenderKey, RenderPipeline};
