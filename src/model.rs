mod error;
mod matrix;
mod navigation;
mod slice;
mod store;
mod viewer;


pub use error::{CoreError, Result};
pub use matrix::{Mask, PixelMatrix};
pub use navigation::{NavigationController, SCROLL_THRESHOLD, Step};
pub use slice::{EncodedImage, ImagePoint, MATRIX_SIZE, Roi, Slice, SliceSequence};
pub use store::{SliceAnnotation, SliceStateStore};
pub use viewer::ViewerState;
