use crate::formats::IoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("slice image unavailable: {0}")]
    Image(#[from] IoError),

    #[error("pixel buffer has {found} bytes but the {width}x{height} canvas needs {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
}
