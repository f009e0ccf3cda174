use crate::model::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    /// The encoded bitmap could not be loaded (corrupt payload or unsupported encoding).
    #[error("failed to load image: {0}")]
    Load(String),

    /// No pixel surface of the requested size could be allocated.
    #[error("could not acquire rendering surface: {0}")]
    Surface(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encode failure: {0}")]
    Image(#[from] image::ImageError),

    #[error("upload response parse failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("core slice/matrix failure: {0}")]
    Core(#[from] CoreError),
}
