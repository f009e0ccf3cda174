use crate::config::ConfigError;
use crate::formats::IoError;
use crate::model::CoreError;
use crate::render::RenderError;
use crate::segmentation::SegmentationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("viewer state error: {0}")]
    Core(#[from] CoreError),

    #[error("slice I/O error: {0}")]
    Io(#[from] IoError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
