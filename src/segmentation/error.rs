use crate::formats::IoError;
use crate::model::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SegmentationError>;

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("segmentation backend unreachable: {0}")]
    Network(String),

    #[error("segmentation backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed segmentation response: {0}")]
    MalformedResponse(String),

    #[error("pixel matrix extraction failed: {0}")]
    Matrix(#[from] IoError),

    #[error("mask rejected: {0}")]
    Store(#[from] CoreError),

    #[error("a segmentation request is already outstanding for slice {index}")]
    AlreadySubmitting { index: usize },

    #[error("no active slice to segment")]
    NoActiveSlice,

    #[error("segmentation worker panicked: {0}")]
    WorkerPanicked(String),
}
