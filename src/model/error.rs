use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("slice index {index} is out of range for a sequence of {len} slices")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(
        "mask dimension mismatch: expected {}x{} (width x height), found {}x{}",
        .expected.0, .expected.1, .found.0, .found.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("matrix row {row} has {found} cells but row 0 has {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("slice sequence is empty")]
    EmptySequence,

    #[error("invalid region of interest: {0}")]
    InvalidRoi(String),
}
