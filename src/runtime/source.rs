use std::path::PathBuf;

use crate::formats::{read_slice_files, read_upload_response};
use crate::model::SliceSequence;

use super::Result;

/// Where a slice sequence comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceSource {
    /// Encoded image files, one slice per file, in the given order.
    Files(Vec<PathBuf>),
    /// A saved `{ "dicom_images": [...] }` body from the upload service.
    UploadResponse(PathBuf),
}

impl SliceSource {
    pub fn load(&self) -> Result<SliceSequence> {
        let sequence = match self {
            Self::Files(paths) => read_slice_files(paths)?,
            Self::UploadResponse(path) => read_upload_response(path)?,
        };
        Ok(sequence)
    }
}
