use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{EncodedImage, SliceSequence};

use super::{Result, decode_base64_image};

/// Body returned by the upload collaborator (`POST /dicom/base64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub dicom_images: Vec<String>,
}

/// Reads every file as an opaque encoded bitmap, keeping argument order as slice order.
pub fn read_slice_files(paths: &[PathBuf]) -> Result<SliceSequence> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read slice file");
        images.push(EncodedImage::from_bytes(bytes));
    }
    Ok(SliceSequence::new(images))
}

pub fn read_upload_response(path: impl AsRef<Path>) -> Result<SliceSequence> {
    let raw = fs::read_to_string(path)?;
    let response = serde_json::from_str::<UploadResponse>(&raw)?;
    sequence_from_upload(&response)
}

pub fn sequence_from_upload(response: &UploadResponse) -> Result<SliceSequence> {
    let images = response
        .dicom_images
        .iter()
        .map(|encoded| decode_base64_image(encoded))
        .collect::<Result<Vec<_>>>()?;
    Ok(SliceSequence::new(images))
}

pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
