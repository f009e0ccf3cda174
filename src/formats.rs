mod decode;
mod error;
mod matrix;
mod source;


pub use decode::{decode_base64_image, decode_rgba};
pub use error::{IoError, Result};
pub use matrix::{extract_pixel_matrix, luminance, luminance_matrix, resample_to_surface};
pub use source::{
    UploadResponse, read_slice_files, read_upload_response, save_png, sequence_from_upload,
};

pub(crate) use decode::acquire_surface;
