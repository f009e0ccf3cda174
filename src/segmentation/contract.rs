use serde::{Deserialize, Serialize};

use crate::model::{ImagePoint, Mask, PixelMatrix, Roi};

use super::{Result, SegmentationError};

pub const POINTS_ENDPOINT: &str = "/masks/points";
pub const ROI_ENDPOINT: &str = "/masks/roi";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRequest {
    pub points: Vec<[f32; 2]>,
    pub pixel_arr: Vec<Vec<u8>>,
}

impl PointsRequest {
    /// One `[x, y]` pair when a point is set, otherwise an empty list.
    pub fn new(point: Option<ImagePoint>, matrix: &PixelMatrix) -> Self {
        Self {
            points: point.map(|point| point.as_pair()).into_iter().collect(),
            pixel_arr: matrix.to_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsResponse {
    pub mask_points: Vec<Vec<Vec<bool>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRequest {
    pub roi: [u32; 4],
    pub pixel_arr: Vec<Vec<u8>>,
}

impl RoiRequest {
    pub fn new(roi: Roi, matrix: &PixelMatrix) -> Self {
        Self {
            roi: roi.as_array(),
            pixel_arr: matrix.to_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResponse {
    pub mask_roi: Vec<Vec<Vec<bool>>>,
}

/// The backend answers with a list of candidate masks; the first one is used.
pub fn first_mask(masks: Vec<Vec<Vec<bool>>>) -> Result<Mask> {
    let rows = masks.into_iter().next().ok_or_else(|| {
        SegmentationError::MalformedResponse("response contains no masks".to_string())
    })?;
    Mask::from_rows(rows).map_err(|error| SegmentationError::MalformedResponse(error.to_string()))
}
