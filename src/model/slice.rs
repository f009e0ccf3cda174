use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::{CoreError, Result};

/// Edge length of the square intensity matrix exchanged with the segmentation backend.
pub const MATRIX_SIZE: usize = 512;

static NEXT_SEQUENCE_ID: AtomicU64 = AtomicU64::new(1);

/// A location in image pixel space. Sub-pixel values are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

impl ImagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_pair(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Axis-aligned region `[x0, y0, x1, y1]` in matrix pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Roi {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Result<Self> {
        if x0 >= x1 || y0 >= y1 {
            return Err(CoreError::InvalidRoi(format!(
                "[{x0}, {y0}, {x1}, {y1}] must satisfy x0 < x1 and y0 < y1"
            )));
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    pub fn from_array(values: [u32; 4]) -> Result<Self> {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Builds a region from two arbitrary drag corners, ordering and flooring them.
    pub fn from_corners(a: ImagePoint, b: ImagePoint) -> Result<Self> {
        let to_u32 = |value: f32| value.max(0.0).floor() as u32;
        Self::new(
            to_u32(a.x.min(b.x)),
            to_u32(a.y.min(b.y)),
            to_u32(a.x.max(b.x)),
            to_u32(a.y.max(b.y)),
        )
    }

    pub fn as_array(&self) -> [u32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

/// Opaque encoded bitmap bytes (PNG, JPEG, ...). Never mutated after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
}

impl EncodedImage {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EncodedImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub index: usize,
    pub image: EncodedImage,
}

/// Ordered, fixed-length set of slices. Every construction receives a fresh id so two
/// loads of equal length are never confused with each other.
#[derive(Debug, Clone, Default)]
pub struct SliceSequence {
    id: u64,
    slices: Vec<Slice>,
}

impl SliceSequence {
    pub fn new(images: Vec<EncodedImage>) -> Self {
        let slices = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| Slice { index, image })
            .collect();
        Self {
            id: NEXT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed),
            slices,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    pub fn slice(&self, index: usize) -> Result<&Slice> {
        self.slices.get(index).ok_or(CoreError::IndexOutOfRange {
            index,
            len: self.slices.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slice> {
        self.slices.iter()
    }
}
