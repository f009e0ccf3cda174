use std::sync::Arc;

use super::{CoreError, ImagePoint, MATRIX_SIZE, Mask, Result};

/// Per-slice annotation state. `mask_revision` changes on every mask write so renderers
/// can tell two masks apart without comparing cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceAnnotation {
    pub point: Option<ImagePoint>,
    pub mask: Option<Arc<Mask>>,
    pub mask_revision: u64,
}

/// Arena of annotations where the slice index is the array offset. Entries are never
/// reordered, inserted or removed outside of [`SliceStateStore::reset`].
#[derive(Debug, Clone, Default)]
pub struct SliceStateStore {
    entries: Vec<SliceAnnotation>,
    next_revision: u64,
}

impl SliceStateStore {
    pub fn new(len: usize) -> Self {
        let mut store = Self::default();
        store.reset(len);
        store
    }

    pub fn reset(&mut self, len: usize) {
        self.entries = vec![SliceAnnotation::default(); len];
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_point(&mut self, index: usize, point: ImagePoint) -> Result<()> {
        self.entry_mut(index)?.point = Some(point);
        Ok(())
    }

    /// Replaces the mask for `index`. A mask whose shape differs from the
    /// `MATRIX_SIZE x MATRIX_SIZE` contract is rejected and prior state kept.
    pub fn set_mask(&mut self, index: usize, mask: Mask) -> Result<()> {
        let expected = (MATRIX_SIZE, MATRIX_SIZE);
        if mask.dimensions() != expected {
            return Err(CoreError::DimensionMismatch {
                expected,
                found: mask.dimensions(),
            });
        }
        self.next_revision = self.next_revision.saturating_add(1);
        let revision = self.next_revision;
        let entry = self.entry_mut(index)?;
        entry.mask = Some(Arc::new(mask));
        entry.mask_revision = revision;
        Ok(())
    }

    pub fn point(&self, index: usize) -> Option<ImagePoint> {
        self.entries.get(index).and_then(|entry| entry.point)
    }

    pub fn mask(&self, index: usize) -> Option<&Arc<Mask>> {
        self.entries.get(index).and_then(|entry| entry.mask.as_ref())
    }

    pub fn annotation(&self, index: usize) -> Option<&SliceAnnotation> {
        self.entries.get(index)
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SliceAnnotation> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })
    }
}
