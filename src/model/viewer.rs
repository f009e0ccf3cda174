use std::sync::Arc;

use tracing::{debug, info};

use super::{
    CoreError, ImagePoint, Mask, NavigationController, Result, Slice, SliceAnnotation,
    SliceSequence, SliceStateStore,
};

/// Slice sequence plus the per-slice annotation arena and the navigation cursor.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    sequence: SliceSequence,
    store: SliceStateStore,
    navigation: NavigationController,
}

impl ViewerState {
    pub fn new(sequence: SliceSequence) -> Self {
        let mut state = Self::default();
        state.load(sequence);
        state
    }

    /// Replaces the sequence. Points and masks are cleared for every slice even when the
    /// new sequence has the same length as the old one.
    pub fn load(&mut self, sequence: SliceSequence) {
        let len = sequence.len();
        info!(sequence_id = sequence.id(), slices = len, "loaded slice sequence");
        self.sequence = sequence;
        self.store.reset(len);
        self.navigation.reset(len);
    }

    pub fn sequence(&self) -> &SliceSequence {
        &self.sequence
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence.id()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.navigation.active_index()
    }

    pub fn active_slice(&self) -> Option<&Slice> {
        self.active_index()
            .and_then(|index| self.sequence.get(index))
    }

    pub fn active_annotation(&self) -> Option<&SliceAnnotation> {
        self.active_index()
            .and_then(|index| self.store.annotation(index))
    }

    pub fn active_point(&self) -> Option<ImagePoint> {
        self.active_index().and_then(|index| self.store.point(index))
    }

    pub fn active_mask(&self) -> Option<&Arc<Mask>> {
        self.active_index().and_then(|index| self.store.mask(index))
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationController {
        &mut self.navigation
    }

    pub fn store(&self) -> &SliceStateStore {
        &self.store
    }

    /// Records a click on the active slice and returns the slice index it landed on.
    pub fn set_active_point(&mut self, point: ImagePoint) -> Result<usize> {
        let index = self.active_index().ok_or(CoreError::EmptySequence)?;
        self.store.set_point(index, point)?;
        debug!(index, x = point.x, y = point.y, "point set");
        Ok(index)
    }

    pub fn set_mask(&mut self, index: usize, mask: Mask) -> Result<()> {
        self.store.set_mask(index, mask)?;
        debug!(index, "mask stored");
        Ok(())
    }
}
