/// Accumulated wheel delta needed for one slice step.
pub const SCROLL_THRESHOLD: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

/// Bounds-clamped cursor over `0..len`. Boundaries disable stepping instead of wrapping.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    len: usize,
    active: usize,
    scroll_accumulator: f32,
}

impl NavigationController {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            active: 0,
            scroll_accumulator: 0.0,
        }
    }

    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `None` only when there are no slices to navigate.
    pub fn active_index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.active)
    }

    pub fn can_step_forward(&self) -> bool {
        self.active + 1 < self.len
    }

    pub fn can_step_backward(&self) -> bool {
        self.len > 0 && self.active > 0
    }

    /// Returns `true` when the active index changed.
    pub fn step_forward(&mut self) -> bool {
        if !self.can_step_forward() {
            return false;
        }
        self.active += 1;
        true
    }

    pub fn step_backward(&mut self) -> bool {
        if !self.can_step_backward() {
            return false;
        }
        self.active -= 1;
        true
    }

    pub fn step(&mut self, step: Step) -> bool {
        match step {
            Step::Forward => self.step_forward(),
            Step::Backward => self.step_backward(),
        }
    }

    /// Jumps straight to `index`. Out-of-range indices leave the cursor untouched.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.active = index;
        self.scroll_accumulator = 0.0;
        true
    }

    /// Feeds one wheel delta. Once `|accumulated| >= SCROLL_THRESHOLD` a single step is
    /// taken in the sign's direction and the accumulator drops to zero; any remainder is
    /// discarded. Returns the step direction when the threshold was crossed, even if the
    /// step itself was a no-op at a boundary.
    pub fn scroll(&mut self, delta: f32) -> Option<Step> {
        if !delta.is_finite() {
            return None;
        }
        self.scroll_accumulator += delta;
        if self.scroll_accumulator.abs() < SCROLL_THRESHOLD {
            return None;
        }
        let step = if self.scroll_accumulator > 0.0 {
            Step::Forward
        } else {
            Step::Backward
        };
        self.step(step);
        self.scroll_accumulator = 0.0;
        Some(step)
    }

    pub fn scroll_accumulator(&self) -> f32 {
        self.scroll_accumulator
    }
}
