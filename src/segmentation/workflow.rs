use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::formats::extract_pixel_matrix;
use crate::model::{EncodedImage, ImagePoint, Mask, Roi, ViewerState};

use super::{PointsRequest, Result, RoiRequest, SegmentationBackend, SegmentationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Point,
    Roi,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed {
    Point(Option<ImagePoint>),
    Roi(Roi),
}

impl Seed {
    pub fn kind(&self) -> SeedKind {
        match self {
            Self::Point(_) => SeedKind::Point,
            Self::Roi(_) => SeedKind::Roi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTicket {
    pub job_id: u64,
    pub index: usize,
}

/// Result of one finished request, already applied to the viewer state. `Ok` carries the
/// number of pixels flagged by the stored mask.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub job_id: u64,
    pub index: usize,
    pub kind: SeedKind,
    pub result: Result<usize>,
}

#[derive(Debug, Clone, Copy)]
struct ActiveJob {
    job_id: u64,
    sequence_id: u64,
}

#[derive(Debug)]
struct WorkerEvent {
    job_id: u64,
    sequence_id: u64,
    index: usize,
    kind: SeedKind,
    result: Result<Mask>,
}

/// Drives `Idle -> Submitting -> Idle` per slice. Requests run on worker threads; their
/// results are applied on the caller's thread by [`SegmentationWorkflow::poll`] or
/// [`SegmentationWorkflow::wait`], always to the slice that was active at submit time.
pub struct SegmentationWorkflow {
    backend: Arc<dyn SegmentationBackend>,
    in_flight: HashMap<usize, ActiveJob>,
    next_job_id: u64,
    worker_tx: Sender<WorkerEvent>,
    worker_rx: Receiver<WorkerEvent>,
}

impl std::fmt::Debug for SegmentationWorkflow {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SegmentationWorkflow")
            .field("in_flight", &self.in_flight.len())
            .field("next_job_id", &self.next_job_id)
            .finish()
    }
}

impl SegmentationWorkflow {
    pub fn new(backend: Arc<dyn SegmentationBackend>) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            backend,
            in_flight: HashMap::new(),
            next_job_id: 0,
            worker_tx,
            worker_rx,
        }
    }

    pub fn state(&self, index: usize) -> SubmissionState {
        if self.in_flight.contains_key(&index) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    pub fn is_submitting(&self, index: usize) -> bool {
        self.state(index) == SubmissionState::Submitting
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Whether the submit affordance for the active slice should be enabled.
    pub fn can_submit(&self, viewer: &ViewerState) -> bool {
        viewer
            .active_index()
            .is_some_and(|index| !self.is_submitting(index))
    }

    /// Sends the active slice's point (or an empty point list) to the point endpoint.
    pub fn submit_point(&mut self, viewer: &ViewerState) -> Result<JobTicket> {
        self.submit(viewer, Seed::Point(viewer.active_point()))
    }

    pub fn submit_roi(&mut self, viewer: &ViewerState, roi: Roi) -> Result<JobTicket> {
        self.submit(viewer, Seed::Roi(roi))
    }

    pub fn submit(&mut self, viewer: &ViewerState, seed: Seed) -> Result<JobTicket> {
        let index = viewer
            .active_index()
            .ok_or(SegmentationError::NoActiveSlice)?;
        if self.is_submitting(index) {
            return Err(SegmentationError::AlreadySubmitting { index });
        }
        let image = viewer
            .active_slice()
            .map(|slice| slice.image.clone())
            .ok_or(SegmentationError::NoActiveSlice)?;

        self.next_job_id = self.next_job_id.saturating_add(1);
        let job_id = self.next_job_id;
        let sequence_id = viewer.sequence_id();
        self.in_flight.insert(
            index,
            ActiveJob {
                job_id,
                sequence_id,
            },
        );
        info!(job_id, index, kind = ?seed.kind(), "segmentation submitted");

        let backend = self.backend.clone();
        let tx = self.worker_tx.clone();
        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                run_request(backend.as_ref(), &image, seed)
            }))
            .unwrap_or_else(|payload| {
                Err(SegmentationError::WorkerPanicked(panic_message(payload.as_ref())))
            });
            let _ = tx.send(WorkerEvent {
                job_id,
                sequence_id,
                index,
                kind: seed.kind(),
                result,
            });
        });

        Ok(JobTicket { job_id, index })
    }

    /// Applies every finished request without blocking.
    pub fn poll(&mut self, viewer: &mut ViewerState) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.worker_rx.try_recv() {
            if let Some(outcome) = self.apply(viewer, event) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Blocks until one request finishes and is applied, or `timeout` elapses.
    pub fn wait(
        &mut self,
        viewer: &mut ViewerState,
        timeout: Duration,
    ) -> Option<SubmissionOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.worker_rx.recv_timeout(remaining) {
                Ok(event) => {
                    if let Some(outcome) = self.apply(viewer, event) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Forgets every outstanding request. Their responses are dropped when they arrive.
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }

    fn apply(&mut self, viewer: &mut ViewerState, event: WorkerEvent) -> Option<SubmissionOutcome> {
        let is_current = self
            .in_flight
            .get(&event.index)
            .is_some_and(|job| job.job_id == event.job_id && job.sequence_id == event.sequence_id);
        if !is_current {
            debug!(job_id = event.job_id, "dropping response for a forgotten request");
            return None;
        }
        self.in_flight.remove(&event.index);

        if event.sequence_id != viewer.sequence_id() {
            warn!(
                job_id = event.job_id,
                index = event.index,
                "dropping response for a replaced slice sequence"
            );
            return None;
        }

        let result = event.result.and_then(|mask| {
            let flagged = mask.count_set();
            viewer.set_mask(event.index, mask)?;
            Ok(flagged)
        });
        let (job_id, index) = (event.job_id, event.index);
        match &result {
            Ok(flagged) => info!(job_id, index, flagged, "mask applied"),
            Err(error) => warn!(job_id, index, %error, "segmentation failed"),
        }

        Some(SubmissionOutcome {
            job_id: event.job_id,
            index: event.index,
            kind: event.kind,
            result,
        })
    }
}

fn run_request(
    backend: &dyn SegmentationBackend,
    image: &EncodedImage,
    seed: Seed,
) -> Result<Mask> {
    let matrix = extract_pixel_matrix(image)?;
    match seed {
        Seed::Point(point) => backend.mask_from_points(&PointsRequest::new(point, &matrix)),
        Seed::Roi(roi) => backend.mask_from_roi(&RoiRequest::new(roi, &matrix)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
