mod client;
mod contract;
mod error;
mod workflow;


pub use client::{HttpBackend, SegmentationBackend};
pub use contract::{
    POINTS_ENDPOINT, PointsRequest, PointsResponse, ROI_ENDPOINT, RoiRequest, RoiResponse,
    first_mask,
};
pub use error::{Result, SegmentationError};
pub use workflow::{
    JobTicket, Seed, SeedKind, SegmentationWorkflow, SubmissionOutcome, SubmissionState,
};
