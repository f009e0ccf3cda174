use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::BackendConfig;
use crate::model::Mask;

use super::{
    POINTS_ENDPOINT, PointsRequest, PointsResponse, ROI_ENDPOINT, Result, RoiRequest,
    RoiResponse, SegmentationError, first_mask,
};

/// Request/response contract of the external segmentation service.
pub trait SegmentationBackend: Send + Sync {
    fn mask_from_points(&self, request: &PointsRequest) -> Result<Mask>;
    fn mask_from_roi(&self, request: &RoiRequest) -> Result<Mask>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<R> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(%url, "posting segmentation request");
        match self.agent.post(&url).send_json(body) {
            Ok(response) => response
                .into_json::<R>()
                .map_err(|error| SegmentationError::MalformedResponse(error.to_string())),
            Err(ureq::Error::Status(code, response)) => Err(SegmentationError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => {
                Err(SegmentationError::Network(transport.to_string()))
            }
        }
    }
}

impl SegmentationBackend for HttpBackend {
    fn mask_from_points(&self, request: &PointsRequest) -> Result<Mask> {
        let response: PointsResponse = self.post(POINTS_ENDPOINT, request)?;
        first_mask(response.mask_points)
    }

    fn mask_from_roi(&self, request: &RoiRequest) -> Result<Mask> {
        let response: RoiResponse = self.post(ROI_ENDPOINT, request)?;
        first_mask(response.mask_roi)
    }
}
