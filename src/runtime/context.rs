use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::model::Roi;
use crate::segmentation::{HttpBackend, SegmentationBackend, SegmentationWorkflow};

use super::Result;

#[derive(Clone)]
pub struct AppContext {
    config: ViewerConfig,
    backend: Arc<dyn SegmentationBackend>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Validates `config` and connects the HTTP segmentation backend it names.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::new(&config.backend));
        Ok(Self { config, backend })
    }

    pub fn with_backend(config: ViewerConfig, backend: Arc<dyn SegmentationBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn default_roi(&self) -> Result<Roi> {
        Ok(self.config.default_roi()?)
    }

    pub fn workflow(&self) -> SegmentationWorkflow {
        SegmentationWorkflow::new(self.backend.clone())
    }
}
