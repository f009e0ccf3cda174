use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Roi;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON parse failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config YAML parse failure: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3004".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub backend: BackendConfig,
    /// Region sent for ROI segmentation when none is given explicitly.
    pub default_roi: [u32; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            default_roi: [50, 50, 200, 200],
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("backend.base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url `{url}` must start with http:// or https://"
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_secs must be positive".to_string(),
            ));
        }
        self.default_roi()?;
        Ok(())
    }

    pub fn default_roi(&self) -> Result<Roi> {
        Roi::from_array(self.default_roi)
            .map_err(|error| ConfigError::Invalid(format!("default_roi: {error}")))
    }
}

/// Reads YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn load_config(path: impl AsRef<Path>) -> Result<ViewerConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let config = if matches!(extension.as_str(), "yaml" | "yml") {
        serde_yaml::from_str::<ViewerConfig>(&raw)?
    } else {
        serde_json::from_str::<ViewerConfig>(&raw)?
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{ConfigError, ViewerConfig, load_config};

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.yaml");
        std::fs::write(&path, "backend:\n  base_url: http://10.0.0.5:3004\n").expect("write");
        let config = load_config(&path).expect("load");
        assert_eq!(config.backend.base_url, "http://10.0.0.5:3004");
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.default_roi, [50, 50, 200, 200]);
    }

    #[test]
    fn json_config_is_parsed_by_default() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.conf");
        std::fs::write(
            &path,
            r#"{"backend": {"timeout_secs": 5}, "default_roi": [0, 0, 512, 512]}"#,
        )
        .expect("write");
        let config = load_config(&path).expect("load");
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.default_roi().expect("roi").as_array(), [0, 0, 512, 512]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = ViewerConfig::default();
        config.backend.base_url = "localhost:3004".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ViewerConfig::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.default_roi = [200, 50, 50, 200];
        assert!(config.validate().is_err());
        assert!(ViewerConfig::default().validate().is_ok());
    }
}
