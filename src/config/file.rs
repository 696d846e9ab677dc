use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::utils::error::{ProviderError, Result};
use crate::utils::validation::Validate;

/// Optional TOML configuration file, overriding the CLI defaults.
///
/// ```toml
/// [api]
/// base_url = "http://localhost:3000/api"
/// timeout_seconds = 30
///
/// [session]
/// data_dir = ".chargehive"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiSection,
    pub session: Option<SessionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    pub data_dir: Option<String>,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| ProviderError::ConfigError {
                message: format!(
                    "Failed to parse {}: {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn api_config(&self) -> ApiConfig {
        let mut config = ApiConfig::new(self.api.base_url.clone());
        if let Some(secs) = self.api.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn data_dir(&self) -> Option<&str> {
        self.session.as_ref()?.data_dir.as_deref()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.api_config().validate()
    }
}
