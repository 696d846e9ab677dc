#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use std::time::Duration;

use crate::utils::error::{ProviderError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const PROVIDER_SIGNUP: &str = "/provider/signup";
    pub const PROVIDER_LOGIN: &str = "/provider/login";
    pub const PROVIDER_PROFILE: &str = "/provider/profile";
    pub const PROVIDER_SERVICES: &str = "/provider/services";
    pub const SERVICES_LIST: &str = "/services";
    pub const WALLET_DETAILS: &str = "/wallet";
    pub const WALLET_TRANSACTIONS: &str = "/wallet/transactions";
    pub const WALLET_CHT_BALANCE: &str = "/wallet/cht-balance";
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;

        if self.timeout.is_zero() {
            return Err(ProviderError::InvalidValueError {
                field: "timeout".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
