use crate::utils::error::{ProviderError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProviderError::InvalidValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProviderError::InvalidValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProviderError::InvalidValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::MissingFieldError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// Parses a user-entered rate and requires it to be strictly positive.
pub fn validate_positive_rate(field_name: &str, value: &str) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::MissingFieldError {
            field: field_name.to_string(),
        });
    }

    let rate: f64 = trimmed.parse().map_err(|_| ProviderError::InvalidValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Value must be a number".to_string(),
    })?;

    if !(rate > 0.0) {
        return Err(ProviderError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be greater than zero".to_string(),
        });
    }

    Ok(rate)
}
