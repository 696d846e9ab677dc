use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Authentication rejected: {message}")]
    Unauthorized { message: String },

    #[error("Server error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },
}

impl ProviderError {
    /// Server-reported business errors are shown verbatim, transport failures
    /// collapse to a retry prompt.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::HttpError(e) if e.is_timeout() => {
                "Request timed out. Please try again.".to_string()
            }
            ProviderError::HttpError(_) => {
                "Network error. Check your connection and try again.".to_string()
            }
            ProviderError::SerializationError(_) => {
                "Unexpected response from the server.".to_string()
            }
            ProviderError::Unauthorized { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            ProviderError::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
