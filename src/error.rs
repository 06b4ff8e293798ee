//! Error types for the vayu dashboard

use thiserror::Error;

/// Main error type for vayu
#[derive(Error, Debug)]
pub enum VayuError {
    /// Input validation errors (bad search text, out-of-range coordinates)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Upstream API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl VayuError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VayuError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            VayuError::Api { .. } => {
                "Unable to reach the weather services. Please check your internet connection."
                    .to_string()
            }
            VayuError::Cache { .. } => {
                "Cache operation failed. You may need to clear the cache directory.".to_string()
            }
            VayuError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            VayuError::General { message } => message.clone(),
        }
    }
}
