//! Error taxonomy for request resolution.
//!
//! Every failure that aborts a request is reported as a [`MoonError`]. The
//! variants carry the inputs that produced them so an operator can tell which
//! stage failed and on what.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MoonError.
pub type MoonResult<T> = Result<T, MoonError>;

/// Primary error type for moonpng requests.
#[derive(Debug, Error)]
pub enum MoonError {
    // === Request Errors ===
    #[error("Invalid value for '{field}': {message}")]
    InvalidRequest { field: String, message: String },

    #[error("Aggregation method not supported: '{requested}'")]
    UnsupportedAggregation { requested: String },

    #[error("Invalid colorbar {given}: {reason}")]
    InvalidColorbar { given: String, reason: String },

    // === Data Errors ===
    #[error("No valid paths found for variable '{variable}' ({} candidate(s) attempted)", .attempted.len())]
    NoValidPaths {
        variable: String,
        attempted: Vec<PathBuf>,
    },

    #[error("Failed to load variable '{variable}' from {} file(s): {cause}", .paths.len())]
    DataLoad {
        paths: Vec<PathBuf>,
        variable: String,
        cause: String,
    },

    // === Infrastructure Errors ===
    #[error("Reference data error: {0}")]
    Reference(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MoonError {
    /// Shorthand for an [`MoonError::InvalidRequest`] naming the offending field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        MoonError::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            MoonError::InvalidRequest { .. } => "InvalidRequest",
            MoonError::UnsupportedAggregation { .. } => "UnsupportedAggregation",
            MoonError::InvalidColorbar { .. } => "InvalidColorbar",
            MoonError::NoValidPaths { .. } => "NoValidPaths",
            MoonError::DataLoad { .. } => "DataLoad",
            MoonError::Reference(_) => "ReferenceData",
            MoonError::Render(_) => "RenderFailed",
            MoonError::Internal(_) => "InternalError",
        }
    }

    /// Get the HTTP status code the transport layer should answer with.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MoonError::InvalidRequest { .. }
            | MoonError::UnsupportedAggregation { .. }
            | MoonError::InvalidColorbar { .. }
            | MoonError::NoValidPaths { .. } => 400,

            _ => 500,
        }
    }

    /// Whether the message is meant to be shown to the requester as-is.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, MoonError::Internal(_))
    }
}

impl From<std::io::Error> for MoonError {
    fn from(err: std::io::Error) -> Self {
        MoonError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for MoonError {
    fn from(err: serde_json::Error) -> Self {
        MoonError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(MoonError::invalid("model", "nope").http_status_code(), 400);
        assert_eq!(
            MoonError::NoValidPaths {
                variable: "temp".into(),
                attempted: vec![],
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            MoonError::DataLoad {
                paths: vec![],
                variable: "temp".into(),
                cause: "corrupt".into(),
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_no_valid_paths_message_counts_attempts() {
        let err = MoonError::NoValidPaths {
            variable: "temp".into(),
            attempted: vec![PathBuf::from("/a.nc"), PathBuf::from("/b.nc")],
        };
        let msg = err.to_string();
        assert!(msg.contains("temp"));
        assert!(msg.contains("2 candidate(s)"));
        assert_eq!(err.error_code(), "NoValidPaths");
    }
}
