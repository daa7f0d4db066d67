//! Error types for level, color and frame resolution.

use moon_common::MoonError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid levels {given}: {reason}")]
    InvalidLevels { given: String, reason: String },

    #[error("invalid colorbar {given}: {reason}")]
    InvalidColorbar { given: String, reason: String },

    #[error("unknown map feature '{0}'")]
    UnknownFeature(String),

    #[error("invalid style for map feature '{name}': {reason}")]
    InvalidFeature { name: String, reason: String },

    #[error("invalid gridlines {given}: {reason}")]
    InvalidGridlines { given: String, reason: String },

    #[error("invalid shapecontours {given}: {reason}")]
    InvalidShapeContours { given: String, reason: String },

    #[error("failed to load color scales from {path}: {message}")]
    ColorScales { path: PathBuf, message: String },

    #[error("canvas error: {0}")]
    Canvas(String),
}

impl RenderError {
    pub fn invalid_colorbar(given: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidColorbar {
            given: given.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_levels(given: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidLevels {
            given: given.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<RenderError> for MoonError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidColorbar { given, reason } => MoonError::InvalidColorbar { given, reason },
            RenderError::InvalidLevels { given, reason } => {
                MoonError::invalid("levels", format!("{}: {}", given, reason))
            }
            RenderError::UnknownFeature(_) | RenderError::InvalidFeature { .. } => {
                MoonError::invalid("details", err.to_string())
            }
            RenderError::InvalidGridlines { .. } => MoonError::invalid("gridlines", err.to_string()),
            RenderError::InvalidShapeContours { .. } => MoonError::invalid("shapecontours", err.to_string()),
            RenderError::ColorScales { .. } => MoonError::Reference(err.to_string()),
            RenderError::Canvas(msg) => MoonError::Render(msg),
        }
    }
}
