//! Error types for grid processing.

use moon_common::{Extent, MoonError};
use netcdf_parser::NetCdfError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Reading from the underlying dataset failed.
    #[error(transparent)]
    Read(#[from] NetCdfError),

    /// No grid cell falls inside the requested box.
    #[error("no grid points inside extent {extent:?}")]
    EmptySelection { extent: Extent },

    /// The dataset has no time steps to reduce.
    #[error("dataset has an empty time axis")]
    EmptyTimeAxis,

    /// Several time steps and no aggregation to collapse them.
    #[error("{steps} time steps selected but no aggregation given")]
    AmbiguousTimeAxis { steps: usize },

    /// Data and coordinate lengths disagree.
    #[error("field shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A polygon set could not be read.
    #[error("failed to read polygon set {path}: {message}")]
    PolygonSet { path: PathBuf, message: String },

    /// Malformed GeoJSON geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl GridProcessorError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Lift into the request-level taxonomy, attributing data errors to
    /// `variable` and the dataset's files.
    pub fn into_moon_error(self, variable: &str, paths: &[PathBuf]) -> MoonError {
        match self {
            GridProcessorError::AmbiguousTimeAxis { steps } => MoonError::invalid(
                "aggregation",
                format!("{} time steps selected; an aggregation is required to reduce them", steps),
            ),
            GridProcessorError::PolygonSet { .. } | GridProcessorError::InvalidGeometry(_) => {
                MoonError::Reference(self.to_string())
            }
            other => MoonError::DataLoad {
                paths: paths.to_vec(),
                variable: variable.to_string(),
                cause: other.to_string(),
            },
        }
    }
}

impl From<GridProcessorError> for MoonError {
    fn from(err: GridProcessorError) -> Self {
        err.into_moon_error("", &[])
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_time_axis_names_aggregation() {
        let err = GridProcessorError::AmbiguousTimeAxis { steps: 3 }.into_moon_error("t2m", &[]);
        assert!(matches!(err, MoonError::InvalidRequest { ref field, .. } if field == "aggregation"));
    }

    #[test]
    fn test_empty_selection_is_data_load() {
        let paths = vec![PathBuf::from("/data/a.nc")];
        let err = GridProcessorError::EmptySelection {
            extent: Extent::new(0.0, 1.0, 0.0, 1.0),
        }
        .into_moon_error("t2m", &paths);
        match err {
            MoonError::DataLoad { paths, variable, .. } => {
                assert_eq!(variable, "t2m");
                assert_eq!(paths.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
