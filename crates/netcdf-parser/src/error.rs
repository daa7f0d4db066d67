//! Error types for NetCDF loading operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF loading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file could not be opened as NetCDF
    #[error("failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// The requested variable is not in the file
    #[error("variable '{variable}' not found in {path}")]
    MissingVariable { path: PathBuf, variable: String },

    /// A coordinate variable is missing or unreadable
    #[error("coordinate '{name}' missing in {path}")]
    MissingCoordinate { path: PathBuf, name: String },

    /// The variable is not laid out as (time?, latitude, longitude)
    #[error("variable '{variable}' in {path} has dimensions {dims:?}, expected (time, latitude, longitude)")]
    InvalidDimensions {
        path: PathBuf,
        variable: String,
        dims: Vec<String>,
    },

    /// Files that cannot be merged onto one grid
    #[error("{path} is not on the same grid as the other files: {reason}")]
    IncompatibleGrid { path: PathBuf, reason: String },

    /// Reading values failed
    #[error("failed to read '{variable}' from {path}: {message}")]
    Read {
        path: PathBuf,
        variable: String,
        message: String,
    },

    /// Time step index past the end of the time axis
    #[error("time step {index} out of range (time axis has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    /// No files were given to open
    #[error("no files to open")]
    NoFiles,
}
