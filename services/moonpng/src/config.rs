//! Pipeline configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Settings shared by every request a pipeline handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory used when a request names no `source`
    pub source_root: PathBuf,

    /// Directory of `<name>.json` color scales and `geojsons/<name>.geojson`
    /// polygon sets
    pub reference_dir: PathBuf,

    /// Margin in degrees added around the extent of a masked field
    pub mask_pad_degrees: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("/data"),
            reference_dir: PathBuf::from("data/cmaps"),
            mask_pad_degrees: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// Variables:
    /// - `MOONPNG_SOURCE_ROOT`: default data root (default: /data)
    /// - `MOONPNG_REFERENCE_DIR`: reference data directory (default: data/cmaps)
    /// - `MOONPNG_MASK_PAD`: mask padding in degrees (default: 1.0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let source_root = env::var("MOONPNG_SOURCE_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.source_root);

        let reference_dir = env::var("MOONPNG_REFERENCE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.reference_dir);

        let mask_pad_degrees = env::var("MOONPNG_MASK_PAD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.mask_pad_degrees);

        Self {
            source_root,
            reference_dir,
            mask_pad_degrees,
        }
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.mask_pad_degrees.is_finite() || self.mask_pad_degrees < 0.0 {
            return Err(format!(
                "mask_pad_degrees must be a non-negative number, got {}",
                self.mask_pad_degrees
            ));
        }
        if self.source_root.as_os_str().is_empty() {
            return Err("source_root must not be empty".to_string());
        }
        Ok(())
    }
}
