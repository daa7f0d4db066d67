//! Discrete color ramps keyed to boundary levels.
//!
//! A color-scale record holds a `scale` (the boundaries) and a `cmap` of
//! 8-bit RGB or RGBA colors. Colors are normalized to `0.0..=1.0` and bound
//! to the boundaries through a [`BoundaryNorm`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::levels::LevelSet;

/// RGBA, each channel in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// On-disk color-scale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScaleRecord {
    pub scale: Vec<f64>,
    pub cmap: Vec<Vec<f64>>,
}

/// Where a value falls relative to the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorIndex {
    /// Below the first boundary
    Under,
    /// At or above the last boundary
    Over,
    /// Index into the color list
    Bin(usize),
    /// NaN
    Bad,
}

/// Maps values to color indices by the bin they fall in.
///
/// With `n` boundaries there are `n - 1` bins. When there are more colors
/// than bins, bin `i` is spread to color `i * (ncolors - 1) / (nbins - 1)`
/// so the first and last colors are always used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryNorm {
    boundaries: Vec<f64>,
    ncolors: usize,
}

impl BoundaryNorm {
    pub fn new(boundaries: Vec<f64>, ncolors: usize) -> Result<Self> {
        let given = || format!("{:?}", boundaries);
        if boundaries.len() < 2 {
            return Err(RenderError::invalid_colorbar(given(), "scale needs at least 2 boundaries"));
        }
        if boundaries.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RenderError::invalid_colorbar(given(), "scale must be strictly increasing"));
        }
        let nbins = boundaries.len() - 1;
        if ncolors < nbins {
            return Err(RenderError::invalid_colorbar(
                given(),
                format!("{} colors cannot cover {} scale intervals", ncolors, nbins),
            ));
        }
        Ok(Self { boundaries, ncolors })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn ncolors(&self) -> usize {
        self.ncolors
    }

    pub fn index(&self, value: f64) -> ColorIndex {
        if value.is_nan() {
            return ColorIndex::Bad;
        }
        let first = self.boundaries[0];
        let last = self.boundaries[self.boundaries.len() - 1];
        if value < first {
            return ColorIndex::Under;
        }
        if value >= last {
            return ColorIndex::Over;
        }

        // number of boundaries <= value, minus one
        let bin = self.boundaries.partition_point(|b| *b <= value) - 1;
        let nbins = self.boundaries.len() - 1;

        let index = if self.ncolors > nbins {
            if nbins == 1 {
                (self.ncolors - 1) / 2
            } else {
                ((self.ncolors - 1) as f64 / (nbins - 1) as f64 * bin as f64) as usize
            }
        } else {
            bin
        };
        ColorIndex::Bin(index)
    }
}

/// Named discrete colormap with its normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRamp {
    pub name: String,
    pub colors: Vec<Rgba>,
    pub norm: BoundaryNorm,
}

impl ColorRamp {
    /// Build from a record, normalizing 8-bit channels.
    pub fn from_record(name: &str, record: &ColorScaleRecord) -> Result<Self> {
        let colors = record
            .cmap
            .iter()
            .map(|c| to_rgba(name, c))
            .collect::<Result<Vec<_>>>()?;
        if colors.is_empty() {
            return Err(RenderError::invalid_colorbar(name, "cmap is empty"));
        }
        let norm = BoundaryNorm::new(record.scale.clone(), colors.len())
            .map_err(|e| RenderError::invalid_colorbar(name, e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            colors,
            norm,
        })
    }

    /// The boundaries as a level set.
    pub fn levels(&self) -> Result<LevelSet> {
        LevelSet::new(self.norm.boundaries().to_vec())
    }

    /// Color for a value; under and over values take the end colors, NaN
    /// has none.
    pub fn color_for(&self, value: f64) -> Option<Rgba> {
        match self.norm.index(value) {
            ColorIndex::Bad => None,
            ColorIndex::Under => self.colors.first().copied(),
            ColorIndex::Over => self.colors.last().copied(),
            ColorIndex::Bin(i) => self.colors.get(i).copied(),
        }
    }
}

fn to_rgba(name: &str, channels: &[f64]) -> Result<Rgba> {
    if !(channels.len() == 3 || channels.len() == 4) {
        return Err(RenderError::invalid_colorbar(
            name,
            format!("color {:?} must have 3 or 4 components", channels),
        ));
    }
    if channels.iter().any(|c| !(0.0..=255.0).contains(c)) {
        return Err(RenderError::invalid_colorbar(
            name,
            format!("color {:?} has components outside 0..=255", channels),
        ));
    }
    let alpha = channels.get(3).copied().unwrap_or(255.0);
    Ok([
        (channels[0] / 255.0) as f32,
        (channels[1] / 255.0) as f32,
        (channels[2] / 255.0) as f32,
        (alpha / 255.0) as f32,
    ])
}

/// Named color scales, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ColorScaleRegistry {
    scales: HashMap<String, ColorScaleRecord>,
}

impl ColorScaleRegistry {
    /// Load every `<name>.json` in `dir`. Each file holds `{ "<name>": record }`.
    ///
    /// Files that do not parse are skipped with a warning; a missing
    /// directory yields an empty registry.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::default();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Color scale directory not found");
            return Ok(registry);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| RenderError::ColorScales {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            match read_record(&path, &name) {
                Ok(record) => {
                    registry.scales.insert(name, record);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping color scale"),
            }
        }

        debug!(dir = %dir.display(), count = registry.scales.len(), "Loaded color scales");
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, record: ColorScaleRecord) {
        self.scales.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<&ColorScaleRecord> {
        self.scales.get(name)
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Sorted scale names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scales.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn read_record(path: &Path, name: &str) -> std::result::Result<ColorScaleRecord, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut file: HashMap<String, ColorScaleRecord> = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    file.remove(name)
        .ok_or_else(|| format!("no '{}' entry in file", name))
}

static EMPTY_REGISTRY: Lazy<ColorScaleRegistry> = Lazy::new(ColorScaleRegistry::default);

/// Resolve a colorbar specification into a ramp.
///
/// `spec` is either an inline `{ "<name>": { "scale": [...], "cmap": [...] } }`
/// mapping or the name of a scale in `registry`.
pub fn resolve_colorbar(spec: Option<&Value>, registry: Option<&ColorScaleRegistry>) -> Result<Option<ColorRamp>> {
    let registry = registry.unwrap_or(&EMPTY_REGISTRY);
    match spec {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => {
            let record = registry
                .get(name)
                .ok_or_else(|| RenderError::invalid_colorbar(name, "unknown color scale"))?;
            ColorRamp::from_record(name, record).map(Some)
        }
        Some(spec @ Value::Object(map)) => {
            let (name, body) = match map.iter().next() {
                Some(entry) if map.len() == 1 => entry,
                _ => {
                    return Err(RenderError::invalid_colorbar(
                        spec,
                        "expected a single {name: {scale, cmap}} entry",
                    ))
                }
            };
            let record: ColorScaleRecord = serde_json::from_value(body.clone())
                .map_err(|e| RenderError::invalid_colorbar(spec, e.to_string()))?;
            ColorRamp::from_record(name, &record).map(Some)
        }
        Some(other) => Err(RenderError::invalid_colorbar(
            other,
            "expected a color scale name or an inline {name: {scale, cmap}}",
        )),
    }
}
