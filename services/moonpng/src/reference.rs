//! Read-only reference data: named color scales and polygon sets.
//!
//! Loaded once at startup and shared across requests behind an `Arc`;
//! nothing here is mutated afterwards.

use grid_processor::PolygonSet;
use moon_common::{MoonError, MoonResult};
use renderer::ColorScaleRegistry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Subdirectory of the reference directory holding polygon sets.
pub const POLYGON_DIR: &str = "geojsons";

#[derive(Debug, Default)]
pub struct ReferenceData {
    colorscales: ColorScaleRegistry,
    polygon_sets: HashMap<String, Arc<PolygonSet>>,
}

impl ReferenceData {
    pub fn new(colorscales: ColorScaleRegistry) -> Self {
        Self {
            colorscales,
            polygon_sets: HashMap::new(),
        }
    }

    /// Load `dir/*.json` color scales and `dir/geojsons/*.geojson` polygon
    /// sets. Unreadable entries are skipped with a warning; a missing
    /// directory yields empty tables.
    pub fn load(dir: &Path) -> MoonResult<Self> {
        let colorscales = ColorScaleRegistry::load_dir(dir)?;
        let mut reference = Self::new(colorscales);

        let polygon_dir = dir.join(POLYGON_DIR);
        if polygon_dir.is_dir() {
            let entries = std::fs::read_dir(&polygon_dir).map_err(|e| {
                MoonError::Reference(format!("failed to list {}: {}", polygon_dir.display(), e))
            })?;

            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("geojson") {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                match PolygonSet::from_file(&path) {
                    Ok(set) => reference.insert_polygon_set(name, set),
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable polygon set"),
                }
            }
        }

        info!(
            dir = %dir.display(),
            colorscales = reference.colorscales.len(),
            polygon_sets = reference.polygon_sets.len(),
            "Loaded reference data"
        );

        Ok(reference)
    }

    pub fn insert_polygon_set(&mut self, name: impl Into<String>, set: PolygonSet) {
        self.polygon_sets.insert(name.into(), Arc::new(set));
    }

    pub fn colorscales(&self) -> &ColorScaleRegistry {
        &self.colorscales
    }

    /// Polygon set named by a request's `mask` parameter.
    pub fn polygon_set(&self, name: &str) -> MoonResult<Arc<PolygonSet>> {
        self.polygon_sets
            .get(name)
            .cloned()
            .ok_or_else(|| MoonError::invalid("mask", format!("unknown polygon set '{}'", name)))
    }

    pub fn polygon_set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.polygon_sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
