//! Geographic extents and the named-region table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A geographic bounding box in degrees, ordered as
/// `(lon_min, lon_max, lat_min, lat_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Parse a literal extent: "lon_min,lon_max,lat_min,lat_max"
    pub fn from_literal(s: &str) -> Result<Self, ExtentParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ExtentParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ExtentParseError::InvalidNumber(part.to_string()))?;
        }

        let extent = Self::new(values[0], values[1], values[2], values[3]);
        if extent.lon_min > extent.lon_max || extent.lat_min > extent.lat_max {
            return Err(ExtentParseError::Inverted(s.to_string()));
        }
        Ok(extent)
    }

    /// Resolve an extent parameter: a region code (case-insensitive) or a literal box.
    pub fn resolve(s: &str) -> Result<Self, ExtentParseError> {
        if let Some(extent) = region(s) {
            return Ok(extent);
        }
        if s.contains(',') {
            return Self::from_literal(s);
        }
        Err(ExtentParseError::UnknownRegion(s.to_string()))
    }

    /// Grow the box symmetrically by `pad` degrees on every side.
    pub fn pad(&self, pad: f64) -> Self {
        Self {
            lon_min: self.lon_min - pad,
            lon_max: self.lon_max + pad,
            lat_min: self.lat_min - pad,
            lat_max: self.lat_max + pad,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }

    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtentParseError {
    #[error("Invalid extent format: {0}. Expected a region code or 'lon_min,lon_max,lat_min,lat_max'")]
    InvalidFormat(String),

    #[error("Invalid number in extent: {0}")]
    InvalidNumber(String),

    #[error("Extent has min greater than max: {0}")]
    Inverted(String),

    #[error("Unknown region code: {0}")]
    UnknownRegion(String),
}

/// Region boxes in definition order.
///
/// "SE" appears twice (Southeast region, then the state of Sergipe). Lookups
/// resolve to the later entry.
// TODO: confirm which "SE" box is wanted and give the other its own code.
pub const REGION_DEFINITIONS: &[(&str, Extent)] = &[
    ("AS", Extent::new(-85.0, -20.0, -60.0, 15.0)),
    ("BR", Extent::new(-75.0, -32.0, -34.0, 5.3)),
    ("FD", Extent::new(-155.0, 5.0, -80.0, 80.0)),
    ("S", Extent::new(-58.2, -47.9, -34.0, -22.4)),
    ("SE", Extent::new(-53.4, -39.4, -25.5, -14.0)),
    ("SSE", Extent::new(-65.0, -35.0, -35.0, -12.5)),
    ("AC", Extent::new(-74.4, -66.0, -11.6, -6.6)),
    ("AL", Extent::new(-38.7, -34.6, -11.0, -8.3)),
    ("AM", Extent::new(-74.2, -55.5, -10.3, 2.7)),
    ("AP", Extent::new(-55.3, -49.3, -1.7, 4.9)),
    ("BA", Extent::new(-47.0, -36.8, -18.8, -8.0)),
    ("CE", Extent::new(-41.9, -36.7, -8.3, -2.2)),
    ("DF", Extent::new(-48.7, -46.8, -16.5, -15.0)),
    ("ES", Extent::new(-42.3, -28.3, -21.7, -17.3)),
    ("GO", Extent::new(-53.7, -45.4, -19.9, -11.8)),
    ("MA", Extent::new(-49.2, -41.2, -10.7, -0.5)),
    ("MG", Extent::new(-51.5, -39.3, -23.4, -13.7)),
    ("MS", Extent::new(-58.6, -50.4, -24.5, -16.6)),
    ("MT", Extent::new(-62.1, -49.7, -18.5, -6.8)),
    ("PA", Extent::new(-59.3, -45.5, -10.3, 3.1)),
    ("PB", Extent::new(-43.5, -34.2, -9.9, -5.5)),
    ("PE", Extent::new(-41.8, -34.3, -9.9, -6.7)),
    ("PI", Extent::new(-46.4, -39.8, -11.4, -2.2)),
    ("PR", Extent::new(-55.1, -47.5, -27.2, -22.0)),
    ("RN", Extent::new(-39.1, -31.8, -7.4, -3.3)),
    ("RO", Extent::new(-67.3, -59.2, -14.0, -7.4)),
    ("RJ", Extent::new(-45.3, -40.4, -23.8, -20.2)),
    ("RR", Extent::new(-65.3, -58.3, -2.0, 5.7)),
    ("RS", Extent::new(-60.0, -48.0, -35.0, -25.0)),
    ("SE", Extent::new(-38.7, -35.8, -12.2, -9.0)),
    ("SC", Extent::new(-54.5, -47.8, -29.8, -25.0)),
    ("SP", Extent::new(-54.0, -42.0, -25.8, -19.0)),
    ("TO", Extent::new(-51.2, -45.1, -13.9, -4.6)),
];

static REGION_TABLE: Lazy<HashMap<&'static str, Extent>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(REGION_DEFINITIONS.len());
    for (code, extent) in REGION_DEFINITIONS {
        table.insert(*code, *extent);
    }
    table
});

/// Look up a named region (case-insensitive).
pub fn region(code: &str) -> Option<Extent> {
    REGION_TABLE.get(code.trim().to_uppercase().as_str()).copied()
}

/// All distinct region codes with their effective extents, sorted by code.
pub fn regions() -> Vec<(&'static str, Extent)> {
    let mut all: Vec<_> = REGION_TABLE.iter().map(|(k, v)| (*k, *v)).collect();
    all.sort_by(|a, b| a.0.cmp(b.0));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_lookup_is_case_insensitive() {
        let br = region("br").unwrap();
        assert_eq!(br, Extent::new(-75.0, -32.0, -34.0, 5.3));
    }

    #[test]
    fn test_duplicate_code_resolves_to_last_definition() {
        let se = region("SE").unwrap();
        assert_eq!(se, Extent::new(-38.7, -35.8, -12.2, -9.0));
    }

    #[test]
    fn test_pad() {
        let padded = Extent::new(0.0, 10.0, -5.0, 5.0).pad(1.0);
        assert_eq!(padded.as_array(), [-1.0, 11.0, -6.0, 6.0]);
    }
}
