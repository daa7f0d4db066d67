//! Polygon sets read from GeoJSON.
//!
//! Accepts a FeatureCollection, a single Feature or a bare geometry. Polygon
//! and MultiPolygon geometries (also inside GeometryCollections) are kept;
//! every other geometry type is ignored.

use moon_common::Extent;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::error::{GridProcessorError, Result};

/// GeoJSON position; anything past longitude and latitude is ignored.
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
    #[serde(other)]
    Unsupported,
}

/// One polygon: an exterior ring and zero or more holes, as `(lon, lat)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<(f64, f64)>,
    holes: Vec<Vec<(f64, f64)>>,
    bounds: Extent,
}

impl Polygon {
    pub fn new(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Result<Self> {
        if exterior.len() < 3 {
            return Err(GridProcessorError::invalid_geometry(format!(
                "polygon ring needs at least 3 points, got {}",
                exterior.len()
            )));
        }
        let bounds = ring_bounds(&exterior);
        Ok(Self {
            exterior,
            holes,
            bounds,
        })
    }

    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<(f64, f64)>] {
        &self.holes
    }

    pub fn bounds(&self) -> Extent {
        self.bounds
    }

    /// True when the point lies strictly inside the polygon. Points on any
    /// ring, including hole rings, are outside.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if !self.bounds.contains(lon, lat) {
            return false;
        }
        if on_ring(&self.exterior, lon, lat) || self.holes.iter().any(|h| on_ring(h, lon, lat)) {
            return false;
        }
        ring_contains(&self.exterior, lon, lat) && !self.holes.iter().any(|h| ring_contains(h, lon, lat))
    }
}

/// A union of polygons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| GridProcessorError::invalid_geometry(e.to_string());
        let value: Value = serde_json::from_str(text).map_err(invalid)?;

        let geometries = match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                let collection: FeatureCollection = serde_json::from_value(value).map_err(invalid)?;
                collection.features.into_iter().filter_map(|f| f.geometry).collect()
            }
            Some("Feature") => {
                let feature: Feature = serde_json::from_value(value).map_err(invalid)?;
                feature.geometry.into_iter().collect()
            }
            _ => vec![serde_json::from_value::<Geometry>(value).map_err(invalid)?],
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            collect_polygons(geometry, &mut polygons)?;
        }
        Ok(Self { polygons })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GridProcessorError::PolygonSet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_geojson_str(&text).map_err(|e| GridProcessorError::PolygonSet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Combined bounding box of every polygon.
    pub fn bounds(&self) -> Option<Extent> {
        self.polygons.iter().map(Polygon::bounds).reduce(|a, b| {
            Extent::new(
                a.lon_min.min(b.lon_min),
                a.lon_max.max(b.lon_max),
                a.lat_min.min(b.lat_min),
                a.lat_max.max(b.lat_max),
            )
        })
    }

    /// Inside any polygon of the set.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons.iter().any(|p| p.contains(lon, lat))
    }
}

fn collect_polygons(geometry: Geometry, out: &mut Vec<Polygon>) -> Result<()> {
    match geometry {
        Geometry::Polygon { coordinates } => out.push(polygon_from_rings(coordinates)?),
        Geometry::MultiPolygon { coordinates } => {
            for rings in coordinates {
                out.push(polygon_from_rings(rings)?);
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_polygons(g, out)?;
            }
        }
        Geometry::Unsupported => {}
    }
    Ok(())
}

fn polygon_from_rings(rings: Vec<Vec<Position>>) -> Result<Polygon> {
    let mut rings = rings.into_iter().map(ring_from_positions);
    let exterior = rings
        .next()
        .ok_or_else(|| GridProcessorError::invalid_geometry("polygon without rings"))??;
    let holes = rings.collect::<Result<Vec<_>>>()?;
    Polygon::new(exterior, holes)
}

fn ring_from_positions(positions: Vec<Position>) -> Result<Vec<(f64, f64)>> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(GridProcessorError::invalid_geometry("position with fewer than 2 coordinates")),
        })
        .collect()
}

fn ring_bounds(ring: &[(f64, f64)]) -> Extent {
    let mut bounds = Extent::new(f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(lon, lat) in ring {
        bounds.lon_min = bounds.lon_min.min(lon);
        bounds.lon_max = bounds.lon_max.max(lon);
        bounds.lat_min = bounds.lat_min.min(lat);
        bounds.lat_max = bounds.lat_max.max(lat);
    }
    bounds
}

/// Even-odd ray casting.
fn ring_contains(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn on_ring(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    const EPS: f64 = 1e-12;
    let n = ring.len();
    (0..n).any(|i| {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % n];
        let cross = (x2 - x1) * (lat - y1) - (y2 - y1) * (lon - x1);
        cross.abs() <= EPS
            && lon >= x1.min(x2) - EPS
            && lon <= x1.max(x2) + EPS
            && lat >= y1.min(y2) - EPS
            && lat <= y1.max(y2) + EPS
    })
}
