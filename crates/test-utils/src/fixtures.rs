//! Fixture writers: real NetCDF files, GeoJSON polygon sets and color-scale
//! records, laid out the way the pipeline reads them.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fill value written into fixture variables.
pub const FILL_VALUE: f32 = -9999.0;

/// Time units written into fixture time coordinates.
pub const TIME_UNITS: &str = "days since 1970-01-01 00:00:00";

/// Description of a gridded NetCDF file.
///
/// Data is stored as `(time, latitude, longitude)`, or as a bare
/// `(latitude, longitude)` field when built with [`GridFixture::without_time`].
#[derive(Debug, Clone)]
pub struct GridFixture {
    pub variable: String,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub times: Option<Vec<DateTime<Utc>>>,
    /// One row-major `(lat, lon)` field per time step
    pub steps: Vec<Vec<f32>>,
    pub fill_value: Option<f32>,
    pub scale_factor: Option<f32>,
    pub add_offset: Option<f32>,
    pub lat_name: &'static str,
    pub lon_name: &'static str,
}

impl GridFixture {
    pub fn new(variable: &str, latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            variable: variable.to_string(),
            latitudes,
            longitudes,
            times: Some(Vec::new()),
            steps: Vec::new(),
            fill_value: Some(FILL_VALUE),
            scale_factor: None,
            add_offset: None,
            lat_name: "latitude",
            lon_name: "longitude",
        }
    }

    /// Append one time step.
    pub fn with_step(mut self, time: DateTime<Utc>, values: Vec<f32>) -> Self {
        self.times.get_or_insert_with(Vec::new).push(time);
        self.steps.push(values);
        self
    }

    /// Single field with no time dimension.
    pub fn without_time(mut self, values: Vec<f32>) -> Self {
        self.times = None;
        self.steps = vec![values];
        self
    }

    pub fn with_packing(mut self, scale_factor: f32, add_offset: f32) -> Self {
        self.scale_factor = Some(scale_factor);
        self.add_offset = Some(add_offset);
        self
    }

    /// Use the short `lat`/`lon` coordinate names.
    pub fn with_short_names(mut self) -> Self {
        self.lat_name = "lat";
        self.lon_name = "lon";
        self
    }

    /// Write the fixture to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = netcdf::create(path)?;
        file.add_dimension(self.lat_name, self.latitudes.len())?;
        file.add_dimension(self.lon_name, self.longitudes.len())?;

        {
            let mut lat = file.add_variable::<f64>(self.lat_name, &[self.lat_name])?;
            lat.put_attribute("units", "degrees_north")?;
            lat.put_values(&self.latitudes, ..)?;
        }
        {
            let mut lon = file.add_variable::<f64>(self.lon_name, &[self.lon_name])?;
            lon.put_attribute("units", "degrees_east")?;
            lon.put_values(&self.longitudes, ..)?;
        }

        let dims: Vec<&str> = match &self.times {
            Some(times) => {
                file.add_dimension("time", times.len())?;
                let mut time = file.add_variable::<f64>("time", &["time"])?;
                time.put_attribute("units", TIME_UNITS)?;
                time.put_attribute("calendar", "standard")?;
                let offsets: Vec<f64> = times.iter().map(|t| days_since_epoch(*t)).collect();
                if !offsets.is_empty() {
                    time.put_values(&offsets, ..)?;
                }
                vec!["time", self.lat_name, self.lon_name]
            }
            None => vec![self.lat_name, self.lon_name],
        };

        let mut var = file.add_variable::<f32>(&self.variable, &dims)?;
        if let Some(fill) = self.fill_value {
            var.put_attribute("_FillValue", fill)?;
        }
        if let Some(scale) = self.scale_factor {
            var.put_attribute("scale_factor", scale)?;
        }
        if let Some(offset) = self.add_offset {
            var.put_attribute("add_offset", offset)?;
        }

        let flat: Vec<f32> = self.steps.iter().flatten().copied().collect();
        if !flat.is_empty() {
            var.put_values(&flat, ..)?;
        }
        Ok(())
    }
}

fn days_since_epoch(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 86_400_000.0
}

/// Closed rectangular ring, counter-clockwise from the south-west corner.
pub fn square(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Vec<[f64; 2]> {
    vec![
        [lon_min, lat_min],
        [lon_max, lat_min],
        [lon_max, lat_max],
        [lon_min, lat_max],
        [lon_min, lat_min],
    ]
}

/// FeatureCollection with one Polygon feature per ring.
pub fn polygon_collection(rings: &[Vec<[f64; 2]>]) -> Value {
    let features: Vec<Value> = rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            json!({
                "type": "Feature",
                "properties": { "id": i },
                "geometry": { "type": "Polygon", "coordinates": [ring] }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Write `reference_dir/geojsons/<name>.geojson`.
pub fn write_polygon_set(reference_dir: &Path, name: &str, rings: &[Vec<[f64; 2]>]) -> io::Result<PathBuf> {
    let dir = reference_dir.join("geojsons");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.geojson", name));
    fs::write(&path, polygon_collection(rings).to_string())?;
    Ok(path)
}

/// Color-scale record as stored on disk: `{ name: { scale, cmap } }`.
pub fn colorscale_record(name: &str, scale: &[f64], cmap: &[[u8; 3]]) -> Value {
    json!({ name: { "scale": scale, "cmap": cmap } })
}

/// Write `reference_dir/<name>.json`.
pub fn write_colorscale(reference_dir: &Path, name: &str, scale: &[f64], cmap: &[[u8; 3]]) -> io::Result<PathBuf> {
    fs::create_dir_all(reference_dir)?;
    let path = reference_dir.join(format!("{}.json", name));
    fs::write(&path, colorscale_record(name, scale, cmap).to_string())?;
    Ok(path)
}

/// Common bounding boxes as `(lon_min, lon_max, lat_min, lat_max)`.
pub mod bbox {
    /// Brazil, as in the named-region table
    pub const BRAZIL: (f64, f64, f64, f64) = (-75.0, -32.0, -34.0, 5.3);

    /// Whole globe
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);
}
