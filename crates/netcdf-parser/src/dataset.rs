//! Gridded datasets backed by open NetCDF files.
//!
//! A [`GriddedDataset`] is one logical `(time, latitude, longitude)` array
//! assembled from one or more files. Opening reads only coordinates and
//! attributes; data values are read on demand, one time step (or one file
//! slab) at a time, restricted to the current spatial window.
//!
//! The dataset owns its file handles. They are released when the dataset is
//! closed or dropped.

use chrono::{DateTime, Utc};
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::cf::{TimeUnits, ValueDecoding};
use crate::error::{NetCdfError, NetCdfResult};
use crate::native::open_file;

/// Accepted names for the latitude dimension/coordinate.
pub const LATITUDE_NAMES: &[&str] = &["latitude", "lat"];
/// Accepted names for the longitude dimension/coordinate.
pub const LONGITUDE_NAMES: &[&str] = &["longitude", "lon"];

/// Coordinates of two files are considered equal within this tolerance.
const COORD_TOLERANCE: f64 = 1e-6;

struct SourceFile {
    path: PathBuf,
    file: netcdf::File,
    /// Number of time steps contributed by this file
    steps: usize,
    /// False for files storing a bare (latitude, longitude) field
    has_time_dim: bool,
    times: Option<Vec<DateTime<Utc>>>,
    decoding: ValueDecoding,
}

struct OpenedSource {
    source: SourceFile,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

/// One logical `(time, latitude, longitude)` grid over a set of files.
pub struct GriddedDataset {
    variable: String,
    sources: Vec<SourceFile>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    lat_window: Range<usize>,
    lon_window: Range<usize>,
}

impl GriddedDataset {
    /// Open one or more files as a single dataset of `variable`.
    ///
    /// A single path is opened directly. Several paths are merged along the
    /// time axis: they must share the latitude/longitude grid and are ordered
    /// by their time coordinate when every file has one (input order
    /// otherwise). Nothing is returned unless every file opens cleanly.
    #[instrument(skip_all, fields(variable = %variable, files = paths.len()))]
    pub fn open<P: AsRef<Path>>(paths: &[P], variable: &str) -> NetCdfResult<Self> {
        let mut opened = paths.iter().map(|p| open_source(p.as_ref(), variable));

        let first = opened.next().ok_or(NetCdfError::NoFiles)??;
        let latitudes = first.latitudes;
        let longitudes = first.longitudes;
        let mut sources = vec![first.source];

        for next in opened {
            let next = next?;
            check_same_axis(&next.source.path, "latitude", &latitudes, &next.latitudes)?;
            check_same_axis(&next.source.path, "longitude", &longitudes, &next.longitudes)?;
            sources.push(next.source);
        }

        if sources.len() > 1 && sources.iter().all(|s| s.times.is_some()) {
            sources.sort_by_key(|s| s.times.as_ref().and_then(|t| t.first().copied()));
        }

        let dataset = Self {
            variable: variable.to_string(),
            lat_window: 0..latitudes.len(),
            lon_window: 0..longitudes.len(),
            sources,
            latitudes,
            longitudes,
        };

        debug!(
            variable = %dataset.variable,
            files = dataset.sources.len(),
            shape = ?dataset.shape(),
            "Opened gridded dataset"
        );

        Ok(dataset)
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Paths of the backing files, in time order.
    pub fn paths(&self) -> Vec<&Path> {
        self.sources.iter().map(|s| s.path.as_path()).collect()
    }

    pub fn file_count(&self) -> usize {
        self.sources.len()
    }

    /// Length of the merged time axis.
    pub fn time_len(&self) -> usize {
        self.sources.iter().map(|s| s.steps).sum()
    }

    /// Decoded time coordinate, when every file carries one.
    pub fn times(&self) -> Option<Vec<DateTime<Utc>>> {
        let mut all = Vec::with_capacity(self.time_len());
        for source in &self.sources {
            all.extend_from_slice(source.times.as_ref()?);
        }
        Some(all)
    }

    /// Latitudes inside the current window.
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes[self.lat_window.clone()]
    }

    /// Longitudes inside the current window.
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes[self.lon_window.clone()]
    }

    /// `(time, latitude, longitude)` sizes of the current window.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.time_len(), self.lat_window.len(), self.lon_window.len())
    }

    /// Narrow the spatial window. Ranges index into the *current* window's
    /// coordinates and are clamped to it.
    pub fn restrict(&mut self, lat: Range<usize>, lon: Range<usize>) {
        self.lat_window = narrow(&self.lat_window, lat);
        self.lon_window = narrow(&self.lon_window, lon);
    }

    /// Read one time step of the windowed field, row-major `(lat, lon)`.
    pub fn read_step(&self, index: usize) -> NetCdfResult<Vec<f32>> {
        let (source, local) = self.locate(index)?;
        let var = self.variable_of(source)?;

        let read = if source.has_time_dim {
            var.get_values::<f32, _>((local..local + 1, self.lat_window.clone(), self.lon_window.clone()))
        } else {
            var.get_values::<f32, _>((self.lat_window.clone(), self.lon_window.clone()))
        };

        let mut values = read.map_err(|e| self.read_error(source, e))?;
        source.decoding.decode_in_place(&mut values);
        Ok(values)
    }

    /// Lazily read every time step in order.
    pub fn steps(&self) -> impl Iterator<Item = NetCdfResult<Vec<f32>>> + '_ {
        (0..self.time_len()).map(move |t| self.read_step(t))
    }

    /// Read the whole windowed cube, `(time, lat, lon)` row-major, one file
    /// slab per read.
    pub fn read_all(&self) -> NetCdfResult<Vec<f32>> {
        let (nt, ny, nx) = self.shape();
        let mut cube = Vec::with_capacity(nt * ny * nx);

        for source in &self.sources {
            if source.steps == 0 {
                continue;
            }
            let var = self.variable_of(source)?;
            let read = if source.has_time_dim {
                var.get_values::<f32, _>((0..source.steps, self.lat_window.clone(), self.lon_window.clone()))
            } else {
                var.get_values::<f32, _>((self.lat_window.clone(), self.lon_window.clone()))
            };
            let mut values = read.map_err(|e| self.read_error(source, e))?;
            source.decoding.decode_in_place(&mut values);
            cube.extend_from_slice(&values);
        }

        Ok(cube)
    }

    /// Release every file handle.
    pub fn close(self) {
        debug!(
            variable = %self.variable,
            files = self.sources.len(),
            "Closing gridded dataset"
        );
        drop(self);
    }

    fn locate(&self, index: usize) -> NetCdfResult<(&SourceFile, usize)> {
        let mut remaining = index;
        for source in &self.sources {
            if remaining < source.steps {
                return Ok((source, remaining));
            }
            remaining -= source.steps;
        }
        Err(NetCdfError::StepOutOfRange {
            index,
            len: self.time_len(),
        })
    }

    fn variable_of<'f>(&self, source: &'f SourceFile) -> NetCdfResult<netcdf::Variable<'f>> {
        source
            .file
            .variable(&self.variable)
            .ok_or_else(|| NetCdfError::MissingVariable {
                path: source.path.clone(),
                variable: self.variable.clone(),
            })
    }

    fn read_error(&self, source: &SourceFile, err: netcdf::Error) -> NetCdfError {
        NetCdfError::Read {
            path: source.path.clone(),
            variable: self.variable.clone(),
            message: err.to_string(),
        }
    }
}

impl fmt::Debug for GriddedDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GriddedDataset")
            .field("variable", &self.variable)
            .field("paths", &self.paths())
            .field("shape", &self.shape())
            .finish()
    }
}

fn narrow(current: &Range<usize>, sub: Range<usize>) -> Range<usize> {
    let len = current.len();
    let start = sub.start.min(len);
    let end = sub.end.clamp(start, len);
    current.start + start..current.start + end
}

fn open_source(path: &Path, variable: &str) -> NetCdfResult<OpenedSource> {
    let file = open_file(path)?;

    let (dims, lens, decoding) = {
        let var = file
            .variable(variable)
            .ok_or_else(|| NetCdfError::MissingVariable {
                path: path.to_path_buf(),
                variable: variable.to_string(),
            })?;
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let lens: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        (dims, lens, ValueDecoding::from_variable(&var))
    };

    let rank = dims.len();
    let well_formed = (rank == 2 || rank == 3)
        && LATITUDE_NAMES.contains(&dims[rank - 2].as_str())
        && LONGITUDE_NAMES.contains(&dims[rank - 1].as_str());
    if !well_formed {
        return Err(NetCdfError::InvalidDimensions {
            path: path.to_path_buf(),
            variable: variable.to_string(),
            dims,
        });
    }

    let latitudes = read_coordinate(&file, path, &dims[rank - 2])?;
    let longitudes = read_coordinate(&file, path, &dims[rank - 1])?;

    let (steps, has_time_dim, times) = if rank == 3 {
        (lens[0], true, read_times(&file, path, &dims[0], lens[0]))
    } else {
        (1, false, None)
    };

    Ok(OpenedSource {
        source: SourceFile {
            path: path.to_path_buf(),
            file,
            steps,
            has_time_dim,
            times,
            decoding,
        },
        latitudes,
        longitudes,
    })
}

fn read_coordinate(file: &netcdf::File, path: &Path, name: &str) -> NetCdfResult<Vec<f64>> {
    let missing = || NetCdfError::MissingCoordinate {
        path: path.to_path_buf(),
        name: name.to_string(),
    };
    let var = file.variable(name).ok_or_else(missing)?;
    var.get_values::<f64, _>(..).map_err(|_| missing())
}

fn read_times(file: &netcdf::File, path: &Path, name: &str, steps: usize) -> Option<Vec<DateTime<Utc>>> {
    let var = file.variable(name)?;
    let Some(units) = TimeUnits::from_variable(&var) else {
        warn!(path = %path.display(), coordinate = name, "Time coordinate has no decodable units");
        return None;
    };
    let raw = var.get_values::<f64, _>(..).ok()?;
    if raw.len() != steps {
        return None;
    }
    raw.into_iter().map(|v| units.to_datetime(v)).collect()
}

fn check_same_axis(path: &Path, axis: &str, expected: &[f64], actual: &[f64]) -> NetCdfResult<()> {
    if expected.len() != actual.len() {
        return Err(NetCdfError::IncompatibleGrid {
            path: path.to_path_buf(),
            reason: format!("{} has {} points, expected {}", axis, actual.len(), expected.len()),
        });
    }
    if let Some(i) = expected
        .iter()
        .zip(actual)
        .position(|(a, b)| (a - b).abs() > COORD_TOLERANCE)
    {
        return Err(NetCdfError::IncompatibleGrid {
            path: path.to_path_buf(),
            reason: format!("{} differs at index {} ({} vs {})", axis, i, actual[i], expected[i]),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_is_relative_to_current_window() {
        assert_eq!(narrow(&(10..20), 2..5), 12..15);
        assert_eq!(narrow(&(10..20), 5..50), 15..20);
        assert_eq!(narrow(&(10..20), 30..40), 20..20);
    }

    #[test]
    fn test_check_same_axis() {
        let path = Path::new("/tmp/x.nc");
        assert!(check_same_axis(path, "latitude", &[1.0, 2.0], &[1.0, 2.0]).is_ok());
        assert!(check_same_axis(path, "latitude", &[1.0, 2.0], &[1.0]).is_err());
        assert!(check_same_axis(path, "latitude", &[1.0, 2.0], &[1.0, 2.5]).is_err());
    }
}
