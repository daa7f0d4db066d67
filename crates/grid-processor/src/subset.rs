//! Coordinate-range subsetting.
//!
//! Selection is by coordinate value, not index: a point is kept when
//! `min <= c <= max`, whichever direction the axis runs. Axes are assumed
//! monotonic, so the kept points form one contiguous index range.

use moon_common::Extent;
use netcdf_parser::GriddedDataset;
use std::ops::Range;
use tracing::{debug, instrument};

use crate::error::{GridProcessorError, Result};

/// Index range of the coordinates inside `[min, max]`, or `None` if no
/// coordinate falls inside.
pub fn select_range(coords: &[f64], min: f64, max: f64) -> Option<Range<usize>> {
    let inside = |c: &f64| *c >= min && *c <= max;
    let first = coords.iter().position(inside)?;
    let last = coords.iter().rposition(inside)?;
    Some(first..last + 1)
}

/// Restrict the dataset's window to `extent`. A no-op when `extent` is
/// `None`.
#[instrument(skip_all, fields(variable = %dataset.variable(), extent = ?extent))]
pub fn subset(dataset: &mut GriddedDataset, extent: Option<&Extent>) -> Result<()> {
    let Some(extent) = extent else {
        return Ok(());
    };

    let empty = || GridProcessorError::EmptySelection { extent: *extent };
    let lat = select_range(dataset.latitudes(), extent.lat_min, extent.lat_max).ok_or_else(empty)?;
    let lon = select_range(dataset.longitudes(), extent.lon_min, extent.lon_max).ok_or_else(empty)?;

    dataset.restrict(lat, lon);

    debug!(
        extent = ?extent.as_array(),
        shape = ?dataset.shape(),
        "Subset dataset to extent"
    );
    Ok(())
}
