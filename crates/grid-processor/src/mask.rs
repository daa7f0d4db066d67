//! Polygon masking of a reduced field.

use moon_common::Extent;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{GridProcessorError, Result};
use crate::geojson::PolygonSet;
use crate::types::{MaskedField, ReducedField};

/// Output of [`mask`].
#[derive(Debug, Clone)]
pub struct MaskOutput {
    pub field: MaskedField,
    /// Row-major 2-D longitudes of the masked grid
    pub lons2d: Vec<f64>,
    /// Row-major 2-D latitudes of the masked grid
    pub lats2d: Vec<f64>,
    /// The requested extent, or the polygon set's bounds when none was given
    pub extent: Extent,
}

/// Restrict `field` to the cells inside any polygon of `polygons`.
///
/// The field is first cut to the working window: `extent` (or the polygon
/// set's bounds) grown by `pad` degrees on every side. Cells of that window
/// outside every polygon are set to NaN and flagged false in the mask; the
/// grid keeps its rectangular shape.
#[instrument(skip_all, fields(polygons = polygons.len(), extent = ?extent, pad = pad))]
pub fn mask(field: &ReducedField, polygons: &PolygonSet, extent: Option<&Extent>, pad: f64) -> Result<MaskOutput> {
    let extent = match extent {
        Some(extent) => *extent,
        None => polygons
            .bounds()
            .ok_or_else(|| GridProcessorError::invalid_geometry("polygon set has no polygons"))?,
    };

    let window = field.subset(&extent.pad(pad))?;
    let (lons2d, lats2d) = window.meshgrid();

    let inclusion: Vec<bool> = lons2d
        .par_iter()
        .zip(lats2d.par_iter())
        .map(|(&lon, &lat)| polygons.contains(lon, lat))
        .collect();

    let mut masked = window;
    for (value, inside) in masked.data.iter_mut().zip(&inclusion) {
        if !inside {
            *value = f32::NAN;
        }
    }

    let field = MaskedField {
        field: masked,
        mask: inclusion,
    };

    debug!(
        polygons = polygons.len(),
        extent = ?extent.as_array(),
        shape = ?field.field.shape(),
        included = field.included_count(),
        "Applied polygon mask"
    );

    Ok(MaskOutput {
        field,
        lons2d,
        lats2d,
        extent,
    })
}
