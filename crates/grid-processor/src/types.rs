//! Core types for grid processing.

use moon_common::Extent;
use serde::Serialize;

use crate::error::{GridProcessorError, Result};
use crate::subset::select_range;

/// A 2-D field with the time axis collapsed.
///
/// Data is row-major: latitude rows, longitude columns, so the value at
/// `(row, col)` is `data[row * width + col]`. Missing values are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReducedField {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub data: Vec<f32>,
}

impl ReducedField {
    /// Create a field, checking that `data` matches the coordinate lengths.
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>, data: Vec<f32>) -> Result<Self> {
        if data.len() != latitudes.len() * longitudes.len() {
            return Err(GridProcessorError::shape_mismatch(format!(
                "{} values for a {}x{} grid",
                data.len(),
                latitudes.len(),
                longitudes.len()
            )));
        }
        Ok(Self {
            latitudes,
            longitudes,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.longitudes.len()
    }

    pub fn height(&self) -> usize {
        self.latitudes.len()
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.data.get(row * self.width() + col).copied()
    }

    /// Number of non-NaN cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Bounding box of the coordinate vectors, if the field is non-empty.
    pub fn bounds(&self) -> Option<Extent> {
        let (lon_min, lon_max) = min_max(&self.longitudes)?;
        let (lat_min, lat_max) = min_max(&self.latitudes)?;
        Some(Extent::new(lon_min, lon_max, lat_min, lat_max))
    }

    /// Row-major 2-D longitude and latitude grids, `meshgrid` style.
    pub fn meshgrid(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.width() * self.height();
        let mut lons2d = Vec::with_capacity(n);
        let mut lats2d = Vec::with_capacity(n);
        for &lat in &self.latitudes {
            for &lon in &self.longitudes {
                lons2d.push(lon);
                lats2d.push(lat);
            }
        }
        (lons2d, lats2d)
    }

    /// Restrict to the cells whose coordinates fall inside `extent`.
    pub fn subset(&self, extent: &Extent) -> Result<Self> {
        let empty = || GridProcessorError::EmptySelection { extent: *extent };
        let rows = select_range(&self.latitudes, extent.lat_min, extent.lat_max).ok_or_else(empty)?;
        let cols = select_range(&self.longitudes, extent.lon_min, extent.lon_max).ok_or_else(empty)?;

        let width = self.width();
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for row in rows.clone() {
            let start = row * width;
            data.extend_from_slice(&self.data[start + cols.start..start + cols.end]);
        }

        Ok(Self {
            latitudes: self.latitudes[rows].to_vec(),
            longitudes: self.longitudes[cols].to_vec(),
            data,
        })
    }
}

/// A [`ReducedField`] with a polygon inclusion mask applied.
///
/// Excluded cells keep their grid position and hold NaN in `field.data`;
/// `mask[i]` is true where cell `i` lies inside the polygon set.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedField {
    pub field: ReducedField,
    pub mask: Vec<bool>,
}

impl MaskedField {
    pub fn included_count(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }

    pub fn is_included(&self, row: usize, col: usize) -> bool {
        self.mask
            .get(row * self.field.width() + col)
            .copied()
            .unwrap_or(false)
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ReducedField {
        // 3 rows (lat 0,1,2) x 4 cols (lon 10..13)
        ReducedField::new(
            vec![0.0, 1.0, 2.0],
            vec![10.0, 11.0, 12.0, 13.0],
            (0..12).map(|v| v as f32).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_shape_checked() {
        assert!(ReducedField::new(vec![0.0], vec![0.0, 1.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_get_and_bounds() {
        let f = field();
        assert_eq!(f.get(1, 2), Some(6.0));
        assert_eq!(f.get(3, 0), None);
        assert_eq!(f.bounds(), Some(Extent::new(10.0, 13.0, 0.0, 2.0)));
    }

    #[test]
    fn test_meshgrid() {
        let (lons, lats) = field().meshgrid();
        assert_eq!(lons.len(), 12);
        assert_eq!(lons[5], 11.0);
        assert_eq!(lats[5], 1.0);
    }

    #[test]
    fn test_subset() {
        let sub = field().subset(&Extent::new(11.0, 12.0, 1.0, 2.0)).unwrap();
        assert_eq!(sub.shape(), (2, 2));
        assert_eq!(sub.data, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_subset_outside() {
        assert!(matches!(
            field().subset(&Extent::new(50.0, 60.0, 0.0, 2.0)),
            Err(GridProcessorError::EmptySelection { .. })
        ));
    }
}
