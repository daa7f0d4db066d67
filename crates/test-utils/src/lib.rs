//! Test support for the moonpng crates.
//!
//! [`fixtures`] writes the on-disk inputs the pipeline reads (NetCDF grids,
//! GeoJSON polygon sets, color-scale records) and [`generators`] builds the
//! coordinate axes and value grids that go into them.

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// `|left - right| <= epsilon`, comparing as f64.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        assert!(
            (left - right).abs() <= epsilon,
            "values not within {}: {} vs {}",
            epsilon,
            left,
            right
        );
    }};
}

/// Element-wise approximate equality of two float slices, treating NaN as
/// equal to NaN.
#[macro_export]
macro_rules! assert_grid_eq {
    ($left:expr, $right:expr) => {{
        let left = &$left;
        let right = &$right;
        assert_eq!(left.len(), right.len(), "grid lengths differ");
        for (i, (a, b)) in left.iter().zip(right.iter()).enumerate() {
            let (a, b) = (*a as f64, *b as f64);
            if a.is_nan() && b.is_nan() {
                continue;
            }
            if (a - b).abs() > 1e-5 {
                panic!("grids differ at index {}: {:?} vs {:?}", i, a, b);
            }
        }
    }};
}
