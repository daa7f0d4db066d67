//! Subset and aggregation over real NetCDF files.

use chrono::{TimeZone, Utc};
use grid_processor::{aggregate, subset, GridProcessorError};
use moon_common::{Aggregation, Extent};
use netcdf_parser::GriddedDataset;
use std::path::PathBuf;
use tempfile::TempDir;
use test_utils::{assert_approx_eq, axis, constant_grid, create_test_grid, GridFixture};

fn day(d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

/// Two daily files on a 2x2 grid holding 2.0 and 4.0 everywhere.
fn two_steps(dir: &TempDir) -> Vec<PathBuf> {
    [(1, 2.0), (2, 4.0)]
        .iter()
        .map(|&(d, v)| {
            let path = dir.path().join(format!("day{}.nc", d));
            GridFixture::new("temp", axis(0.0, 1.0, 2), axis(0.0, 1.0, 2))
                .with_step(day(d), constant_grid(2, 2, v))
                .write(&path)
                .unwrap();
            path
        })
        .collect()
}

fn reduce(paths: &[PathBuf], op: Aggregation) -> f32 {
    let ds = GriddedDataset::open(paths, "temp").unwrap();
    let field = aggregate(&ds, Some(op)).unwrap();
    assert_eq!(field.shape(), (2, 2));
    field.data[0]
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_two_step_reductions() {
    let dir = TempDir::new().unwrap();
    let paths = two_steps(&dir);

    assert_eq!(reduce(&paths, Aggregation::Mean), 3.0);
    assert_eq!(reduce(&paths, Aggregation::Max), 4.0);
    assert_eq!(reduce(&paths, Aggregation::Min), 2.0);
    assert_eq!(reduce(&paths, Aggregation::First), 2.0);
    assert_eq!(reduce(&paths, Aggregation::Last), 4.0);
    assert_eq!(reduce(&paths, Aggregation::Sum), 6.0);
    assert_eq!(reduce(&paths, Aggregation::Median), 3.0);
    assert_eq!(reduce(&paths, Aggregation::Count), 2.0);
    assert_approx_eq!(reduce(&paths, Aggregation::Std), 1.0, 1e-6);
    assert_approx_eq!(reduce(&paths, Aggregation::Var), 1.0, 1e-6);
}

#[test]
fn test_unknown_operator_name() {
    assert!("bogus".parse::<Aggregation>().is_err());
}

#[test]
fn test_single_step_squeezed_without_aggregation() {
    let dir = TempDir::new().unwrap();
    let paths = two_steps(&dir);
    let ds = GriddedDataset::open(&paths[..1], "temp").unwrap();
    let field = aggregate(&ds, None).unwrap();
    assert_eq!(field.data, vec![2.0; 4]);
}

#[test]
fn test_multiple_steps_require_aggregation() {
    let dir = TempDir::new().unwrap();
    let paths = two_steps(&dir);
    let ds = GriddedDataset::open(&paths, "temp").unwrap();
    assert!(matches!(
        aggregate(&ds, None),
        Err(GridProcessorError::AmbiguousTimeAxis { steps: 2 })
    ));
}

// ============================================================================
// Subset
// ============================================================================

#[test]
fn test_subset_then_aggregate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.nc");
    GridFixture::new("temp", axis(-10.0, 1.0, 21), axis(-60.0, 1.0, 31))
        .with_step(day(1), create_test_grid(21, 31))
        .write(&path)
        .unwrap();

    let mut ds = GriddedDataset::open(&[path], "temp").unwrap();
    let extent = Extent::new(-50.5, -45.0, -5.0, 0.0);
    subset(&mut ds, Some(&extent)).unwrap();

    let field = aggregate(&ds, None).unwrap();
    assert_eq!(field.longitudes, vec![-50.0, -49.0, -48.0, -47.0, -46.0, -45.0]);
    assert_eq!(field.latitudes, vec![-5.0, -4.0, -3.0, -2.0, -1.0, 0.0]);
    // lon index 10, lat index 5
    assert_eq!(field.data[0], 10_005.0);

    let bounds = field.bounds().unwrap();
    assert!(bounds.lon_min >= extent.lon_min && bounds.lon_max <= extent.lon_max);
    assert!(bounds.lat_min >= extent.lat_min && bounds.lat_max <= extent.lat_max);
}

#[test]
fn test_subset_none_is_noop() {
    let dir = TempDir::new().unwrap();
    let paths = two_steps(&dir);
    let mut ds = GriddedDataset::open(&paths, "temp").unwrap();
    subset(&mut ds, None).unwrap();
    assert_eq!(ds.shape(), (2, 2, 2));
}

#[test]
fn test_subset_outside_grid() {
    let dir = TempDir::new().unwrap();
    let paths = two_steps(&dir);
    let mut ds = GriddedDataset::open(&paths, "temp").unwrap();
    let err = subset(&mut ds, Some(&Extent::new(100.0, 110.0, 50.0, 60.0))).unwrap_err();
    assert!(matches!(err, GridProcessorError::EmptySelection { .. }));
}
