//! Polygon masking of reduced fields.

use grid_processor::{mask, PolygonSet, ReducedField};
use moon_common::Extent;
use tempfile::TempDir;
use test_utils::{axis, constant_grid, polygon_collection, square, write_polygon_set};

/// 10x10 field of ones on integer coordinates 0..=9.
fn field() -> ReducedField {
    ReducedField::new(axis(0.0, 1.0, 10), axis(0.0, 1.0, 10), constant_grid(10, 10, 1.0)).unwrap()
}

fn set(rings: &[Vec<[f64; 2]>]) -> PolygonSet {
    PolygonSet::from_geojson_str(&polygon_collection(rings).to_string()).unwrap()
}

#[test]
fn test_inside_included_outside_excluded() {
    let polygons = set(&[square(1.5, 1.5, 3.5, 3.5)]);
    let out = mask(&field(), &polygons, None, 1.0).unwrap();

    // window is the polygon bounds padded by 1 degree: 0.5..=4.5 → 1..=4
    assert_eq!(out.field.field.longitudes, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(out.extent, Extent::new(1.5, 3.5, 1.5, 3.5));

    // (lat 2, lon 2) is inside, (lat 1, lon 1) is not
    assert!(out.field.is_included(1, 1));
    assert_eq!(out.field.field.get(1, 1), Some(1.0));
    assert!(!out.field.is_included(0, 0));
    assert!(out.field.field.get(0, 0).unwrap().is_nan());
    assert_eq!(out.field.included_count(), 4);
}

#[test]
fn test_union_of_disjoint_polygons() {
    let polygons = set(&[square(0.5, 0.5, 1.5, 1.5), square(6.5, 6.5, 7.5, 7.5)]);
    let out = mask(&field(), &polygons, Some(&Extent::new(0.0, 9.0, 0.0, 9.0)), 0.0).unwrap();

    assert_eq!(out.field.field.shape(), (10, 10));
    assert!(out.field.is_included(1, 1));
    assert!(out.field.is_included(7, 7));
    assert!(!out.field.is_included(4, 4));
    assert_eq!(out.field.included_count(), 2);
}

#[test]
fn test_masked_grid_keeps_shape_and_coords() {
    let polygons = set(&[square(2.5, 2.5, 5.5, 5.5)]);
    let out = mask(&field(), &polygons, Some(&Extent::new(2.0, 6.0, 2.0, 6.0)), 1.0).unwrap();

    let (h, w) = out.field.field.shape();
    assert_eq!((h, w), (7, 7));
    assert_eq!(out.field.mask.len(), h * w);
    assert_eq!(out.lons2d.len(), h * w);
    assert_eq!(out.lats2d[w], 2.0);
    assert_eq!(out.extent, Extent::new(2.0, 6.0, 2.0, 6.0));
}

#[test]
fn test_polygon_set_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_polygon_set(dir.path(), "box", &[square(0.0, 0.0, 1.0, 1.0)]).unwrap();
    let polygons = PolygonSet::from_file(&path).unwrap();
    assert_eq!(polygons.len(), 1);

    assert!(PolygonSet::from_file(&dir.path().join("missing.geojson")).is_err());
}

#[test]
fn test_empty_polygon_set_without_extent() {
    let polygons = PolygonSet::default();
    assert!(mask(&field(), &polygons, None, 1.0).is_err());
}
