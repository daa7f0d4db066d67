//! Color-scale registry loading and colorbar resolution.

use renderer::{resolve_colorbar, resolve_levels, ColorScaleRegistry, RenderError};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use test_utils::write_colorscale;

fn reference_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_colorscale(
        dir.path(),
        "precipitation",
        &[0.0, 1.0, 5.0, 10.0],
        &[[255, 255, 255], [150, 200, 255], [0, 100, 255]],
    )
    .unwrap();
    write_colorscale(dir.path(), "anomaly", &[-2.0, 0.0, 2.0], &[[0, 0, 255], [255, 255, 255], [255, 0, 0]]).unwrap();
    dir
}

#[test]
fn test_registry_loads_every_scale() {
    let dir = reference_dir();
    let registry = ColorScaleRegistry::load_dir(dir.path()).unwrap();
    assert_eq!(registry.names(), vec!["anomaly", "precipitation"]);
}

#[test]
fn test_registry_skips_broken_files() {
    let dir = reference_dir();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("mismatched.json"), json!({"other": {"scale": [0, 1], "cmap": [[0, 0, 0]]}}).to_string()).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let registry = ColorScaleRegistry::load_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.get("broken").is_none());
}

#[test]
fn test_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let registry = ColorScaleRegistry::load_dir(&dir.path().join("nope")).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_named_colorbar_replaces_levels() {
    let dir = reference_dir();
    let registry = ColorScaleRegistry::load_dir(dir.path()).unwrap();

    let ramp = resolve_colorbar(Some(&json!("precipitation")), Some(&registry))
        .unwrap()
        .unwrap();
    assert_eq!(ramp.levels().unwrap().values(), &[0.0, 1.0, 5.0, 10.0]);
    assert_eq!(ramp.colors.len(), 3);
    assert_eq!(ramp.colors[0], [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_unknown_named_colorbar() {
    let registry = ColorScaleRegistry::default();
    let err = resolve_colorbar(Some(&json!("missing")), Some(&registry)).unwrap_err();
    assert!(matches!(err, RenderError::InvalidColorbar { ref given, .. } if given == "missing"));
}

#[test]
fn test_inline_colorbar_three_boundaries_three_colors() {
    let spec = json!({"custom": {"scale": [0, 10, 20], "cmap": [[0, 0, 0], [128, 128, 128], [255, 255, 255]]}});
    let ramp = resolve_colorbar(Some(&spec), None).unwrap().unwrap();
    assert_eq!(ramp.norm.boundaries().len(), 3);
}

#[test]
fn test_levels_and_colorbar_errors_map_to_request_errors() {
    let err: moon_common::MoonError = resolve_colorbar(Some(&json!(7)), None).unwrap_err().into();
    assert_eq!(err.error_code(), "InvalidColorbar");
    assert_eq!(err.http_status_code(), 400);

    let err: moon_common::MoonError = resolve_levels(Some(&json!([2, 1]))).unwrap_err().into();
    assert_eq!(err.error_code(), "InvalidRequest");
}
