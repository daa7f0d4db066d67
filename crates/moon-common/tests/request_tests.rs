//! Tests for request parameter validation.

use chrono::{TimeZone, Utc};
use moon_common::{Aggregation, Extent, Kind, MoonError, RequestParams, TimeSelection};
use serde_json::json;
use std::path::Path;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn field_of(err: MoonError) -> String {
    match err {
        MoonError::InvalidRequest { field, .. } => field,
        other => panic!("expected InvalidRequest, got {:?}", other),
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_defaults_are_applied() {
    let desc = RequestParams::new("forecast", "gfs_glo", "2m_air_temperature")
        .with_date("2024-01-01")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap();

    assert_eq!(desc.kind(), Kind::Forecast);
    assert_eq!(desc.member(), "M000");
    assert_eq!(desc.source(), Path::new("/data"));
    assert_eq!(desc.aggregation(), None);
    assert_eq!(desc.extent(), None);
    assert_eq!(
        desc.time(),
        TimeSelection::Instant(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_missing_date_uses_now() {
    let desc = RequestParams::new("forecast", "gfs_glo", "t2m")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap();
    assert_eq!(desc.time(), TimeSelection::Instant(now()));
}

#[test]
fn test_interval_and_named_extent() {
    let desc = RequestParams::new("observed", "merge_as", "precipitation")
        .with_interval("2024-01-01", "2024-01-10")
        .with_aggregation("sum")
        .with_extent("br")
        .with_source("/mnt/archive")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap();

    assert!(desc.time().is_interval());
    assert_eq!(desc.aggregation(), Some(Aggregation::Sum));
    assert_eq!(desc.extent(), Some(Extent::new(-75.0, -32.0, -34.0, 5.3)));
    assert_eq!(desc.source(), Path::new("/mnt/archive"));
}

#[test]
fn test_literal_extent() {
    let desc = RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_extent("-60,-40,-30,-10")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap();
    assert_eq!(desc.extent(), Some(Extent::new(-60.0, -40.0, -30.0, -10.0)));
}

#[test]
fn test_params_deserialize_from_query_shape() {
    let params: RequestParams = serde_json::from_value(json!({
        "kind": "reanalysis",
        "model": "cfs_glo",
        "variable": "t2m",
        "initDate": "2024-01-01T00:00:00Z",
        "endDate": "2024-01-03T00:00:00Z",
        "aggregation": "max",
        "levels": {"min": 0, "max": 10, "step": 2},
        "colorbar": "temperature"
    }))
    .unwrap();

    assert_eq!(params.init_date.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(params.render.dpi, 100);
    assert!(params.render.levels.is_some());

    let desc = params.into_descriptor(now(), Path::new("/data")).unwrap();
    assert_eq!(desc.render().colorbar, Some(json!("temperature")));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_unknown_kind() {
    let err = RequestParams::new("hindcast", "gfs_glo", "t2m")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "kind");
}

#[test]
fn test_model_not_allowed_for_kind() {
    let err = RequestParams::new("climatology", "gfs_glo", "t2m")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "model");
}

#[test]
fn test_unsupported_model_variable_combination() {
    let err = RequestParams::new("forecast", "chimera_as", "500hPa_geopotential_height")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "variable");
}

#[test]
fn test_observed_future_date() {
    let err = RequestParams::new("observed", "merge_as", "precipitation")
        .with_date("2030-01-01")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "date");
}

#[test]
fn test_forecast_future_date_is_fine() {
    assert!(RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_date("2030-01-01")
        .into_descriptor(now(), Path::new("/data"))
        .is_ok());
}

#[test]
fn test_half_open_interval() {
    let mut params = RequestParams::new("forecast", "gfs_glo", "t2m");
    params.init_date = Some("2024-01-01".into());
    let err = params.into_descriptor(now(), Path::new("/data")).unwrap_err();
    assert_eq!(field_of(err), "endDate");
}

#[test]
fn test_inverted_interval() {
    let err = RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_interval("2024-01-05", "2024-01-01")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "initDate");
}

#[test]
fn test_bad_date() {
    let err = RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_date("01/02/2024")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "date");
}

#[test]
fn test_unknown_aggregation() {
    let err = RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_aggregation("bogus")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert!(matches!(err, MoonError::UnsupportedAggregation { ref requested } if requested == "bogus"));
}

#[test]
fn test_unknown_region() {
    let err = RequestParams::new("forecast", "gfs_glo", "t2m")
        .with_extent("XX")
        .into_descriptor(now(), Path::new("/data"))
        .unwrap_err();
    assert_eq!(field_of(err), "extent");
}

#[test]
fn test_region_table_has_32_distinct_codes() {
    assert_eq!(moon_common::bbox::REGION_DEFINITIONS.len(), 33);
    assert_eq!(moon_common::regions().len(), 32);
}
