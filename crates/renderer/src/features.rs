//! Map feature directives.
//!
//! The `details` option maps feature names to drawing styles. Names resolve
//! through a closed table of Natural Earth layers; anything else is
//! rejected. Gridlines and polygon-set outlines are drawn on top of the
//! features.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{RenderError, Result};

/// Natural Earth resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    #[serde(rename = "10m")]
    Fine,
    #[serde(rename = "50m")]
    Medium,
    #[serde(rename = "110m")]
    Coarse,
}

impl Scale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Fine => "10m",
            Scale::Medium => "50m",
            Scale::Coarse => "110m",
        }
    }
}

/// Known map features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapFeature {
    Coastline,
    Borders,
    Land,
    Ocean,
    Lakes,
    Rivers,
    States,
    Admin0StatesProvinces,
    Admin1StatesProvinces,
}

impl MapFeature {
    pub const ALL: [MapFeature; 9] = [
        MapFeature::Coastline,
        MapFeature::Borders,
        MapFeature::Land,
        MapFeature::Ocean,
        MapFeature::Lakes,
        MapFeature::Rivers,
        MapFeature::States,
        MapFeature::Admin0StatesProvinces,
        MapFeature::Admin1StatesProvinces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapFeature::Coastline => "COASTLINE",
            MapFeature::Borders => "BORDERS",
            MapFeature::Land => "LAND",
            MapFeature::Ocean => "OCEAN",
            MapFeature::Lakes => "LAKES",
            MapFeature::Rivers => "RIVERS",
            MapFeature::States => "STATES",
            MapFeature::Admin0StatesProvinces => "ADMIN_0_STATES_PROVINCES",
            MapFeature::Admin1StatesProvinces => "ADMIN_1_STATES_PROVINCES",
        }
    }

    /// Natural Earth `(category, layer)`.
    pub fn source(&self) -> (&'static str, &'static str) {
        match self {
            MapFeature::Coastline => ("physical", "coastline"),
            MapFeature::Borders => ("cultural", "admin_0_boundary_lines_land"),
            MapFeature::Land => ("physical", "land"),
            MapFeature::Ocean => ("physical", "ocean"),
            MapFeature::Lakes => ("physical", "lakes"),
            MapFeature::Rivers => ("physical", "rivers_lake_centerlines"),
            MapFeature::States => ("cultural", "admin_1_states_provinces_lakes"),
            MapFeature::Admin0StatesProvinces => ("cultural", "admin_0_boundary_lines_land"),
            MapFeature::Admin1StatesProvinces => ("cultural", "admin_1_states_provinces"),
        }
    }

    /// The administrative layers are only drawn at 50m.
    pub fn fixed_scale(&self) -> Option<Scale> {
        match self {
            MapFeature::Admin0StatesProvinces | MapFeature::Admin1StatesProvinces => Some(Scale::Medium),
            _ => None,
        }
    }
}

impl fmt::Display for MapFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapFeature {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        MapFeature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| RenderError::UnknownFeature(s.to_string()))
    }
}

/// Style of one feature as given in `details`.
#[derive(Debug, Clone, Deserialize)]
struct FeatureStyle {
    #[serde(default = "default_edgecolor")]
    edgecolor: String,
    #[serde(default = "default_facecolor")]
    facecolor: String,
    #[serde(default = "default_zorder")]
    zorder: i32,
    #[serde(default)]
    scale: Option<Scale>,
}

fn default_edgecolor() -> String {
    "black".to_string()
}

fn default_facecolor() -> String {
    "none".to_string()
}

fn default_zorder() -> i32 {
    3
}

/// A resolved drawing instruction for one map feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDirective {
    pub feature: MapFeature,
    pub scale: Scale,
    pub edgecolor: String,
    pub facecolor: String,
    pub zorder: i32,
}

impl FeatureDirective {
    fn new(feature: MapFeature, edgecolor: &str, facecolor: &str, zorder: i32) -> Self {
        Self {
            feature,
            scale: Scale::Medium,
            edgecolor: edgecolor.to_string(),
            facecolor: facecolor.to_string(),
            zorder,
        }
    }
}

/// Features drawn when no `details` are given.
pub fn default_features() -> Vec<FeatureDirective> {
    vec![
        FeatureDirective::new(MapFeature::Coastline, "k", "#F5E9D3", 3),
        FeatureDirective::new(MapFeature::Borders, "black", "#F5E9D3", 3),
        FeatureDirective::new(MapFeature::Admin0StatesProvinces, "black", "none", 3),
        FeatureDirective::new(MapFeature::Admin1StatesProvinces, "black", "none", 3),
        FeatureDirective::new(MapFeature::Land, "k", "#F5E9D3", -1),
    ]
}

/// Resolve a `details` mapping into directives, ordered by feature name.
///
/// When `ocean` is false a white ocean layer is added underneath.
pub fn resolve_features(details: Option<&Value>, ocean: bool) -> Result<Vec<FeatureDirective>> {
    let mut directives = match details {
        None | Some(Value::Null) => default_features(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, style)| {
                let feature: MapFeature = name.parse()?;
                let style: FeatureStyle =
                    serde_json::from_value(style.clone()).map_err(|e| RenderError::InvalidFeature {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(FeatureDirective {
                    feature,
                    scale: feature.fixed_scale().or(style.scale).unwrap_or(Scale::Medium),
                    edgecolor: style.edgecolor,
                    facecolor: style.facecolor,
                    zorder: style.zorder,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(RenderError::InvalidFeature {
                name: other.to_string(),
                reason: "details must map feature names to styles".to_string(),
            })
        }
    };

    if !ocean {
        directives.insert(0, FeatureDirective::new(MapFeature::Ocean, "none", "white", 1));
    }
    Ok(directives)
}

/// Which map edges carry gridline labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLabels {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Longitude/latitude gridlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridlineDirective {
    pub color: String,
    pub linewidth: Option<f64>,
    pub alpha: Option<f64>,
    pub linestyle: Option<String>,
    pub zorder: i32,
    pub labels: GridLabels,
}

impl Default for GridlineDirective {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            linewidth: None,
            alpha: None,
            linestyle: None,
            zorder: 3,
            labels: GridLabels {
                top: false,
                bottom: true,
                left: true,
                right: true,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridlineStyle {
    #[serde(default = "default_edgecolor")]
    color: String,
    #[serde(default)]
    linewidth: Option<f64>,
    #[serde(default)]
    alpha: Option<f64>,
    #[serde(default)]
    linestyle: Option<String>,
    #[serde(default = "default_zorder")]
    zorder: i32,
    top_labels: Option<bool>,
    bottom_labels: Option<bool>,
    left_labels: Option<bool>,
    right_labels: Option<bool>,
}

/// Resolve the `gridlines` option.
///
/// `true` draws the default gridlines with no top labels; a style object
/// labels every edge unless it turns one off. Absent, `null` or `false`
/// draws none.
pub fn resolve_gridlines(spec: Option<&Value>) -> Result<Option<GridlineDirective>> {
    let invalid = |given: &Value, reason: String| RenderError::InvalidGridlines {
        given: given.to_string(),
        reason,
    };

    match spec {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some(GridlineDirective::default())),
        Some(spec @ Value::Object(_)) => {
            let style: GridlineStyle =
                serde_json::from_value(spec.clone()).map_err(|e| invalid(spec, e.to_string()))?;
            if style.alpha.is_some_and(|a| !(0.0..=1.0).contains(&a)) {
                return Err(invalid(spec, "alpha must be within [0, 1]".to_string()));
            }
            Ok(Some(GridlineDirective {
                color: style.color,
                linewidth: style.linewidth,
                alpha: style.alpha,
                linestyle: style.linestyle,
                zorder: style.zorder,
                labels: GridLabels {
                    top: style.top_labels.unwrap_or(true),
                    bottom: style.bottom_labels.unwrap_or(true),
                    left: style.left_labels.unwrap_or(true),
                    right: style.right_labels.unwrap_or(true),
                },
            }))
        }
        Some(other) => Err(invalid(other, "expected a boolean or a style object".to_string())),
    }
}

/// Outline of one polygon set, drawn above everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineDirective {
    pub name: String,
    /// Closed `(lon, lat)` rings: exteriors and holes alike
    #[serde(skip)]
    pub rings: Vec<Vec<(f64, f64)>>,
    pub edgecolor: String,
    pub facecolor: String,
    pub zorder: i32,
}

impl OutlineDirective {
    pub const ZORDER: i32 = 4000;

    pub fn new(name: impl Into<String>, rings: Vec<Vec<(f64, f64)>>) -> Self {
        Self {
            name: name.into(),
            rings,
            edgecolor: "black".to_string(),
            facecolor: "none".to_string(),
            zorder: Self::ZORDER,
        }
    }
}

/// Polygon set names named by the `shapecontours` option: one name, or the
/// keys of an object (their values are not used).
pub fn shapecontour_names(spec: Option<&Value>) -> Result<Vec<String>> {
    match spec {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(name)) if !name.is_empty() => Ok(vec![name.clone()]),
        Some(Value::Object(map)) => Ok(map.keys().cloned().collect()),
        Some(other) => Err(RenderError::InvalidShapeContours {
            given: other.to_string(),
            reason: "expected a polygon set name or an object keyed by names".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_round_trip_through_table() {
        for feature in MapFeature::ALL {
            assert_eq!(feature.as_str().parse::<MapFeature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_defaults() {
        let features = resolve_features(None, true).unwrap();
        assert_eq!(features.len(), 5);
        assert_eq!(features[0].feature, MapFeature::Coastline);
        assert_eq!(features[4].zorder, -1);
    }

    #[test]
    fn test_details_mapping() {
        let details = json!({
            "RIVERS": {"edgecolor": "blue", "facecolor": "none", "zorder": 5, "scale": "10m"},
            "ADMIN_1_STATES_PROVINCES": {"edgecolor": "gray", "facecolor": "none", "zorder": 4, "scale": "110m"}
        });
        let features = resolve_features(Some(&details), true).unwrap();
        assert_eq!(features.len(), 2);

        let rivers = features.iter().find(|f| f.feature == MapFeature::Rivers).unwrap();
        assert_eq!(rivers.scale, Scale::Fine);
        assert_eq!(rivers.edgecolor, "blue");

        let admin = features.iter().find(|f| f.feature == MapFeature::Admin1StatesProvinces).unwrap();
        assert_eq!(admin.scale, Scale::Medium);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let err = resolve_features(Some(&json!({"VOLCANOES": {}})), true).unwrap_err();
        assert!(matches!(err, RenderError::UnknownFeature(ref n) if n == "VOLCANOES"));
    }

    #[test]
    fn test_bad_style_rejected() {
        assert!(resolve_features(Some(&json!({"LAND": {"scale": "5m"}})), true).is_err());
        assert!(resolve_features(Some(&json!(["LAND"])), true).is_err());
    }

    #[test]
    fn test_ocean_disabled_adds_white_ocean() {
        let features = resolve_features(None, false).unwrap();
        assert_eq!(features[0].feature, MapFeature::Ocean);
        assert_eq!(features[0].facecolor, "white");
    }

    #[test]
    fn test_gridlines_flag_uses_defaults() {
        assert_eq!(resolve_gridlines(None).unwrap(), None);
        assert_eq!(resolve_gridlines(Some(&json!(false))).unwrap(), None);

        let grid = resolve_gridlines(Some(&json!(true))).unwrap().unwrap();
        assert_eq!(grid.color, "black");
        assert!(!grid.labels.top);
        assert!(grid.labels.bottom && grid.labels.left && grid.labels.right);
    }

    #[test]
    fn test_gridlines_style_object() {
        let spec = json!({
            "color": "gray", "linewidth": 0.5, "alpha": 0.4,
            "linestyle": "--", "zorder": 6, "right_labels": false
        });
        let grid = resolve_gridlines(Some(&spec)).unwrap().unwrap();
        assert_eq!(grid.color, "gray");
        assert_eq!(grid.linewidth, Some(0.5));
        assert_eq!(grid.linestyle.as_deref(), Some("--"));
        assert_eq!(grid.zorder, 6);
        assert!(grid.labels.top);
        assert!(!grid.labels.right);
    }

    #[test]
    fn test_gridlines_rejections() {
        assert!(matches!(
            resolve_gridlines(Some(&json!("yes"))),
            Err(RenderError::InvalidGridlines { .. })
        ));
        assert!(resolve_gridlines(Some(&json!({"alpha": 2.0}))).is_err());
        assert!(resolve_gridlines(Some(&json!({"colour": "red"}))).is_err());
    }

    #[test]
    fn test_shapecontour_names() {
        assert!(shapecontour_names(None).unwrap().is_empty());
        assert_eq!(shapecontour_names(Some(&json!("basins"))).unwrap(), vec!["basins"]);

        let names = shapecontour_names(Some(&json!({"states": {}, "basins": {"edgecolor": "red"}}))).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"states".to_string()));

        assert!(matches!(
            shapecontour_names(Some(&json!(["basins"]))),
            Err(RenderError::InvalidShapeContours { .. })
        ));
        assert!(shapecontour_names(Some(&json!(""))).is_err());
    }
}
