//! Request parameters and the validated request descriptor.
//!
//! [`RequestParams`] is the flat, string-typed parameter set handed over by
//! the transport layer. [`RequestParams::into_descriptor`] checks it and
//! produces an immutable [`RequestDescriptor`]; nothing downstream touches
//! the filesystem until that conversion succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::aggregation::Aggregation;
use crate::bbox::Extent;
use crate::error::{MoonError, MoonResult};
use crate::models::is_model_allowed;
use crate::time::{parse_datetime, TimeSelection};

/// Ensemble member used when the request does not name one.
pub const DEFAULT_MEMBER: &str = "M000";

/// Top-level category of data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Observed,
    Forecast,
    Seasonal,
    Reanalysis,
    Climatology,
    Satellite,
    Radar,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Observed,
        Kind::Forecast,
        Kind::Seasonal,
        Kind::Reanalysis,
        Kind::Climatology,
        Kind::Satellite,
        Kind::Radar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Observed => "observed",
            Kind::Forecast => "forecast",
            Kind::Seasonal => "seasonal",
            Kind::Reanalysis => "reanalysis",
            Kind::Climatology => "climatology",
            Kind::Satellite => "satellite",
            Kind::Radar => "radar",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = MoonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| MoonError::invalid("kind", format!("unknown kind '{}'", s)))
    }
}

fn default_dpi() -> u32 {
    100
}

/// Rendering-adjacent parameters. Opaque to path resolution and data
/// reduction; handed to the level/colorbar resolver and the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Literal level list or `{min, max, step}`
    #[serde(default)]
    pub levels: Option<Value>,

    /// Inline `{name: {scale, cmap}}` record or the name of a registered scale
    #[serde(default)]
    pub colorbar: Option<Value>,

    /// Map feature name to drawing style
    #[serde(default)]
    pub details: Option<Value>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Filled contours; line contours when false
    #[serde(default = "default_true")]
    pub contourf: bool,

    /// Line color for line contours
    #[serde(default)]
    pub color: Option<String>,

    /// Line width for line contours
    #[serde(default)]
    pub linewidths: Option<f64>,

    /// Show data over the ocean; false covers it with a white ocean layer
    #[serde(default = "default_true")]
    pub ocean: bool,

    /// `true` for default gridlines, or a style object
    #[serde(default)]
    pub gridlines: Option<Value>,

    /// Polygon set name, or an object keyed by names, to outline on the map
    #[serde(default)]
    pub shapecontours: Option<Value>,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            levels: None,
            colorbar: None,
            details: None,
            title: None,
            dpi: default_dpi(),
            contourf: true,
            color: None,
            linewidths: None,
            ocean: true,
            gridlines: None,
            shapecontours: None,
        }
    }
}

/// Raw request parameters as bound by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestParams {
    pub kind: String,
    pub model: String,
    pub variable: String,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, rename = "initDate")]
    pub init_date: Option<String>,

    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub member: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub aggregation: Option<String>,

    #[serde(default)]
    pub extent: Option<String>,

    #[serde(default)]
    pub mask: Option<String>,

    #[serde(flatten)]
    pub render: RenderOptions,
}

impl RequestParams {
    pub fn new(kind: impl Into<String>, model: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            model: model.into(),
            variable: variable.into(),
            date: None,
            init_date: None,
            end_date: None,
            member: None,
            source: None,
            aggregation: None,
            extent: None,
            mask: None,
            render: RenderOptions::default(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_interval(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.init_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = Some(aggregation.into());
        self
    }

    pub fn with_extent(mut self, extent: impl Into<String>) -> Self {
        self.extent = Some(extent.into());
        self
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_levels(mut self, levels: Value) -> Self {
        self.render.levels = Some(levels);
        self
    }

    pub fn with_colorbar(mut self, colorbar: Value) -> Self {
        self.render.colorbar = Some(colorbar);
        self
    }

    /// Validate and convert into a [`RequestDescriptor`].
    ///
    /// `now` is the reference clock for "observed data cannot be in the
    /// future"; `default_source` is used when the request names no source.
    pub fn into_descriptor(self, now: DateTime<Utc>, default_source: &Path) -> MoonResult<RequestDescriptor> {
        let kind: Kind = self.kind.parse()?;

        if self.model.is_empty() {
            return Err(MoonError::invalid("model", "model is required"));
        }
        if !is_model_allowed(kind, &self.model) {
            return Err(MoonError::invalid(
                "model",
                format!("model '{}' is not valid for kind '{}'", self.model, kind),
            ));
        }

        if self.variable.is_empty() {
            return Err(MoonError::invalid("variable", "variable is required"));
        }
        if self.model == "chimera_as" && self.variable.contains("500hPa_geopotential_height") {
            return Err(MoonError::invalid(
                "variable",
                format!("model '{}' does not provide '{}'", self.model, self.variable),
            ));
        }

        let time = match (self.init_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) => {
                let start = parse_field("initDate", start)?;
                let end = parse_field("endDate", end)?;
                if start > end {
                    return Err(MoonError::invalid(
                        "initDate",
                        format!("initDate {} is after endDate {}", start, end),
                    ));
                }
                TimeSelection::Interval { start, end }
            }
            (None, None) => match self.date.as_deref() {
                Some(date) => TimeSelection::Instant(parse_field("date", date)?),
                None => TimeSelection::Instant(now),
            },
            (Some(_), None) => {
                return Err(MoonError::invalid("endDate", "initDate given without endDate"))
            }
            (None, Some(_)) => {
                return Err(MoonError::invalid("initDate", "endDate given without initDate"))
            }
        };

        if kind == Kind::Observed && time.latest() > now {
            return Err(MoonError::invalid(
                "date",
                format!("observed data is not available for future date {}", time.latest()),
            ));
        }

        let aggregation = match self.aggregation.as_deref() {
            Some(name) if !name.is_empty() => Some(name.parse::<Aggregation>()?),
            _ => None,
        };

        let extent = match self.extent.as_deref() {
            Some(s) if !s.trim().is_empty() => {
                Some(Extent::resolve(s).map_err(|e| MoonError::invalid("extent", e.to_string()))?)
            }
            _ => None,
        };

        let member = self
            .member
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MEMBER.to_string());

        let source = self
            .source
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_source.to_path_buf());

        Ok(RequestDescriptor {
            kind,
            model: self.model,
            variable: self.variable,
            member,
            source,
            time,
            aggregation,
            extent,
            mask: self.mask.filter(|m| !m.is_empty()),
            render: self.render,
        })
    }
}

fn parse_field(field: &str, value: &str) -> MoonResult<DateTime<Utc>> {
    parse_datetime(value).map_err(|e| MoonError::invalid(field, e.to_string()))
}

/// A validated, immutable request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    kind: Kind,
    model: String,
    variable: String,
    member: String,
    source: PathBuf,
    time: TimeSelection,
    aggregation: Option<Aggregation>,
    extent: Option<Extent>,
    mask: Option<String>,
    render: RenderOptions,
}

impl RequestDescriptor {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn time(&self) -> TimeSelection {
        self.time
    }

    pub fn aggregation(&self) -> Option<Aggregation> {
        self.aggregation
    }

    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    pub fn mask(&self) -> Option<&str> {
        self.mask.as_deref()
    }

    pub fn render(&self) -> &RenderOptions {
        &self.render
    }
}
