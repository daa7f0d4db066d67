//! Level, color and frame resolution for map rendering.
//!
//! - [`levels`]: contour levels from literal lists or `{min, max, step}`
//! - [`colorbar`]: boundary-normalized color ramps, inline or named
//! - [`features`]: closed table of map feature directives
//! - [`frame`]: the [`RenderFrame`] hand-off and the [`Renderer`] trait

pub mod colorbar;
pub mod error;
pub mod features;
pub mod frame;
pub mod levels;

pub use colorbar::{resolve_colorbar, BoundaryNorm, ColorIndex, ColorRamp, ColorScaleRecord, ColorScaleRegistry, Rgba};
pub use error::{RenderError, Result};
pub use features::{
    default_features, resolve_features, resolve_gridlines, shapecontour_names, FeatureDirective, GridLabels,
    GridlineDirective, MapFeature, OutlineDirective, Scale,
};
pub use frame::{ContourStyle, FrameSummary, RenderFrame, Renderer, SummaryCanvas, SummaryRenderer};
pub use levels::{resolve_levels, LevelSet, MAX_LEVELS};
