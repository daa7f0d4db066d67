//! The hand-off between the pipeline and a renderer.
//!
//! A [`RenderFrame`] carries everything needed to draw one map: the 2-D
//! coordinates and data, the optional inclusion mask, levels, color ramp,
//! display extent, map features, gridlines and polygon outlines. A [`Renderer`] turns a frame into bytes
//! through a canvas it opens and must close.

use moon_common::Extent;
use serde::Serialize;
use tracing::debug;

use crate::colorbar::ColorRamp;
use crate::error::{RenderError, Result};
use crate::features::{FeatureDirective, GridlineDirective, OutlineDirective};
use crate::levels::LevelSet;

/// How the field is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum ContourStyle {
    /// Filled contours
    Filled,
    /// Contour lines
    Lines {
        color: Option<String>,
        linewidth: Option<f64>,
    },
}

/// Everything a renderer needs to draw one map.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub width: usize,
    pub height: usize,
    /// Row-major `height x width` longitudes
    pub lons2d: Vec<f64>,
    /// Row-major `height x width` latitudes
    pub lats2d: Vec<f64>,
    /// Row-major values; NaN for missing or masked-out cells
    pub data: Vec<f32>,
    /// Polygon inclusion mask, when a mask was applied
    pub mask: Option<Vec<bool>>,
    pub levels: Option<LevelSet>,
    pub colors: Option<ColorRamp>,
    pub contour: ContourStyle,
    /// Map bounds to display, when known
    pub extent: Option<Extent>,
    pub features: Vec<FeatureDirective>,
    pub gridlines: Option<GridlineDirective>,
    pub outlines: Vec<OutlineDirective>,
    pub title: Option<String>,
    pub dpi: u32,
}

impl RenderFrame {
    /// Check that every grid-shaped vector matches `width x height`.
    pub fn validate(&self) -> Result<()> {
        let n = self.width * self.height;
        let mismatched = self.lons2d.len() != n
            || self.lats2d.len() != n
            || self.data.len() != n
            || self.mask.as_ref().is_some_and(|m| m.len() != n);
        if mismatched {
            return Err(RenderError::Canvas(format!(
                "frame arrays do not match a {}x{} grid",
                self.height, self.width
            )));
        }
        Ok(())
    }

    /// Min and max of the non-NaN values.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }
}

/// Draws frames. Canvases are scarce: every canvas returned by
/// [`Renderer::open_canvas`] must be passed to [`Renderer::close_canvas`]
/// exactly once.
pub trait Renderer {
    type Canvas;

    fn open_canvas(&self, frame: &RenderFrame) -> Result<Self::Canvas>;

    fn draw(&self, canvas: &mut Self::Canvas, frame: &RenderFrame) -> Result<()>;

    /// Encode the drawn canvas.
    fn encode(&self, canvas: &mut Self::Canvas) -> Result<Vec<u8>>;

    fn close_canvas(&self, canvas: Self::Canvas);
}

/// JSON description of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub shape: [usize; 2],
    pub extent: Option<[f64; 4]>,
    pub valid_cells: usize,
    pub masked_cells: Option<usize>,
    pub value_range: Option<[f32; 2]>,
    pub levels: Option<Vec<f64>>,
    pub colorbar: Option<String>,
    pub contour: ContourStyle,
    pub features: Vec<String>,
    pub gridlines: Option<GridlineDirective>,
    pub outlines: Vec<String>,
    pub title: Option<String>,
    pub dpi: u32,
}

impl FrameSummary {
    pub fn of(frame: &RenderFrame) -> Self {
        Self {
            shape: [frame.height, frame.width],
            extent: frame.extent.map(|e| e.as_array()),
            valid_cells: frame.valid_count(),
            masked_cells: frame.mask.as_ref().map(|m| m.iter().filter(|inside| !**inside).count()),
            value_range: frame.value_range().map(|(lo, hi)| [lo, hi]),
            levels: frame.levels.as_ref().map(|l| l.values().to_vec()),
            colorbar: frame.colors.as_ref().map(|c| c.name.clone()),
            contour: frame.contour.clone(),
            features: frame.features.iter().map(|f| f.feature.to_string()).collect(),
            gridlines: frame.gridlines.clone(),
            outlines: frame.outlines.iter().map(|o| o.name.clone()).collect(),
            title: frame.title.clone(),
            dpi: frame.dpi,
        }
    }
}

/// Renders a frame as its JSON summary instead of pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryRenderer;

/// Canvas of the [`SummaryRenderer`].
#[derive(Debug, Default)]
pub struct SummaryCanvas {
    summary: Option<FrameSummary>,
}

impl Renderer for SummaryRenderer {
    type Canvas = SummaryCanvas;

    fn open_canvas(&self, frame: &RenderFrame) -> Result<SummaryCanvas> {
        frame.validate()?;
        debug!(width = frame.width, height = frame.height, "Opened summary canvas");
        Ok(SummaryCanvas::default())
    }

    fn draw(&self, canvas: &mut SummaryCanvas, frame: &RenderFrame) -> Result<()> {
        canvas.summary = Some(FrameSummary::of(frame));
        Ok(())
    }

    fn encode(&self, canvas: &mut SummaryCanvas) -> Result<Vec<u8>> {
        let summary = canvas
            .summary
            .as_ref()
            .ok_or_else(|| RenderError::Canvas("nothing drawn".to_string()))?;
        serde_json::to_vec_pretty(summary).map_err(|e| RenderError::Canvas(e.to_string()))
    }

    fn close_canvas(&self, canvas: SummaryCanvas) {
        debug!(drawn = canvas.summary.is_some(), "Closed summary canvas");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> RenderFrame {
        RenderFrame {
            width: 2,
            height: 2,
            lons2d: vec![0.0, 1.0, 0.0, 1.0],
            lats2d: vec![0.0, 0.0, 1.0, 1.0],
            data: vec![1.0, f32::NAN, 3.0, 4.0],
            mask: Some(vec![true, false, true, true]),
            levels: Some(LevelSet::new(vec![0.0, 2.0, 4.0]).unwrap()),
            colors: None,
            contour: ContourStyle::Filled,
            extent: Some(Extent::new(0.0, 1.0, 0.0, 1.0)),
            features: Vec::new(),
            gridlines: None,
            outlines: Vec::new(),
            title: Some("t".to_string()),
            dpi: 100,
        }
    }

    #[test]
    fn test_summary() {
        let summary = FrameSummary::of(&frame());
        assert_eq!(summary.shape, [2, 2]);
        assert_eq!(summary.valid_cells, 3);
        assert_eq!(summary.masked_cells, Some(1));
        assert_eq!(summary.value_range, Some([1.0, 4.0]));
    }

    #[test]
    fn test_summary_renderer_round() {
        let renderer = SummaryRenderer;
        let f = frame();
        let mut canvas = renderer.open_canvas(&f).unwrap();
        renderer.draw(&mut canvas, &f).unwrap();
        let bytes = renderer.encode(&mut canvas).unwrap();
        renderer.close_canvas(canvas);

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["valid_cells"], 3);
        assert_eq!(json["contour"]["style"], "filled");
    }

    #[test]
    fn test_summary_lists_overlays() {
        let mut f = frame();
        f.gridlines = Some(GridlineDirective::default());
        f.outlines = vec![OutlineDirective::new("basins", vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]])];

        let json = serde_json::to_value(FrameSummary::of(&f)).unwrap();
        assert_eq!(json["outlines"], serde_json::json!(["basins"]));
        assert_eq!(json["gridlines"]["color"], "black");
        assert_eq!(json["gridlines"]["labels"]["top"], false);
    }

    #[test]
    fn test_encode_before_draw_fails() {
        let renderer = SummaryRenderer;
        let mut canvas = renderer.open_canvas(&frame()).unwrap();
        assert!(renderer.encode(&mut canvas).is_err());
    }

    #[test]
    fn test_mismatched_frame_rejected() {
        let mut f = frame();
        f.data.pop();
        assert!(SummaryRenderer.open_canvas(&f).is_err());
    }
}
