//! Request resolution, from descriptor to rendered bytes.
//!
//! ```text
//! RequestDescriptor
//!   → resolve template → expand over time → validate paths
//!   → open dataset (scoped) → subset → aggregate → close dataset
//!   → mask (optional)
//!   → levels / colorbar / features / overlays → RenderFrame
//!   → renderer canvas (scoped) → bytes
//! ```
//!
//! Every stage failure aborts the request with a [`MoonError`]; the dataset
//! and canvas guards release their resource on every exit path.

use chrono::{DateTime, Utc};
use grid_processor::{aggregate, mask, subset, ReducedField};
use moon_common::{Extent, MoonError, MoonResult, RequestDescriptor, RequestParams};
use netcdf_parser::GriddedDataset;
use renderer::{
    resolve_colorbar, resolve_features, resolve_gridlines, resolve_levels, shapecontour_names, ColorRamp,
    ContourStyle, FrameSummary, LevelSet, OutlineDirective, RenderFrame, Renderer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::expand::expand;
use crate::paths::resolve;
use crate::profiler::StageTimer;
use crate::reclaim::{ResourceStats, Scoped};
use crate::reference::ReferenceData;
use crate::validate::validate_paths;

/// A reduced (and possibly masked) field with its 2-D coordinates.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub field: ReducedField,
    /// Row-major longitudes, one per cell
    pub lons2d: Vec<f64>,
    /// Row-major latitudes, one per cell
    pub lats2d: Vec<f64>,
    /// Inclusion mask, when a polygon mask was applied
    pub mask: Option<Vec<bool>>,
    /// Map bounds to display: the mask's effective extent, else the
    /// requested extent
    pub extent: Option<Extent>,
    /// Files the field was read from
    pub paths: Vec<PathBuf>,
}

/// Levels and colors of a request, resolved before any data is read.
#[derive(Debug, Clone)]
pub struct RenderInputs {
    pub levels: Option<LevelSet>,
    pub colors: Option<ColorRamp>,
    pub contour: ContourStyle,
}

/// Result of a rendered request.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub request_id: Uuid,
    pub bytes: Vec<u8>,
    pub summary: FrameSummary,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct RequestMetrics {
    attempted: usize,
    found: usize,
    shape: Option<(usize, usize)>,
}

/// Resolves requests against one data root and one set of reference data.
pub struct Pipeline<R: Renderer> {
    config: PipelineConfig,
    reference: Arc<ReferenceData>,
    renderer: R,
    stats: ResourceStats,
}

impl<R: Renderer> Pipeline<R> {
    pub fn new(config: PipelineConfig, reference: Arc<ReferenceData>, renderer: R) -> Self {
        Self {
            config,
            reference,
            renderer,
            stats: ResourceStats::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Acquire/release counters of the datasets and canvases handled so far.
    pub fn stats(&self) -> &ResourceStats {
        &self.stats
    }

    /// Validate raw parameters, defaulting `source` to the configured root.
    pub fn descriptor(&self, params: RequestParams, now: DateTime<Utc>) -> MoonResult<RequestDescriptor> {
        params.into_descriptor(now, &self.config.source_root)
    }

    /// Resolve and render one request.
    pub fn run(&self, descriptor: &RequestDescriptor) -> MoonResult<RenderOutput> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "request",
            request_id = %request_id,
            kind = %descriptor.kind(),
            model = %descriptor.model(),
            variable = %descriptor.variable(),
        );
        let _enter = span.enter();

        let _timer = StageTimer::start("request");
        let mut metrics = RequestMetrics::default();
        let result = self.run_inner(descriptor, &mut metrics);

        match &result {
            Ok((_, summary, _)) => info!(
                attempted = metrics.attempted,
                found = metrics.found,
                shape = ?metrics.shape,
                valid_cells = summary.valid_cells,
                outcome = "ok",
                "Request completed"
            ),
            Err(e) => warn!(
                attempted = metrics.attempted,
                found = metrics.found,
                shape = ?metrics.shape,
                outcome = e.error_code(),
                error = %e,
                "Request failed"
            ),
        }

        result.map(|(bytes, summary, paths)| RenderOutput {
            request_id,
            bytes,
            summary,
            paths,
        })
    }

    fn run_inner(
        &self,
        descriptor: &RequestDescriptor,
        metrics: &mut RequestMetrics,
    ) -> MoonResult<(Vec<u8>, FrameSummary, Vec<PathBuf>)> {
        let inputs = self.render_inputs(descriptor)?;
        let features = resolve_features(descriptor.render().details.as_ref(), descriptor.render().ocean)?;
        let gridlines = resolve_gridlines(descriptor.render().gridlines.as_ref())?;
        let outlines = self.resolve_outlines(descriptor)?;

        let resolved = self.resolve_with_metrics(descriptor, metrics)?;

        let (height, width) = resolved.field.shape();
        let frame = RenderFrame {
            width,
            height,
            lons2d: resolved.lons2d,
            lats2d: resolved.lats2d,
            data: resolved.field.data,
            mask: resolved.mask,
            levels: inputs.levels,
            colors: inputs.colors,
            contour: inputs.contour,
            extent: resolved.extent,
            features,
            gridlines,
            outlines,
            title: descriptor.render().title.clone(),
            dpi: descriptor.render().dpi,
        };

        let bytes = self.draw(&frame)?;
        Ok((bytes, FrameSummary::of(&frame), resolved.paths))
    }

    /// Levels, color ramp and contour style of a request.
    ///
    /// In filled mode a colorbar supplies both colors and levels, replacing
    /// any `levels` parameter; contour lines take a single color instead.
    #[instrument(skip_all)]
    pub fn render_inputs(&self, descriptor: &RequestDescriptor) -> MoonResult<RenderInputs> {
        let _timer = StageTimer::start("levels");
        let render = descriptor.render();

        let mut levels = resolve_levels(render.levels.as_ref())?;

        if !render.contourf {
            return Ok(RenderInputs {
                levels,
                colors: None,
                contour: ContourStyle::Lines {
                    color: render.color.clone(),
                    linewidth: render.linewidths,
                },
            });
        }

        let colors = resolve_colorbar(render.colorbar.as_ref(), Some(self.reference.colorscales()))?;
        if let Some(ramp) = &colors {
            levels = Some(ramp.levels()?);
        }

        Ok(RenderInputs {
            levels,
            colors,
            contour: ContourStyle::Filled,
        })
    }

    /// Outlines of the polygon sets named by `shapecontours`.
    pub fn resolve_outlines(&self, descriptor: &RequestDescriptor) -> MoonResult<Vec<OutlineDirective>> {
        shapecontour_names(descriptor.render().shapecontours.as_ref())?
            .into_iter()
            .map(|name| {
                let set = self.reference.polygon_set(&name).map_err(|_| {
                    MoonError::invalid("shapecontours", format!("unknown polygon set '{}'", name))
                })?;
                let rings = set
                    .polygons()
                    .iter()
                    .flat_map(|p| std::iter::once(p.exterior().to_vec()).chain(p.holes().iter().cloned()))
                    .collect();
                Ok(OutlineDirective::new(name, rings))
            })
            .collect()
    }

    /// Run the data stages of a request: everything up to the renderer.
    pub fn resolve_field(&self, descriptor: &RequestDescriptor) -> MoonResult<ResolvedField> {
        self.resolve_with_metrics(descriptor, &mut RequestMetrics::default())
    }

    fn resolve_with_metrics(
        &self,
        descriptor: &RequestDescriptor,
        metrics: &mut RequestMetrics,
    ) -> MoonResult<ResolvedField> {
        let variable = descriptor.variable();
        let polygons = descriptor
            .mask()
            .map(|name| self.reference.polygon_set(name))
            .transpose()?;

        let validated = {
            let _timer = StageTimer::start("paths");
            let template = resolve(descriptor)?;
            debug!(template = template.pattern(), frequency = %template.frequency(), "Resolved path template");
            let candidates = expand(template, descriptor.time());
            metrics.attempted = candidates.len();
            validate_paths(candidates, variable)?
        };
        metrics.found = validated.len();
        let paths = validated.into_paths();

        let field = self.reduce(descriptor, &paths)?;
        metrics.shape = Some(field.shape());

        let extent = descriptor.extent();
        let Some(polygons) = polygons else {
            let (lons2d, lats2d) = field.meshgrid();
            return Ok(ResolvedField {
                field,
                lons2d,
                lats2d,
                mask: None,
                extent,
                paths,
            });
        };

        let _timer = StageTimer::start("mask");
        let masked = mask(&field, &polygons, extent.as_ref(), self.config.mask_pad_degrees)
            .map_err(|e| e.into_moon_error(variable, &paths))?;
        metrics.shape = Some(masked.field.field.shape());

        Ok(ResolvedField {
            field: masked.field.field,
            lons2d: masked.lons2d,
            lats2d: masked.lats2d,
            mask: Some(masked.field.mask),
            extent: Some(masked.extent),
            paths,
        })
    }

    /// Open, subset and aggregate. The dataset is closed before returning,
    /// whatever the outcome.
    #[instrument(skip_all, fields(files = paths.len()))]
    fn reduce(&self, descriptor: &RequestDescriptor, paths: &[PathBuf]) -> MoonResult<ReducedField> {
        let variable = descriptor.variable();
        let data_error = |e: grid_processor::GridProcessorError| e.into_moon_error(variable, paths);

        let dataset = {
            let _timer = StageTimer::start("load");
            GriddedDataset::open(paths, variable).map_err(|e| MoonError::DataLoad {
                paths: paths.to_vec(),
                variable: variable.to_string(),
                cause: e.to_string(),
            })?
        };

        self.stats.datasets.acquired();
        let mut dataset = Scoped::new("dataset", dataset, |dataset: GriddedDataset| {
            dataset.close();
            self.stats.datasets.released();
        });

        {
            let _timer = StageTimer::start("subset");
            subset(&mut dataset, descriptor.extent().as_ref()).map_err(data_error)?;
        }

        let field = {
            let _timer = StageTimer::start("aggregate");
            aggregate(&dataset, descriptor.aggregation()).map_err(data_error)?
        };

        dataset.release();
        Ok(field)
    }

    #[instrument(skip_all, fields(width = frame.width, height = frame.height))]
    fn draw(&self, frame: &RenderFrame) -> MoonResult<Vec<u8>> {
        let _timer = StageTimer::start("render");

        let canvas = self.renderer.open_canvas(frame)?;
        self.stats.canvases.acquired();
        let mut canvas = Scoped::new("canvas", canvas, |canvas: R::Canvas| {
            self.renderer.close_canvas(canvas);
            self.stats.canvases.released();
        });

        self.renderer.draw(&mut canvas, frame)?;
        let bytes = self.renderer.encode(&mut canvas)?;
        canvas.release();
        Ok(bytes)
    }
}
