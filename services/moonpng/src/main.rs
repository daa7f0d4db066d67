//! moonpng command-line driver.
//!
//! Resolves one map request against a local data root and writes the
//! renderer's output, or lists the named regions.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use moonpng::profiler::timed;
use moonpng::{Pipeline, PipelineConfig, ReferenceData};
use moon_common::RequestParams;
use renderer::SummaryRenderer;

#[derive(Parser, Debug)]
#[command(name = "moonpng")]
#[command(about = "Render meteorological maps from gridded NetCDF archives")]
struct Args {
    /// YAML configuration file (default: environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "MOONPNG_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and render one request
    Render(RenderArgs),
    /// List the named regions usable as `--extent`
    Regions,
}

#[derive(ClapArgs, Debug)]
struct RenderArgs {
    #[arg(long)]
    kind: String,

    #[arg(long)]
    model: String,

    #[arg(long)]
    variable: String,

    /// Single instant (ISO 8601)
    #[arg(long, conflicts_with_all = ["init_date", "end_date"])]
    date: Option<String>,

    #[arg(long, requires = "end_date")]
    init_date: Option<String>,

    #[arg(long, requires = "init_date")]
    end_date: Option<String>,

    #[arg(long)]
    member: Option<String>,

    /// Data root (default: configured source root)
    #[arg(long)]
    source: Option<String>,

    #[arg(long)]
    aggregation: Option<String>,

    /// Region code or "lon_min,lon_max,lat_min,lat_max"
    #[arg(long)]
    extent: Option<String>,

    /// Polygon set name
    #[arg(long)]
    mask: Option<String>,

    /// JSON list or {"min", "max", "step"}
    #[arg(long)]
    levels: Option<String>,

    /// Color scale name, or inline JSON {"<name>": {"scale", "cmap"}}
    #[arg(long)]
    colorbar: Option<String>,

    /// JSON map of feature name to style
    #[arg(long)]
    details: Option<String>,

    /// "true", or a JSON gridline style
    #[arg(long)]
    gridlines: Option<String>,

    /// Polygon set name, or a JSON object keyed by names, to outline
    #[arg(long)]
    shapecontours: Option<String>,

    #[arg(long)]
    title: Option<String>,

    /// Draw contour lines instead of filled contours
    #[arg(long)]
    lines: bool,

    /// Contour line color
    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    linewidths: Option<f64>,

    /// Show data over the ocean (false covers it in white)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    ocean: bool,

    #[arg(long, default_value_t = 100)]
    dpi: u32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn into_params(self) -> Result<RequestParams> {
        let mut params = RequestParams::new(self.kind, self.model, self.variable);
        params.date = self.date;
        params.init_date = self.init_date;
        params.end_date = self.end_date;
        params.member = self.member;
        params.source = self.source;
        params.aggregation = self.aggregation;
        params.extent = self.extent;
        params.mask = self.mask;

        let render = &mut params.render;
        render.levels = self.levels.as_deref().map(parse_json).transpose().context("invalid --levels")?;
        render.details = self.details.as_deref().map(parse_json).transpose().context("invalid --details")?;
        render.colorbar = self.colorbar.map(json_or_name);
        render.shapecontours = self.shapecontours.map(json_or_name);
        render.gridlines = self.gridlines.as_deref().map(parse_json).transpose().context("invalid --gridlines")?;
        render.title = self.title;
        render.contourf = !self.lines;
        render.color = self.color;
        render.linewidths = self.linewidths;
        render.ocean = self.ocean;
        render.dpi = self.dpi;

        Ok(params)
    }
}

fn parse_json(s: &str) -> Result<Value> {
    Ok(serde_json::from_str(s)?)
}

/// A bare name is not JSON; pass it through as a string.
fn json_or_name(s: String) -> Value {
    serde_json::from_str(&s).unwrap_or(Value::String(s))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Regions => list_regions(),
        Command::Render(render) => {
            let config = match &args.config {
                Some(path) => PipelineConfig::from_yaml(path)?,
                None => PipelineConfig::from_env(),
            };
            config.validate().map_err(anyhow::Error::msg)?;
            info!(
                source_root = %config.source_root.display(),
                reference_dir = %config.reference_dir.display(),
                "Loaded configuration"
            );
            render_request(config, render)
        }
    }
}

fn list_regions() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for (code, extent) in moon_common::regions() {
        let [lon_min, lon_max, lat_min, lat_max] = extent.as_array();
        writeln!(stdout, "{:<4} {:>9.3} {:>9.3} {:>9.3} {:>9.3}", code, lon_min, lon_max, lat_min, lat_max)?;
    }
    Ok(())
}

fn render_request(config: PipelineConfig, args: RenderArgs) -> Result<()> {
    netcdf_parser::silence_hdf5_errors();

    let reference = timed("reference", || ReferenceData::load(&config.reference_dir))?;
    let pipeline = Pipeline::new(config, Arc::new(reference), SummaryRenderer);

    let output = args.output.clone();
    let params = args.into_params()?;
    let descriptor = pipeline.descriptor(params, Utc::now())?;
    let rendered = pipeline.run(&descriptor)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                request_id = %rendered.request_id,
                output = %path.display(),
                bytes = rendered.bytes.len(),
                "Wrote output"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendered.bytes)?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
