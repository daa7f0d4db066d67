//! Meteorological map request resolution.
//!
//! A request names a kind of data, a model, a variable and a date or date
//! range. [`Pipeline`] turns it into the files holding that data, reduces
//! them to one 2-D field, optionally clips it to a polygon set and hands it,
//! with its levels and colors, to a [`renderer::Renderer`].

pub mod config;
pub mod expand;
pub mod paths;
pub mod pipeline;
pub mod profiler;
pub mod reclaim;
pub mod reference;
pub mod validate;

pub use config::PipelineConfig;
pub use expand::{expand, PathSequence};
pub use paths::{resolve, rule_for, PathRule, PathTemplate, PATH_RULES};
pub use pipeline::{Pipeline, RenderInputs, RenderOutput, ResolvedField};
pub use profiler::StageTimer;
pub use reclaim::{ResourceCounter, ResourceStats, Scoped};
pub use reference::ReferenceData;
pub use validate::{validate_paths, ValidatedPaths};
