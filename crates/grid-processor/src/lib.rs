//! Spatial and temporal reduction of gridded fields.
//!
//! This crate turns an open [`netcdf_parser::GriddedDataset`] into the 2-D
//! field handed to rendering:
//!
//! ```text
//! GriddedDataset (time, lat, lon)
//!      │
//!      ├─► subset(extent)          coordinate-range window, no data read
//!      │
//!      ├─► aggregate(op)           time axis collapsed → ReducedField
//!      │
//!      └─► mask(polygons, pad)     optional → MaskedField + 2-D coords
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{aggregate, subset};
//!
//! let mut dataset = GriddedDataset::open(&paths, "precipitation")?;
//! subset(&mut dataset, Some(&extent))?;
//! let field = aggregate(&dataset, Some(Aggregation::Sum))?;
//! ```

pub mod aggregate;
pub mod error;
pub mod geojson;
pub mod mask;
pub mod subset;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::aggregate;
pub use error::{GridProcessorError, Result};
pub use geojson::{Polygon, PolygonSet};
pub use mask::{mask, MaskOutput};
pub use subset::{select_range, subset};
pub use types::{MaskedField, ReducedField};
