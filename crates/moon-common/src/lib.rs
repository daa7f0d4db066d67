//! Common types shared across the moonpng crates: the request model, the
//! named-region table, time selection and the error taxonomy.

pub mod aggregation;
pub mod bbox;
pub mod error;
pub mod models;
pub mod request;
pub mod time;

pub use aggregation::Aggregation;
pub use bbox::{region, regions, Extent};
pub use error::{MoonError, MoonResult};
pub use models::{allowed_models, is_model_allowed};
pub use request::{Kind, RenderOptions, RequestDescriptor, RequestParams, DEFAULT_MEMBER};
pub use time::{parse_datetime, Frequency, TimeSelection};
