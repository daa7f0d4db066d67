//! Contour level resolution.
//!
//! A level specification is either a literal list of boundaries or a
//! `{min, max, step}` range expanded arange-style up to and including `max`.
//! Anything else means "no levels" and leaves the choice to the renderer.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RenderError, Result};

/// Upper bound on the number of levels a `{min, max, step}` range may expand to.
pub const MAX_LEVELS: usize = 10_000;

/// Strictly increasing contour boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSet(Vec<f64>);

impl LevelSet {
    pub fn new(levels: Vec<f64>) -> Result<Self> {
        if levels.iter().any(|l| !l.is_finite()) {
            return Err(RenderError::invalid_levels(format!("{:?}", levels), "levels must be finite"));
        }
        if levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RenderError::invalid_levels(
                format!("{:?}", levels),
                "levels must be strictly increasing",
            ));
        }
        Ok(Self(levels))
    }

    /// `min, min + step, ...` with `ceil((max + step - min) / step)` values.
    pub fn from_range(min: f64, max: f64, step: f64) -> Result<Self> {
        let given = || format!("{{min: {}, max: {}, step: {}}}", min, max, step);
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(RenderError::invalid_levels(given(), "min, max and step must be finite"));
        }
        if step <= 0.0 {
            return Err(RenderError::invalid_levels(given(), "step must be positive"));
        }

        let count = ((max + step - min) / step).ceil();
        if count > MAX_LEVELS as f64 {
            return Err(RenderError::invalid_levels(given(), "too many levels"));
        }
        let count = if count > 0.0 { count as usize } else { 0 };
        Self::new((0..count).map(|i| min + i as f64 * step).collect())
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// Resolve a raw level specification.
pub fn resolve_levels(spec: Option<&Value>) -> Result<Option<LevelSet>> {
    match spec {
        Some(Value::Array(items)) => {
            let levels = items
                .iter()
                .map(|v| {
                    v.as_f64()
                        .ok_or_else(|| RenderError::invalid_levels(v, "levels must be numbers"))
                })
                .collect::<Result<Vec<f64>>>()?;
            LevelSet::new(levels).map(Some)
        }
        Some(spec @ Value::Object(map)) => {
            let field = |name: &str| {
                map.get(name)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| RenderError::invalid_levels(spec, format!("missing numeric '{}'", name)))
            };
            LevelSet::from_range(field("min")?, field("max")?, field("step")?).map(Some)
        }
        _ => Ok(None),
    }
}
