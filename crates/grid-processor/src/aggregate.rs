//! Temporal reduction of a gridded dataset to a single field.
//!
//! Streaming operators fold one time step at a time, so only one step plus
//! the per-cell accumulators are in memory. `median` needs every value of a
//! cell and reads the whole windowed cube.
//!
//! NaN handling:
//! - mean, max, min, std, var, median skip NaN; an all-NaN cell stays NaN
//! - sum skips NaN; an all-NaN cell sums to 0
//! - count counts non-NaN values
//! - first/last return the raw first/last step

use moon_common::Aggregation;
use netcdf_parser::GriddedDataset;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{GridProcessorError, Result};
use crate::types::ReducedField;

/// Collapse the time axis with `aggregation`.
///
/// Without an aggregation a single time step is squeezed out; several steps
/// are rejected as ambiguous.
#[instrument(skip_all, fields(variable = %dataset.variable(), aggregation = ?aggregation))]
pub fn aggregate(dataset: &GriddedDataset, aggregation: Option<Aggregation>) -> Result<ReducedField> {
    let steps = dataset.time_len();
    if steps == 0 {
        return Err(GridProcessorError::EmptyTimeAxis);
    }

    let data = match aggregation {
        None if steps == 1 => dataset.read_step(0)?,
        None => return Err(GridProcessorError::AmbiguousTimeAxis { steps }),
        Some(Aggregation::First) => dataset.read_step(0)?,
        Some(Aggregation::Last) => dataset.read_step(steps - 1)?,
        Some(Aggregation::Median) => median(dataset)?,
        Some(op) => streaming(dataset, op)?,
    };

    debug!(
        aggregation = aggregation.map(|a| a.as_str()).unwrap_or("none"),
        steps,
        "Reduced time axis"
    );

    ReducedField::new(dataset.latitudes().to_vec(), dataset.longitudes().to_vec(), data)
}

/// Per-cell running statistics (Welford for mean and variance).
#[derive(Debug, Clone, Copy)]
struct CellStats {
    count: u32,
    mean: f64,
    m2: f64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for CellStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl CellStats {
    #[inline]
    fn push(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        let v = value as f64;
        self.count += 1;
        let delta = v - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (v - self.mean);
        self.sum += v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn finish(&self, op: Aggregation) -> f32 {
        if self.count == 0 {
            return match op {
                Aggregation::Sum | Aggregation::Count => 0.0,
                _ => f32::NAN,
            };
        }
        let value = match op {
            Aggregation::Mean => self.mean,
            Aggregation::Sum => self.sum,
            Aggregation::Max => self.max,
            Aggregation::Min => self.min,
            Aggregation::Count => self.count as f64,
            Aggregation::Var => self.m2 / self.count as f64,
            Aggregation::Std => (self.m2 / self.count as f64).sqrt(),
            Aggregation::Median | Aggregation::First | Aggregation::Last => f64::NAN,
        };
        value as f32
    }
}

fn streaming(dataset: &GriddedDataset, op: Aggregation) -> Result<Vec<f32>> {
    let (_, ny, nx) = dataset.shape();
    let mut stats = vec![CellStats::default(); ny * nx];

    for step in dataset.steps() {
        let step = step?;
        stats
            .par_iter_mut()
            .zip(step.par_iter())
            .for_each(|(cell, v)| cell.push(*v));
    }

    Ok(stats.par_iter().map(|cell| cell.finish(op)).collect())
}

fn median(dataset: &GriddedDataset) -> Result<Vec<f32>> {
    let (nt, ny, nx) = dataset.shape();
    let cells = ny * nx;
    let cube = dataset.read_all()?;
    if cube.len() != nt * cells {
        return Err(GridProcessorError::shape_mismatch(format!(
            "read {} values, expected {}",
            cube.len(),
            nt * cells
        )));
    }

    Ok((0..cells)
        .into_par_iter()
        .map(|cell| {
            let mut values: Vec<f32> = (0..nt)
                .map(|t| cube[t * cells + cell])
                .filter(|v| !v.is_nan())
                .collect();
            median_of(&mut values)
        })
        .collect())
}

/// Median of non-NaN values; the mean of the two middle values for an even
/// count.
fn median_of(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((values[mid - 1] as f64 + values[mid] as f64) / 2.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(values: &[f32]) -> CellStats {
        let mut s = CellStats::default();
        for v in values {
            s.push(*v);
        }
        s
    }

    #[test]
    fn test_two_step_cell() {
        let s = stats(&[2.0, 4.0]);
        assert_eq!(s.finish(Aggregation::Mean), 3.0);
        assert_eq!(s.finish(Aggregation::Max), 4.0);
        assert_eq!(s.finish(Aggregation::Min), 2.0);
        assert_eq!(s.finish(Aggregation::Sum), 6.0);
        assert_eq!(s.finish(Aggregation::Count), 2.0);
        assert_eq!(s.finish(Aggregation::Var), 1.0);
        assert_eq!(s.finish(Aggregation::Std), 1.0);
    }

    #[test]
    fn test_nan_skipped() {
        let s = stats(&[f32::NAN, 1.0, 3.0]);
        assert_eq!(s.finish(Aggregation::Mean), 2.0);
        assert_eq!(s.finish(Aggregation::Count), 2.0);
    }

    #[test]
    fn test_all_nan() {
        let s = stats(&[f32::NAN, f32::NAN]);
        assert!(s.finish(Aggregation::Mean).is_nan());
        assert!(s.finish(Aggregation::Max).is_nan());
        assert_eq!(s.finish(Aggregation::Sum), 0.0);
        assert_eq!(s.finish(Aggregation::Count), 0.0);
    }

    #[test]
    fn test_median_of() {
        assert_eq!(median_of(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median_of(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
        assert!(median_of(&mut []).is_nan());
    }
}
