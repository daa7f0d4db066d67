//! Temporal reduction operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MoonError;

/// Operator used to collapse the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Sum,
    Max,
    Min,
    Median,
    /// Population standard deviation
    Std,
    /// Population variance
    Var,
    /// Number of valid (non-NaN) steps
    Count,
    /// Value at the first time step
    First,
    /// Value at the last time step
    Last,
}

impl Aggregation {
    pub const ALL: [Aggregation; 10] = [
        Aggregation::Mean,
        Aggregation::Sum,
        Aggregation::Max,
        Aggregation::Min,
        Aggregation::Median,
        Aggregation::Std,
        Aggregation::Var,
        Aggregation::Count,
        Aggregation::First,
        Aggregation::Last,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
            Aggregation::Max => "max",
            Aggregation::Min => "min",
            Aggregation::Median => "median",
            Aggregation::Std => "std",
            Aggregation::Var => "var",
            Aggregation::Count => "count",
            Aggregation::First => "first",
            Aggregation::Last => "last",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = MoonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| MoonError::UnsupportedAggregation {
                requested: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_operators() {
        for agg in Aggregation::ALL {
            assert_eq!(agg.as_str().parse::<Aggregation>().unwrap(), agg);
        }
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        match "bogus".parse::<Aggregation>() {
            Err(MoonError::UnsupportedAggregation { requested }) => assert_eq!(requested, "bogus"),
            other => panic!("expected UnsupportedAggregation, got {:?}", other),
        }
    }
}
