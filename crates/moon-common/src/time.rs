//! Time handling: request instants, intervals and sampling frequencies.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling frequency of a data source's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// One file every 5 minutes (satellite and radar scans)
    FiveMinutes,
    /// One file per day
    Daily,
}

impl Frequency {
    /// Spacing between consecutive files.
    pub fn step(&self) -> Duration {
        match self {
            Frequency::FiveMinutes => Duration::minutes(5),
            Frequency::Daily => Duration::days(1),
        }
    }

    /// Short alias ("5min", "1D").
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::FiveMinutes => "5min",
            Frequency::Daily => "1D",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which instants a request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSelection {
    /// A single instant
    Instant(DateTime<Utc>),
    /// Closed interval `[start, end]`
    Interval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimeSelection {
    /// Latest instant covered by the selection.
    pub fn latest(&self) -> DateTime<Utc> {
        match self {
            TimeSelection::Instant(t) => *t,
            TimeSelection::Interval { end, .. } => *end,
        }
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, TimeSelection::Interval { .. })
    }
}

/// Parse an ISO 8601 timestamp. Values without a zone are taken as UTC and
/// date-only values as midnight.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601_with_zone() {
        let dt = parse_datetime("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        let naive = parse_datetime("2024-01-15T06:30:00").unwrap();
        assert_eq!(naive.hour(), 6);
        assert_eq!(naive.minute(), 30);

        let date = parse_datetime("2024-01-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_frequency_steps() {
        assert_eq!(Frequency::Daily.step(), Duration::days(1));
        assert_eq!(Frequency::FiveMinutes.step(), Duration::minutes(5));
        assert_eq!(Frequency::FiveMinutes.to_string(), "5min");
    }
}
