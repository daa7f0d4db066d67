//! CF-convention decoding: packed values, missing values and time units.

use chrono::{DateTime, Duration, Utc};
use moon_common::parse_datetime;

use crate::native::{get_f64_attr, get_str_attr};

/// Packing and missing-value attributes of a data variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDecoding {
    pub fill_value: Option<f32>,
    pub missing_value: Option<f32>,
    pub scale_factor: f32,
    pub add_offset: f32,
}

impl Default for ValueDecoding {
    fn default() -> Self {
        Self {
            fill_value: None,
            missing_value: None,
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl ValueDecoding {
    pub fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            fill_value: get_f64_attr(var, "_FillValue").map(|v| v as f32),
            missing_value: get_f64_attr(var, "missing_value").map(|v| v as f32),
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0) as f32,
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0) as f32,
        }
    }

    /// Raw stored value to physical value; missing values become NaN.
    #[inline]
    pub fn decode(&self, raw: f32) -> f32 {
        if self.fill_value == Some(raw) || self.missing_value == Some(raw) {
            return f32::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }

    pub fn decode_in_place(&self, values: &mut [f32]) {
        if *self == Self::default() {
            return;
        }
        for v in values.iter_mut() {
            *v = self.decode(*v);
        }
    }
}

/// Parsed `"<unit> since <timestamp>"` time units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    seconds_per_unit: f64,
    epoch: DateTime<Utc>,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Option<Self> {
        let (unit, since) = units.trim().split_once(" since ")?;

        let seconds_per_unit = match unit.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
            "days" | "day" | "d" => 86400.0,
            _ => return None,
        };

        let since = since.trim();
        let since = since.strip_suffix(" UTC").unwrap_or(since);
        let epoch = parse_datetime(since).ok()?;

        Some(Self {
            seconds_per_unit,
            epoch,
        })
    }

    pub fn from_variable(var: &netcdf::Variable) -> Option<Self> {
        get_str_attr(var, "units").and_then(|u| Self::parse(&u))
    }

    pub fn to_datetime(&self, value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.seconds_per_unit * 1000.0).round() as i64;
        self.epoch.checked_add_signed(Duration::milliseconds(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decoding_masks_fill_and_scales() {
        let decoding = ValueDecoding {
            fill_value: Some(-9999.0),
            missing_value: None,
            scale_factor: 0.5,
            add_offset: 10.0,
        };
        assert!(decoding.decode(-9999.0).is_nan());
        assert_eq!(decoding.decode(4.0), 12.0);
    }

    #[test]
    fn test_time_units() {
        let units = TimeUnits::parse("days since 2024-01-01 00:00:00").unwrap();
        assert_eq!(
            units.to_datetime(2.0),
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap())
        );

        let units = TimeUnits::parse("minutes since 2024-01-01T00:00:00Z").unwrap();
        assert_eq!(
            units.to_datetime(5.0),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap())
        );
    }

    #[test]
    fn test_unknown_time_units() {
        assert!(TimeUnits::parse("fortnights since 2024-01-01").is_none());
        assert!(TimeUnits::parse("kelvin").is_none());
    }
}
