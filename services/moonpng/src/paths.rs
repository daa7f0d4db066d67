//! Path templates: where the files of a request live on disk.
//!
//! Each [`Kind`] maps to one [`PathRule`]. Request fields are substituted
//! into the rule's `{placeholders}`; the strftime codes that remain are
//! filled in per sampled instant by [`PathTemplate::render`].

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use moon_common::{Frequency, Kind, MoonError, MoonResult, RequestDescriptor};
use std::path::PathBuf;

/// Directory and filename layout of one kind of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRule {
    pub directory: &'static str,
    pub filename: &'static str,
    pub frequency: Frequency,
}

const OBSERVED_DIR: &str = "{source}/observed/{model}/{variable}/%Y/%j";
const KIND_DIR: &str = "{source}/{kind}/{model}/{variable}/%Y/%j";

/// Layout table, one row per kind.
pub const PATH_RULES: [(Kind, PathRule); 7] = [
    (
        Kind::Observed,
        PathRule {
            directory: OBSERVED_DIR,
            filename: "{model}_{variable}_%Y%m%d00.nc",
            frequency: Frequency::Daily,
        },
    ),
    (
        Kind::Satellite,
        PathRule {
            directory: OBSERVED_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d%H%M.nc",
            frequency: Frequency::FiveMinutes,
        },
    ),
    (
        Kind::Radar,
        PathRule {
            directory: OBSERVED_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d%H%M.nc",
            frequency: Frequency::FiveMinutes,
        },
    ),
    (
        Kind::Forecast,
        PathRule {
            directory: KIND_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d00.nc",
            frequency: Frequency::Daily,
        },
    ),
    (
        Kind::Seasonal,
        PathRule {
            directory: KIND_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d00.nc",
            frequency: Frequency::Daily,
        },
    ),
    (
        Kind::Reanalysis,
        PathRule {
            directory: KIND_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d.nc",
            frequency: Frequency::Daily,
        },
    ),
    (
        Kind::Climatology,
        PathRule {
            directory: KIND_DIR,
            filename: "{model}_{variable}_{member}_%Y%m%d.nc",
            frequency: Frequency::Daily,
        },
    ),
];

/// Layout rule for `kind`.
pub fn rule_for(kind: Kind) -> Option<&'static PathRule> {
    PATH_RULES.iter().find(|(k, _)| *k == kind).map(|(_, rule)| rule)
}

/// A strftime pattern for the files of one request, plus their sampling
/// frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
    frequency: Frequency,
}

impl PathTemplate {
    /// Build a template, rejecting patterns chrono cannot format.
    pub fn new(pattern: impl Into<String>, frequency: Frequency) -> MoonResult<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(MoonError::Internal(format!("malformed path template '{}'", pattern)));
        }
        Ok(Self { pattern, frequency })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Concrete path of the file holding instant `t`.
    pub fn render(&self, t: DateTime<Utc>) -> PathBuf {
        PathBuf::from(t.format(&self.pattern).to_string())
    }
}

/// Build the path template of a request.
pub fn resolve(descriptor: &RequestDescriptor) -> MoonResult<PathTemplate> {
    let kind = descriptor.kind();
    let rule = rule_for(kind)
        .ok_or_else(|| MoonError::Internal(format!("no path layout for kind '{}'", kind)))?;

    let source = descriptor.source().to_string_lossy();
    let source = source.trim_end_matches('/');
    let field = |name: &str| match name {
        "source" => Some(source),
        "kind" => Some(kind.as_str()),
        "model" => Some(descriptor.model()),
        "variable" => Some(descriptor.variable()),
        "member" => Some(descriptor.member()),
        _ => None,
    };

    let pattern = fill(&format!("{}/{}", rule.directory, rule.filename), field)?;
    PathTemplate::new(pattern, rule.frequency)
}

/// Replace each `{name}` of `rule` with its field value in one left-to-right
/// pass. Inserted values are never scanned again, and a literal '%' in them
/// is escaped so strftime leaves it alone.
fn fill<'a>(rule: &str, field: impl Fn(&str) -> Option<&'a str>) -> MoonResult<String> {
    let mut out = String::with_capacity(rule.len());
    let mut rest = rule;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let close = tail
            .find('}')
            .ok_or_else(|| MoonError::Internal(format!("unclosed placeholder in '{}'", rule)))?;
        let name = &tail[..close];
        let value = field(name)
            .ok_or_else(|| MoonError::Internal(format!("unknown placeholder '{{{}}}' in '{}'", name, rule)))?;
        out.push_str(&value.replace('%', "%%"));
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_every_kind_has_one_rule() {
        for kind in Kind::ALL {
            assert_eq!(PATH_RULES.iter().filter(|(k, _)| *k == kind).count(), 1, "{}", kind);
        }
    }

    #[test]
    fn test_render_fills_date_codes() {
        let template = PathTemplate::new("/d/%Y/%j/f_%Y%m%d%H%M.nc", Frequency::FiveMinutes).unwrap();
        let t = Utc.with_ymd_and_hms(2024, 2, 1, 13, 45, 0).unwrap();
        assert_eq!(template.render(t), PathBuf::from("/d/2024/032/f_202402011345.nc"));
    }

    #[test]
    fn test_fill_inserts_values_once() {
        let field = |name: &str| match name {
            "source" => Some("/srv/{model}"),
            "model" => Some("gfs"),
            "variable" => Some("{member}"),
            "member" => Some("M001"),
            _ => None,
        };
        let filled = fill("{source}/{model}/{variable}_{member}", field).unwrap();
        assert_eq!(filled, "/srv/{model}/gfs/{member}_M001");
    }

    #[test]
    fn test_fill_rejects_unknown_placeholder() {
        assert!(fill("{source}/{nope}", |_: &str| None).is_err());
        assert!(fill("/d/{source", |_: &str| Some("x")).is_err());
    }

    #[test]
    fn test_malformed_pattern_rejected() {
        assert!(PathTemplate::new("/d/50%", Frequency::Daily).is_err());
    }
}
