//! Temporal expansion of a path template into concrete file paths.

use chrono::{DateTime, Duration, Utc};
use moon_common::TimeSelection;
use std::iter::FusedIterator;
use std::path::PathBuf;

use crate::paths::PathTemplate;

/// Lazy, chronological sequence of the file paths of a request.
///
/// Ticks are `start + k * step` for every `k` with the tick `<= end`; a
/// single instant yields exactly one path. Paths are rendered one at a time,
/// so multi-year ranges cost nothing until consumed.
#[derive(Debug, Clone)]
pub struct PathSequence {
    template: PathTemplate,
    next: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    step: Duration,
}

impl PathSequence {
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    fn remaining(&self) -> usize {
        match self.next {
            Some(next) if next <= self.end => {
                let span = (self.end - next).num_milliseconds();
                (span / self.step.num_milliseconds()) as usize + 1
            }
            _ => 0,
        }
    }
}

impl Iterator for PathSequence {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let current = self.next.filter(|t| *t <= self.end)?;
        self.next = current.checked_add_signed(self.step);
        Some(self.template.render(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for PathSequence {}

impl FusedIterator for PathSequence {}

/// Expand `template` over the instants of `time`.
pub fn expand(template: PathTemplate, time: TimeSelection) -> PathSequence {
    let (start, end) = match time {
        TimeSelection::Instant(t) => (t, t),
        TimeSelection::Interval { start, end } => (start, end),
    };
    let step = template.frequency().step();

    PathSequence {
        template,
        next: Some(start),
        end,
        step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use moon_common::Frequency;

    fn template(frequency: Frequency) -> PathTemplate {
        PathTemplate::new("/d/%Y%m%d%H%M.nc", frequency).unwrap()
    }

    #[test]
    fn test_size_hint_tracks_consumption() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let mut seq = expand(template(Frequency::FiveMinutes), TimeSelection::Interval { start, end });

        assert_eq!(seq.len(), 13);
        seq.next();
        assert_eq!(seq.len(), 12);
        assert_eq!(seq.by_ref().count(), 12);
        assert_eq!(seq.next(), None);
    }

    #[test]
    fn test_unaligned_end_is_not_overshot() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let paths: Vec<_> = expand(template(Frequency::Daily), TimeSelection::Interval { start, end }).collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/d/202401010000.nc"),
                PathBuf::from("/d/202401020000.nc"),
                PathBuf::from("/d/202401030000.nc"),
            ]
        );
    }
}
