//! Existence filtering of candidate file paths.

use moon_common::{MoonError, MoonResult};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Candidate paths that exist on disk, in their original order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaths {
    paths: Vec<PathBuf>,
    attempted: usize,
}

impl ValidatedPaths {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of candidates examined.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl IntoIterator for ValidatedPaths {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

/// Keep the paths that name existing files.
///
/// Partial availability is fine; fails with [`MoonError::NoValidPaths`]
/// carrying every attempted path when none exist.
#[instrument(skip_all, fields(variable = %variable))]
pub fn validate_paths<I>(candidates: I, variable: &str) -> MoonResult<ValidatedPaths>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut paths = Vec::new();
    let mut missing = Vec::new();
    let mut attempted = 0;

    for path in candidates {
        attempted += 1;
        if is_file(&path) {
            paths.push(path);
        } else {
            missing.push(path);
        }
    }

    debug!(
        variable = %variable,
        attempted,
        found = paths.len(),
        "Validated candidate paths"
    );

    if paths.is_empty() {
        return Err(MoonError::NoValidPaths {
            variable: variable.to_string(),
            attempted: missing,
        });
    }

    Ok(ValidatedPaths { paths, attempted })
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
