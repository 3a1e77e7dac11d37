//! The record of files a run has created, and their removal.
//!
//! The crawler appends every index file it writes; cleanup removes them in
//! the same order once serving has stopped. A ledger only ever holds paths
//! that were actually written, so cleanup has nothing to skip and nothing to
//! miss.

use crate::output;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Ordered list of generated file paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    paths: Vec<PathBuf>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file that has just been written.
    pub fn record(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Remove whatever was recorded after a run aborted before serving.
    ///
    /// Failures are logged and skipped; the abort's own error is what the
    /// caller reports.
    pub(crate) fn discard(self) {
        for path in self.paths {
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "could not discard index file");
            }
        }
    }
}

/// Remove every recorded file, in order.
///
/// There is no existence check: a file that vanished or cannot be removed
/// stops cleanup with a [`CleanupError`], leaving later entries in place.
pub fn clean_up(ledger: &Ledger) -> Result<(), CleanupError> {
    output::print_cleanup_start();
    for path in ledger.iter() {
        output::print_removing(path);
        fs::remove_file(path).map_err(|source| CleanupError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "removed index file");
    }
    Ok(())
}
