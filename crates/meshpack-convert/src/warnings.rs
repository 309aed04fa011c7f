//! Non-fatal cleanup warnings
//!
//! Removing build directories and packaged archives is best-effort. Failures
//! are reported through a [`WarningSink`] and never change the result of a
//! conversion.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A cleanup step that failed
#[derive(Debug)]
pub enum CleanupWarning {
    /// The per-conversion build directory could not be removed
    BuildDirectory {
        path: PathBuf,
        error: std::io::Error,
    },

    /// The packaged archive could not be deleted after read-back
    PackagedChart {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl CleanupWarning {
    pub fn path(&self) -> &Path {
        match self {
            Self::BuildDirectory { path, .. } | Self::PackagedChart { path, .. } => path,
        }
    }
}

impl std::fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuildDirectory { path, error } => write!(
                f,
                "Failed to clean up build directory {}: {}",
                path.display(),
                error
            ),
            Self::PackagedChart { path, error } => write!(
                f,
                "Failed to clean up packaged chart {}: {}",
                path.display(),
                error
            ),
        }
    }
}

/// Receives cleanup warnings
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: CleanupWarning);
}

/// Logs warnings through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, warning: CleanupWarning) {
        tracing::warn!(path = %warning.path().display(), "{}", warning);
    }
}

/// Keeps warnings in memory
#[derive(Debug, Default)]
pub struct RecordingWarnings {
    warnings: Mutex<Vec<CleanupWarning>>,
}

impl RecordingWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all recorded warnings
    pub fn take(&self) -> Vec<CleanupWarning> {
        std::mem::take(&mut *self.warnings.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WarningSink for RecordingWarnings {
    fn warn(&self, warning: CleanupWarning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}
