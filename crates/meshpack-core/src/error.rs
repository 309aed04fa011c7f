//! Core error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a pattern document
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Pattern document is empty")]
    Empty,

    #[error("Failed to parse pattern: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Pattern must be a YAML mapping, found {found}")]
    NotAMapping { found: String },
}

/// Errors raised while packaging a chart directory or reading an archive
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Chart.yaml not found in {path}")]
    ChartNotFound { path: PathBuf },

    #[error("Invalid chart: {message}")]
    InvalidChart { message: String },

    #[error("Failed to parse Chart.yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackageError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidChart {
            message: message.into(),
        }
    }
}
