//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use meshpack_convert::ConvertError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Pattern could not be loaded or lacks name/version
    #[error("Pattern error: {message}")]
    #[diagnostic(code(meshpack::cli::pattern))]
    Pattern {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Manifest rendering failed
    #[error("Render error: {message}")]
    #[diagnostic(code(meshpack::cli::render))]
    Render {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Chart scaffolding, packaging or archive reading failed
    #[error("Chart error: {message}")]
    #[diagnostic(code(meshpack::cli::chart))]
    Chart {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(meshpack::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(meshpack::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pattern { .. } => exit_codes::PATTERN_ERROR,
            CliError::Render { .. } => exit_codes::RENDER_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            help: None,
        }
    }

    /// Create a chart error
    pub fn chart(message: impl Into<String>) -> Self {
        Self::Chart {
            message: message.into(),
            help: None,
        }
    }

    /// Create an IO error that names the file involved
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        let help = err.help().map(|h| h.to_string());
        let message = err.to_string();
        match err {
            ConvertError::LoadPattern { .. } | ConvertError::ChartMetadata { .. } => {
                CliError::Pattern { message, help }
            }
            ConvertError::ManifestConversion { .. } => CliError::Render { message, help },
            ConvertError::ChartCreation { .. } | ConvertError::Packaging { .. } => {
                CliError::Chart { message, help }
            }
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
