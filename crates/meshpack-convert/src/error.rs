//! Error types for the converter
//!
//! Every failure of a conversion maps to exactly one [`ConvertError`] kind.
//! Chart creation errors additionally carry the [`BuildStep`] that failed.

use meshpack_core::{PackageError, PatternError};
use miette::Diagnostic;
use thiserror::Error;

use crate::render::RenderError;

/// Boxed cause for chart creation failures (IO or serialization)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Filesystem and serialization steps of building a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    HomeDirectory,
    PackageDirectory,
    TempDirectory,
    ChartSourceDirectory,
    TemplatesDirectory,
    MarshalMetadata,
    WriteChartYaml,
    WriteManifest,
    ReadPackagedChart,
}

impl BuildStep {
    /// Human-readable label of the step
    pub fn label(&self) -> &'static str {
        match self {
            Self::HomeDirectory => "getting user home directory",
            Self::PackageDirectory => "creating package directory",
            Self::TempDirectory => "creating temp directory",
            Self::ChartSourceDirectory => "creating chart source directory",
            Self::TemplatesDirectory => "creating templates directory",
            Self::MarshalMetadata => "marshaling Chart.yaml metadata",
            Self::WriteChartYaml => "writing Chart.yaml",
            Self::WriteManifest => "writing manifest.yaml",
            Self::ReadPackagedChart => "reading packaged chart",
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Converter error
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("Failed to load pattern ({input}): {source}")]
    #[diagnostic(
        code(meshpack::convert::load_pattern),
        help("The pattern must be a non-empty YAML or JSON document")
    )]
    LoadPattern {
        input: String,
        source: PatternError,
    },

    #[error("Invalid chart metadata: {reason}")]
    #[diagnostic(
        code(meshpack::convert::chart_metadata),
        help("Set both `name` and `version` at the top level of the pattern")
    )]
    ChartMetadata { reason: String },

    #[error("Failed to convert pattern to Kubernetes manifests: {source}")]
    #[diagnostic(code(meshpack::convert::manifest))]
    ManifestConversion { source: RenderError },

    #[error("Failed to create Helm chart while {step}: {source}")]
    #[diagnostic(code(meshpack::convert::chart_creation))]
    ChartCreation { step: BuildStep, source: BoxError },

    #[error("Failed to package Helm chart: {source}")]
    #[diagnostic(
        code(meshpack::convert::packaging),
        help("Chart versions must be SemVer, e.g. 1.0.0")
    )]
    Packaging { source: PackageError },
}

impl ConvertError {
    /// Create a chart creation error for a step
    pub fn chart_creation(step: BuildStep, source: impl Into<BoxError>) -> Self {
        Self::ChartCreation {
            step,
            source: source.into(),
        }
    }

    /// Create a metadata error
    pub fn chart_metadata(reason: impl Into<String>) -> Self {
        Self::ChartMetadata {
            reason: reason.into(),
        }
    }

    /// The label identifying where the conversion failed
    ///
    /// For load errors this is the input identifier, for chart creation
    /// errors the label of the failing step.
    pub fn context(&self) -> &str {
        match self {
            Self::LoadPattern { input, .. } => input,
            Self::ChartMetadata { .. } => "chart metadata",
            Self::ManifestConversion { .. } => "manifest conversion",
            Self::ChartCreation { step, .. } => step.label(),
            Self::Packaging { .. } => "packaging",
        }
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Identifier used for a pattern input in load errors
///
/// Empty input is reported as `input`; anything else by its first line.
pub(crate) fn input_identifier(input: &str) -> String {
    const MAX_CHARS: usize = 60;

    let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(first) = lines.next() else {
        return "input".to_string();
    };

    let mut identifier: String = first.chars().take(MAX_CHARS).collect();
    if first.chars().count() > MAX_CHARS || lines.next().is_some() {
        identifier.push_str("...");
    }
    identifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_labels() {
        assert_eq!(BuildStep::HomeDirectory.to_string(), "getting user home directory");
        assert_eq!(
            BuildStep::MarshalMetadata.to_string(),
            "marshaling Chart.yaml metadata"
        );
        assert_eq!(BuildStep::ReadPackagedChart.label(), "reading packaged chart");
    }

    #[test]
    fn test_context() {
        let err = ConvertError::chart_metadata("missing name");
        assert_eq!(err.context(), "chart metadata");
        assert!(err.to_string().contains("missing name"));

        let err = ConvertError::chart_creation(
            BuildStep::WriteManifest,
            std::io::Error::other("disk full"),
        );
        assert_eq!(err.context(), "writing manifest.yaml");
        assert_eq!(
            err.to_string(),
            "Failed to create Helm chart while writing manifest.yaml: disk full"
        );
    }

    #[test]
    fn test_input_identifier() {
        assert_eq!(input_identifier(""), "input");
        assert_eq!(input_identifier(" \n\t\n"), "input");
        assert_eq!(input_identifier("name: app"), "name: app");
        assert_eq!(input_identifier("\nname: app\nversion: 1"), "name: app...");

        let long = "x".repeat(80);
        assert_eq!(input_identifier(&long), format!("{}...", "x".repeat(60)));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = ConvertError::chart_creation(
            BuildStep::WriteChartYaml,
            std::io::Error::other("read-only"),
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("read-only"));
    }
}
