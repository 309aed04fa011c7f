//! Meshpack Convert - pattern to Helm chart converter
//!
//! This crate turns a pattern document into a packaged Helm chart, returned
//! as in-memory `.tgz` bytes. The pipeline is linear:
//!
//! | Step     | Component                | Failure kind                       |
//! |----------|--------------------------|------------------------------------|
//! | load     | [`PatternLoader`]        | [`ConvertError::LoadPattern`]      |
//! | check    | name / version present   | [`ConvertError::ChartMetadata`]    |
//! | render   | [`ManifestRenderer`]     | [`ConvertError::ManifestConversion`] |
//! | scaffold | [`ChartScaffold`]        | [`ConvertError::ChartCreation`]    |
//! | package  | [`ArchivePackager`]      | [`ConvertError::Packaging`]        |
//!
//! Temporary files never outlive a call: the build directory is removed and
//! the packaged archive deleted once its bytes are read back.
//!
//! # Example
//!
//! ```no_run
//! use meshpack_convert::{HelmConverter, WorkArea};
//!
//! let pattern = std::fs::read_to_string("design.yaml").unwrap();
//!
//! // Default work area (~/.meshery)
//! let archive = meshpack_convert::convert(&pattern).unwrap();
//!
//! // Isolated work area
//! let converter = HelmConverter::new().with_work_area(WorkArea::under("/tmp/meshpack"));
//! let chart = converter.convert_with_report(&pattern).unwrap();
//! println!("{} ({} bytes)", chart.report.file_name, chart.report.size);
//! # let _ = archive;
//! ```
//!
//! [`PatternLoader`]: meshpack_core::PatternLoader
//! [`ArchivePackager`]: meshpack_core::ArchivePackager

pub mod config;
pub mod converter;
pub mod error;
pub mod render;
pub mod scaffold;
pub mod warnings;

// Re-exports
pub use config::{WORK_DIR_NAME, WorkArea};
pub use converter::{ConversionReport, ConvertedChart, HelmConverter};
pub use error::{BoxError, BuildStep, ConvertError, Result};
pub use render::{KubernetesRenderer, ManifestRenderer, RenderError, render_pattern};
pub use scaffold::{
    BuildDir, ChartScaffold, MANIFEST_FILE, PackagedChart, TEMPLATES_DIR, build_chart,
};
pub use warnings::{CleanupWarning, RecordingWarnings, TracingWarnings, WarningSink};

/// Convert a pattern with the default converter
pub fn convert(input: &str) -> Result<Vec<u8>> {
    HelmConverter::new().convert(input)
}
