//! Meshpack Core - Core types for turning patterns into Helm charts
//!
//! This crate provides the building blocks used by the converter:
//! - `Pattern`: The parsed application topology document
//! - `ChartMetadata`: The `Chart.yaml` record written into every chart
//! - `sanitize_chart_name`: Pattern name to chart name normalisation
//! - `TarGzPackager`: Chart directory to `.tgz` archive packaging

pub mod archive;
pub mod chart;
pub mod error;
pub mod naming;
pub mod pattern;

pub use archive::{
    ArchiveEntry, ArchivePackager, TarGzPackager, default_archive_name, list_archive_bytes,
    read_chart_metadata_from_archive_bytes, read_file_from_archive_bytes,
};
pub use chart::{CHART_API_VERSION, CHART_FILE, ChartMetadata, ChartType, parse_chart_version};
pub use error::{PackageError, PatternError};
pub use naming::{MAX_CHART_NAME_LEN, is_valid_chart_name, sanitize_chart_name};
pub use pattern::{
    Component, ComponentModel, ComponentType, Pattern, PatternLoader, Service, YamlPatternLoader,
};
