//! Chart.yaml metadata
//!
//! Every generated chart carries a minimal `Chart.yaml`. The same type is used
//! by the packager to read the metadata back and validate it.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PackageError;

/// Schema tag written into generated charts
pub const CHART_API_VERSION: &str = "v3";

/// File name of the chart metadata
pub const CHART_FILE: &str = "Chart.yaml";

/// Chart type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Application,
    Library,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Library => "library",
        }
    }
}

/// Chart.yaml structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart schema version
    pub api_version: String,

    /// Chart name
    pub name: String,

    /// Chart version
    pub version: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Chart type
    #[serde(default, rename = "type")]
    pub chart_type: ChartType,
}

impl ChartMetadata {
    /// Metadata for a chart generated from a pattern
    pub fn for_pattern(name: &str, version: &str) -> Self {
        Self {
            api_version: CHART_API_VERSION.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            description: format!("Helm chart for '{}' generated by Meshery", name),
            chart_type: ChartType::Application,
        }
    }

    /// Parse Chart.yaml content
    pub fn parse(content: &str) -> Result<Self, PackageError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load Chart.yaml from a chart directory
    pub fn load(chart_dir: &Path) -> Result<Self, PackageError> {
        let path = chart_dir.join(CHART_FILE);
        if !path.is_file() {
            return Err(PackageError::ChartNotFound {
                path: chart_dir.to_path_buf(),
            });
        }
        Self::parse(&std::fs::read_to_string(&path)?)
    }

    /// Serialize to Chart.yaml content
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Check the metadata the way Helm does before packaging
    pub fn validate(&self) -> Result<(), PackageError> {
        if self.api_version.is_empty() {
            return Err(PackageError::invalid("chart.metadata.apiVersion is required"));
        }
        if self.name.is_empty() {
            return Err(PackageError::invalid("chart.metadata.name is required"));
        }
        let base = Path::new(&self.name).file_name().and_then(|n| n.to_str());
        if base != Some(self.name.as_str()) {
            return Err(PackageError::invalid(format!(
                "chart.metadata.name {:?} is invalid",
                self.name
            )));
        }
        if self.version.is_empty() {
            return Err(PackageError::invalid("chart.metadata.version is required"));
        }
        if parse_chart_version(&self.version).is_none() {
            return Err(PackageError::invalid(format!(
                "chart.metadata.version {:?} is invalid",
                self.version
            )));
        }
        Ok(())
    }
}

/// Parse a chart version leniently
///
/// Accepts a leading `v` and a missing minor or patch component, as Helm does:
/// `v1.2` is read as `1.2.0`.
pub fn parse_chart_version(version: &str) -> Option<Version> {
    let trimmed = version.strip_prefix('v').unwrap_or(version);
    if let Ok(parsed) = Version::parse(trimmed) {
        return Some(parsed);
    }

    // Pad the numeric core, keeping any pre-release/build suffix
    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty()
        || parts.len() > 2
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    Version::parse(&padded).ok()
}
