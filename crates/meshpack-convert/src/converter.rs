//! Main converter logic
//!
//! Orchestrates the conversion of a pattern into a packaged Helm chart:
//!
//! 1. Load the pattern and check it has a name and a version
//! 2. Render the pattern input into Kubernetes manifests
//! 3. Derive the chart name from the pattern name
//! 4. Scaffold, package and read back the chart
//!
//! Each collaborator sits behind a trait so it can be replaced, and the work
//! area can be redirected away from the user's home directory.

use meshpack_core::{
    ArchivePackager, PatternError, PatternLoader, TarGzPackager, YamlPatternLoader,
    sanitize_chart_name,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::config::WorkArea;
use crate::error::{ConvertError, Result, input_identifier};
use crate::render::{KubernetesRenderer, ManifestRenderer};
use crate::scaffold::build_chart;
use crate::warnings::{TracingWarnings, WarningSink};

/// Summary of a successful conversion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    /// Name recorded in Chart.yaml
    pub chart_name: String,
    /// Version recorded in Chart.yaml
    pub chart_version: String,
    /// Whether the raw pattern name was used because sanitizing emptied it
    pub name_fallback: bool,
    /// Archive file name chosen by the packager
    pub file_name: String,
    /// Archive size in bytes
    pub size: usize,
    /// Hex-encoded SHA256 of the archive
    pub digest: String,
}

/// A packaged chart and its report
#[derive(Debug, Clone)]
pub struct ConvertedChart {
    pub archive: Vec<u8>,
    pub report: ConversionReport,
}

/// Converts patterns into packaged Helm charts
pub struct HelmConverter {
    loader: Box<dyn PatternLoader>,
    renderer: Box<dyn ManifestRenderer>,
    packager: Box<dyn ArchivePackager>,
    warnings: Arc<dyn WarningSink>,
    work_area: Option<WorkArea>,
}

impl Default for HelmConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HelmConverter {
    /// Converter with the default collaborators, working under `~/.meshery`
    pub fn new() -> Self {
        Self {
            loader: Box::new(YamlPatternLoader),
            renderer: Box::new(KubernetesRenderer),
            packager: Box::new(TarGzPackager),
            warnings: Arc::new(TracingWarnings),
            work_area: None,
        }
    }

    pub fn with_loader(mut self, loader: impl PatternLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_renderer(mut self, renderer: impl ManifestRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_packager(mut self, packager: impl ArchivePackager + 'static) -> Self {
        self.packager = Box::new(packager);
        self
    }

    /// Route cleanup warnings to `warnings` instead of the log
    pub fn with_warnings(mut self, warnings: Arc<dyn WarningSink>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Build and package charts under `work_area` instead of `~/.meshery`
    pub fn with_work_area(mut self, work_area: WorkArea) -> Self {
        self.work_area = Some(work_area);
        self
    }

    /// Convert pattern input into chart archive bytes
    pub fn convert(&self, input: &str) -> Result<Vec<u8>> {
        self.convert_with_report(input).map(|chart| chart.archive)
    }

    /// Convert pattern input, also returning a summary of the chart
    pub fn convert_with_report(&self, input: &str) -> Result<ConvertedChart> {
        if input.is_empty() {
            return Err(ConvertError::LoadPattern {
                input: "input".to_string(),
                source: PatternError::Empty,
            });
        }

        let pattern = self
            .loader
            .load(input)
            .map_err(|source| ConvertError::LoadPattern {
                input: input_identifier(input),
                source,
            })?;

        if pattern.name.is_empty() {
            return Err(ConvertError::chart_metadata("missing name"));
        }
        if pattern.version.is_empty() {
            return Err(ConvertError::chart_metadata("missing version"));
        }
        tracing::debug!(name = %pattern.name, version = %pattern.version, "loaded pattern");

        let manifest = self
            .renderer
            .render(input)
            .map_err(|source| ConvertError::ManifestConversion { source })?;
        tracing::debug!(bytes = manifest.len(), "rendered manifest");

        let (chart_name, name_fallback) = chart_name_for(&pattern.name);
        let chart_version = pattern.version;

        let work_area = match &self.work_area {
            Some(area) => area.clone(),
            None => WorkArea::from_home()?,
        };

        let packaged = build_chart(
            &manifest,
            &chart_name,
            &chart_version,
            &work_area,
            self.packager.as_ref(),
            self.warnings.as_ref(),
        )?;

        let report = ConversionReport {
            digest: hex::encode(Sha256::digest(&packaged.data)),
            size: packaged.data.len(),
            file_name: packaged.file_name,
            chart_name,
            chart_version,
            name_fallback,
        };
        tracing::info!(
            chart = %report.chart_name,
            version = %report.chart_version,
            size = report.size,
            "packaged chart"
        );

        Ok(ConvertedChart {
            archive: packaged.data,
            report,
        })
    }
}

/// Chart name for a pattern name, and whether the raw name had to be used
///
/// A name that sanitizes to nothing is kept as written rather than failing
/// the conversion; the packager may still reject it.
fn chart_name_for(pattern_name: &str) -> (String, bool) {
    let sanitized = sanitize_chart_name(pattern_name);
    if sanitized.is_empty() {
        tracing::warn!(
            name = %pattern_name,
            "pattern name has no valid chart name characters, using it unchanged"
        );
        return (pattern_name.to_string(), true);
    }
    (sanitized, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpack_core::{Pattern, read_chart_metadata_from_archive_bytes};
    use tempfile::TempDir;

    const PATTERN: &str = "name: My App!\nversion: 1.2.3\ncomponents:\n  - displayName: cfg\n    component:\n      kind: ConfigMap\n      version: v1\n";

    struct FixedLoader(Pattern);

    impl PatternLoader for FixedLoader {
        fn load(&self, _input: &str) -> std::result::Result<Pattern, PatternError> {
            Ok(self.0.clone())
        }
    }

    fn converter(temp: &TempDir) -> HelmConverter {
        HelmConverter::new().with_work_area(WorkArea::under(temp.path()))
    }

    #[test]
    fn test_chart_name_for() {
        assert_eq!(chart_name_for("My App!"), ("my-app".to_string(), false));
        assert_eq!(chart_name_for("!!!"), ("!!!".to_string(), true));
    }

    #[test]
    fn test_convert_with_report() {
        let temp = TempDir::new().unwrap();
        let chart = converter(&temp).convert_with_report(PATTERN).unwrap();

        assert_eq!(chart.report.chart_name, "my-app");
        assert_eq!(chart.report.chart_version, "1.2.3");
        assert!(!chart.report.name_fallback);
        assert_eq!(chart.report.file_name, "my-app-1.2.3.tgz");
        assert_eq!(chart.report.size, chart.archive.len());
        assert_eq!(chart.report.digest.len(), 64);

        let meta = read_chart_metadata_from_archive_bytes(&chart.archive).unwrap();
        assert_eq!(meta.name, "my-app");
    }

    #[test]
    fn test_empty_input() {
        let temp = TempDir::new().unwrap();
        let err = converter(&temp).convert("").unwrap_err();

        assert!(matches!(err, ConvertError::LoadPattern { .. }));
        assert_eq!(err.context(), "input");
        // Nothing touched the work area
        assert!(!temp.path().join("helm-packages").exists());
    }

    #[test]
    fn test_missing_name_checked_before_version() {
        let temp = TempDir::new().unwrap();
        let loader = FixedLoader(Pattern::default());
        let err = converter(&temp)
            .with_loader(loader)
            .convert("anything")
            .unwrap_err();

        assert!(matches!(err, ConvertError::ChartMetadata { ref reason } if reason == "missing name"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let temp = TempDir::new().unwrap();
        let chart = converter(&temp).convert_with_report(PATTERN).unwrap();
        let yaml = serde_yaml::to_string(&chart.report).unwrap();

        assert!(yaml.contains("chartName: my-app"));
        assert!(yaml.contains("nameFallback: false"));
    }
}
