//! Chart scaffolding and packaging
//!
//! A chart is assembled in a build directory unique to one conversion:
//!
//! ```text
//! <temp>/<build-id>/<chart-name>/
//!   Chart.yaml
//!   templates/manifest.yaml
//! ```
//!
//! The archive is packaged into `<packages>/<build-id>/`, so concurrent
//! conversions of the same pattern never share a file. Both directories are
//! owned by guards and removed when dropped, on success and on every error
//! path.

use meshpack_core::{ArchivePackager, CHART_FILE, ChartMetadata};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::config::WorkArea;
use crate::error::{BuildStep, ConvertError, Result};
use crate::warnings::{CleanupWarning, WarningSink};

/// Directory holding chart templates
pub const TEMPLATES_DIR: &str = "templates";

/// File name of the rendered manifest inside `templates/`
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// A per-conversion build directory, removed on drop
pub struct BuildDir<'a> {
    id: String,
    path: PathBuf,
    warnings: &'a dyn WarningSink,
}

impl<'a> BuildDir<'a> {
    /// Reserve a fresh build directory below `temp_dir`
    ///
    /// Nothing is created on disk until the scaffold is written.
    pub fn new(temp_dir: &Path, warnings: &'a dyn WarningSink) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            path: temp_dir.join(&id),
            id,
            warnings,
        }
    }

    /// Unique id of this conversion
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildDir<'_> {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed build directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => self.warnings.warn(CleanupWarning::BuildDirectory {
                path: self.path.clone(),
                error,
            }),
        }
    }
}

/// Package destination private to one conversion, removed on drop
struct PackageDir<'a> {
    path: PathBuf,
    warnings: &'a dyn WarningSink,
}

impl<'a> PackageDir<'a> {
    fn create(package_dir: &Path, id: &str, warnings: &'a dyn WarningSink) -> Result<Self> {
        let path = package_dir.join(id);
        std::fs::create_dir(&path)
            .map_err(|e| ConvertError::chart_creation(BuildStep::PackageDirectory, e))?;
        Ok(Self { path, warnings })
    }
}

impl Drop for PackageDir<'_> {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => self.warnings.warn(CleanupWarning::PackagedChart {
                path: self.path.clone(),
                error,
            }),
        }
    }
}

/// A chart written to disk, ready for packaging
#[derive(Debug, Clone)]
pub struct ChartScaffold {
    /// Chart source directory (`<build>/<chart-name>`)
    pub root: PathBuf,

    /// Metadata written to Chart.yaml
    pub metadata: ChartMetadata,
}

impl ChartScaffold {
    /// Write Chart.yaml and the manifest template below `build_dir`
    pub fn write(build_dir: &Path, name: &str, version: &str, manifest: &str) -> Result<Self> {
        if !is_single_component(name) {
            return Err(ConvertError::chart_creation(
                BuildStep::ChartSourceDirectory,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("chart name {:?} is not usable as a directory name", name),
                ),
            ));
        }

        let root = build_dir.join(name);
        std::fs::create_dir_all(&root)
            .map_err(|e| ConvertError::chart_creation(BuildStep::ChartSourceDirectory, e))?;

        let templates_dir = root.join(TEMPLATES_DIR);
        std::fs::create_dir_all(&templates_dir)
            .map_err(|e| ConvertError::chart_creation(BuildStep::TemplatesDirectory, e))?;

        let metadata = ChartMetadata::for_pattern(name, version);
        let chart_yaml = metadata
            .to_yaml()
            .map_err(|e| ConvertError::chart_creation(BuildStep::MarshalMetadata, e))?;
        std::fs::write(root.join(CHART_FILE), chart_yaml)
            .map_err(|e| ConvertError::chart_creation(BuildStep::WriteChartYaml, e))?;

        std::fs::write(templates_dir.join(MANIFEST_FILE), manifest)
            .map_err(|e| ConvertError::chart_creation(BuildStep::WriteManifest, e))?;

        tracing::debug!(path = %root.display(), "wrote chart scaffold");
        Ok(Self { root, metadata })
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }
}

/// A packaged chart read back into memory
#[derive(Debug, Clone)]
pub struct PackagedChart {
    /// Archive bytes
    pub data: Vec<u8>,

    /// File name the packager chose (`<name>-<version>.tgz`)
    pub file_name: String,
}

/// Scaffold a chart, package it and read the archive back
///
/// Neither the build directory nor the archive file outlive this call.
pub fn build_chart(
    manifest: &str,
    name: &str,
    version: &str,
    work_area: &WorkArea,
    packager: &dyn ArchivePackager,
    warnings: &dyn WarningSink,
) -> Result<PackagedChart> {
    work_area.ensure()?;

    let build = BuildDir::new(&work_area.temp_dir, warnings);
    let scaffold = ChartScaffold::write(build.path(), name, version, manifest)?;

    let destination = PackageDir::create(&work_area.package_dir, build.id(), warnings)?;
    let archive_path = packager
        .package(&scaffold.root, &destination.path)
        .map_err(|source| ConvertError::Packaging { source })?;

    let data = std::fs::read(&archive_path);

    if let Err(error) = std::fs::remove_file(&archive_path) {
        warnings.warn(CleanupWarning::PackagedChart {
            path: archive_path.clone(),
            error,
        });
    }

    let data = data.map_err(|e| ConvertError::chart_creation(BuildStep::ReadPackagedChart, e))?;
    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(PackagedChart { data, file_name })
}

/// True for names like `app`, false for `a/b`, `..`, `/` or the empty string
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == OsStr::new(name),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warnings::RecordingWarnings;
    use meshpack_core::{PackageError, TarGzPackager};
    use tempfile::TempDir;

    struct FailingPackager;

    impl ArchivePackager for FailingPackager {
        fn package(&self, _chart_dir: &Path, _destination: &Path) -> std::result::Result<PathBuf, PackageError> {
            Err(PackageError::InvalidChart {
                message: "refused".to_string(),
            })
        }
    }

    fn build_dirs(area: &WorkArea) -> Vec<PathBuf> {
        std::fs::read_dir(&area.temp_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    #[test]
    fn test_scaffold_layout() {
        let temp = TempDir::new().unwrap();
        let scaffold =
            ChartScaffold::write(temp.path(), "my-app", "1.0.0", "kind: ConfigMap\n").unwrap();

        assert_eq!(scaffold.root, temp.path().join("my-app"));
        assert_eq!(scaffold.metadata.name, "my-app");

        let chart = ChartMetadata::load(&scaffold.root).unwrap();
        assert_eq!(chart, scaffold.metadata);

        let manifest = std::fs::read_to_string(scaffold.templates_dir().join(MANIFEST_FILE)).unwrap();
        assert_eq!(manifest, "kind: ConfigMap\n");

        let templates: Vec<_> = std::fs::read_dir(scaffold.templates_dir()).unwrap().collect();
        assert_eq!(templates.len(), 1);
    }

    #[test]
    fn test_scaffold_rejects_unsafe_names() {
        let temp = TempDir::new().unwrap();
        for name in ["", ".", "..", "a/b", "/", "../escape"] {
            let err = ChartScaffold::write(temp.path(), name, "1.0.0", "").unwrap_err();
            assert_eq!(err.context(), "creating chart source directory", "{name:?}");
        }
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scaffold_accepts_unsanitized_names() {
        let temp = TempDir::new().unwrap();
        let scaffold = ChartScaffold::write(temp.path(), "!!!", "1.0.0", "").unwrap();
        assert!(scaffold.root.join(CHART_FILE).is_file());
    }

    #[test]
    fn test_build_dir_removed_on_drop() {
        let temp = TempDir::new().unwrap();
        let warnings = RecordingWarnings::new();

        let path = {
            let build = BuildDir::new(temp.path(), &warnings);
            std::fs::create_dir_all(build.path().join("chart/templates")).unwrap();
            build.path().to_path_buf()
        };

        assert!(!path.exists());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_dir_never_created_is_fine() {
        let temp = TempDir::new().unwrap();
        let warnings = RecordingWarnings::new();
        drop(BuildDir::new(temp.path(), &warnings));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_dirs_are_unique() {
        let temp = TempDir::new().unwrap();
        let warnings = RecordingWarnings::new();
        let a = BuildDir::new(temp.path(), &warnings);
        let b = BuildDir::new(temp.path(), &warnings);
        assert_ne!(a.path(), b.path());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.path(), temp.path().join(a.id()));
    }

    #[test]
    fn test_build_chart() {
        let temp = TempDir::new().unwrap();
        let area = WorkArea::under(temp.path());
        let warnings = RecordingWarnings::new();

        let packaged = build_chart(
            "kind: ConfigMap\n",
            "app",
            "0.3.0",
            &area,
            &TarGzPackager,
            &warnings,
        )
        .unwrap();

        assert_eq!(packaged.file_name, "app-0.3.0.tgz");
        assert!(!packaged.data.is_empty());
        assert!(build_dirs(&area).is_empty());
        assert_eq!(std::fs::read_dir(&area.package_dir).unwrap().count(), 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_chart_packages_into_private_directory() {
        struct RecordDestination(std::sync::Mutex<Option<PathBuf>>);

        impl ArchivePackager for RecordDestination {
            fn package(&self, chart_dir: &Path, destination: &Path) -> std::result::Result<PathBuf, PackageError> {
                *self.0.lock().unwrap() = Some(destination.to_path_buf());
                TarGzPackager.package(chart_dir, destination)
            }
        }

        let temp = TempDir::new().unwrap();
        let area = WorkArea::under(temp.path());
        let warnings = RecordingWarnings::new();
        let packager = RecordDestination(std::sync::Mutex::new(None));

        build_chart("", "app", "1.0.0", &area, &packager, &warnings).unwrap();

        let destination = packager.0.lock().unwrap().clone().unwrap();
        assert_eq!(destination.parent(), Some(area.package_dir.as_path()));
        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(&area.package_dir).unwrap().count(), 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_chart_packaging_failure_cleans_up() {
        let temp = TempDir::new().unwrap();
        let area = WorkArea::under(temp.path());
        let warnings = RecordingWarnings::new();

        let err = build_chart("", "app", "0.3.0", &area, &FailingPackager, &warnings).unwrap_err();

        assert!(matches!(err, ConvertError::Packaging { .. }));
        assert!(build_dirs(&area).is_empty());
        assert_eq!(std::fs::read_dir(&area.package_dir).unwrap().count(), 0);
    }
}
