//! Work area configuration
//!
//! Charts are assembled in a scratch directory and packaged into a package
//! directory. By default both live under `~/.meshery`:
//!
//! ```text
//! ~/.meshery/helm-packages/<id>/  packaged archives (deleted after read-back)
//! ~/.meshery/tmp/helm/<id>/       per-conversion build directories
//! ```

use std::path::{Path, PathBuf};

use crate::error::{BuildStep, ConvertError, Result};

/// Directory name of the default work area below the home directory
pub const WORK_DIR_NAME: &str = ".meshery";

/// Locations used while building and packaging charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkArea {
    /// Destination of packaged archives
    pub package_dir: PathBuf,

    /// Root of per-conversion build directories
    pub temp_dir: PathBuf,
}

impl WorkArea {
    /// Work area rooted at `root`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            package_dir: root.join("helm-packages"),
            temp_dir: root.join("tmp").join("helm"),
        }
    }

    /// Default work area in the user's home directory
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            ConvertError::chart_creation(
                BuildStep::HomeDirectory,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine home directory",
                ),
            )
        })?;
        Ok(Self::under(home.join(WORK_DIR_NAME)))
    }

    /// Create both directories if they do not exist yet
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.package_dir)
            .map_err(|e| ConvertError::chart_creation(BuildStep::PackageDirectory, e))?;
        std::fs::create_dir_all(&self.temp_dir)
            .map_err(|e| ConvertError::chart_creation(BuildStep::TempDirectory, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let area = WorkArea::under("/work");
        assert_eq!(area.package_dir, PathBuf::from("/work/helm-packages"));
        assert_eq!(area.temp_dir, PathBuf::from("/work/tmp/helm"));
    }

    #[test]
    fn test_from_home() {
        // Only meaningful where a home directory exists
        if let Some(home) = dirs::home_dir() {
            let area = WorkArea::from_home().unwrap();
            assert_eq!(area, WorkArea::under(home.join(".meshery")));
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let area = WorkArea::under(temp.path());

        area.ensure().unwrap();
        area.ensure().unwrap();

        assert!(area.package_dir.is_dir());
        assert!(area.temp_dir.is_dir());
    }

    #[test]
    fn test_ensure_reports_package_step() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = WorkArea::under(&blocker).ensure().unwrap_err();
        assert_eq!(err.context(), "creating package directory");
    }

    #[test]
    fn test_ensure_reports_temp_step() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tmp"), "not a directory").unwrap();

        let err = WorkArea::under(temp.path()).ensure().unwrap_err();
        assert_eq!(err.context(), "creating temp directory");
    }
}
