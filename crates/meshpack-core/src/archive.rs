//! Chart archive creation and reading
//!
//! Packages a chart directory into the standard Helm `.tgz` layout, where
//! every entry lives under a top-level `<chart-name>/` directory:
//!
//! ```text
//! my-app/Chart.yaml
//! my-app/templates/manifest.yaml
//! ```

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tar::{Archive, Builder, Header};
use walkdir::WalkDir;

use crate::chart::{CHART_FILE, ChartMetadata};
use crate::error::PackageError;

/// Packages a chart source directory into an archive file
pub trait ArchivePackager: Send + Sync {
    /// Package `chart_dir` into `destination`, returning the archive path
    fn package(&self, chart_dir: &Path, destination: &Path) -> Result<PathBuf, PackageError>;
}

/// Writes gzip-compressed tarballs in Helm's chart layout
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzPackager;

impl ArchivePackager for TarGzPackager {
    fn package(&self, chart_dir: &Path, destination: &Path) -> Result<PathBuf, PackageError> {
        let metadata = ChartMetadata::load(chart_dir)?;
        metadata.validate()?;

        let output = destination.join(default_archive_name(&metadata));
        tracing::debug!(chart = %metadata.name, path = %output.display(), "packaging chart");

        if let Err(e) = write_chart_archive(chart_dir, &metadata.name, &output) {
            // A partial archive must not outlive a failed run
            if let Err(cleanup) = std::fs::remove_file(&output)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %output.display(),
                    error = %cleanup,
                    "failed to remove partial archive"
                );
            }
            return Err(e);
        }

        Ok(output)
    }
}

/// Write `chart_dir` to `output` as `<name>/...` entries
fn write_chart_archive(chart_dir: &Path, name: &str, output: &Path) -> Result<(), PackageError> {
    let file = File::create(output)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    // Chart.yaml first, then everything else in a stable order
    add_file_to_archive(
        &mut builder,
        &chart_dir.join(CHART_FILE),
        &format!("{}/{}", name, CHART_FILE),
    )?;

    for (file_path, rel_path) in chart_files(chart_dir)? {
        if rel_path == CHART_FILE {
            continue;
        }
        add_file_to_archive(&mut builder, &file_path, &format!("{}/{}", name, rel_path))?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    Ok(())
}

/// Information about a file in an archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path within the archive, including the chart directory
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

/// List the files in an in-memory archive
pub fn list_archive_bytes(data: &[u8]) -> Result<Vec<ArchiveEntry>, PackageError> {
    let mut archive = Archive::new(GzDecoder::new(data));
    let mut entries = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        if entry.header().entry_type().is_dir() {
            continue;
        }
        entries.push(ArchiveEntry {
            path: entry.path()?.to_string_lossy().to_string(),
            size: entry.header().size()?,
        });
    }

    Ok(entries)
}

/// Read a specific file from an in-memory archive
pub fn read_file_from_archive_bytes(data: &[u8], file_path: &str) -> Result<Vec<u8>, PackageError> {
    let mut archive = Archive::new(GzDecoder::new(data));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.path()?.to_string_lossy() == file_path {
            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;
            return Ok(content);
        }
    }

    Err(PackageError::Archive {
        message: format!("File not found in archive: {}", file_path),
    })
}

/// Read the Chart.yaml of an in-memory archive
///
/// Uses the first `Chart.yaml` found directly below a top-level directory.
pub fn read_chart_metadata_from_archive_bytes(data: &[u8]) -> Result<ChartMetadata, PackageError> {
    let entries = list_archive_bytes(data)?;
    let chart_yaml = entries
        .iter()
        .map(|e| e.path.as_str())
        .find(|p| p.split('/').nth(1) == Some(CHART_FILE) && p.matches('/').count() == 1)
        .ok_or_else(|| PackageError::Archive {
            message: format!("{} not found in archive", CHART_FILE),
        })?
        .to_string();

    let content = read_file_from_archive_bytes(data, &chart_yaml)?;
    let text = String::from_utf8(content).map_err(|e| PackageError::Archive {
        message: format!("Invalid UTF-8 in {}: {}", CHART_FILE, e),
    })?;
    ChartMetadata::parse(&text)
}

/// Generate the archive filename for a chart
#[must_use]
pub fn default_archive_name(metadata: &ChartMetadata) -> String {
    format!("{}-{}.tgz", metadata.name, metadata.version)
}

/// Regular files below `chart_dir`, sorted by relative path
fn chart_files(chart_dir: &Path) -> Result<Vec<(PathBuf, String)>, PackageError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(chart_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| PackageError::Archive {
            message: format!("Failed to walk {}: {}", chart_dir.display(), e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(chart_dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((entry.path().to_path_buf(), rel_path));
    }

    Ok(files)
}

/// Add a file to a tar archive
fn add_file_to_archive<W: Write>(
    builder: &mut Builder<W>,
    file_path: &Path,
    archive_path: &str,
) -> Result<(), PackageError> {
    let content = std::fs::read(file_path)?;
    add_bytes_to_archive(builder, archive_path, &content)
}

/// Add bytes to a tar archive with a given path
fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<(), PackageError> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0); // Reproducible builds: use epoch time
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;

    Ok(())
}
