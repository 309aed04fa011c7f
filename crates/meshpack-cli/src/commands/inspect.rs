//! Inspect command - view chart archive contents without extracting

use console::style;
use meshpack_core::{list_archive_bytes, read_chart_metadata_from_archive_bytes};
use std::path::Path;

use crate::error::{CliError, Result};
use crate::util::{format_size, sha256_hex, short_digest};

pub fn run(archive_path: &Path) -> Result<()> {
    let data = std::fs::read(archive_path).map_err(|e| CliError::io_at(archive_path, e))?;

    let chart =
        read_chart_metadata_from_archive_bytes(&data).map_err(|e| CliError::chart(e.to_string()))?;
    let entries = list_archive_bytes(&data).map_err(|e| CliError::chart(e.to_string()))?;

    println!(
        "{} {} v{}",
        style("Chart").cyan().bold(),
        chart.name,
        chart.version
    );
    println!();
    println!("  {}: {}", style("API version").dim(), chart.api_version);
    println!("  {}: {}", style("Type").dim(), chart.chart_type.as_str());
    if !chart.description.is_empty() {
        println!("  {}: {}", style("Description").dim(), chart.description);
    }
    println!(
        "  {}: sha256:{}",
        style("Digest").dim(),
        short_digest(&sha256_hex(&data), 16)
    );
    println!();

    println!("{}:", style("Files").bold());
    for entry in &entries {
        println!(
            "  {} {}",
            entry.path,
            style(format!("({})", format_size(entry.size))).dim()
        );
    }

    Ok(())
}
