//! Convert command - package a pattern as a Helm chart

use console::style;
use meshpack_convert::{ConversionReport, HelmConverter, WorkArea};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};
use crate::util::{format_size, short_digest};

#[derive(Serialize)]
struct ConvertOutput<'a> {
    #[serde(flatten)]
    report: &'a ConversionReport,
    path: String,
}

pub fn run(
    pattern_path: &Path,
    output: Option<&Path>,
    work_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let input =
        std::fs::read_to_string(pattern_path).map_err(|e| CliError::io_at(pattern_path, e))?;

    let mut converter = HelmConverter::new();
    if let Some(dir) = work_dir {
        converter = converter.with_work_area(WorkArea::under(dir));
    }

    if !json {
        println!(
            "{} {}",
            style("Converting").cyan().bold(),
            pattern_path.display()
        );
    }

    let chart = converter.convert_with_report(&input)?;
    let report = &chart.report;

    // Default: <name>-<version>.tgz in the current directory
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(&report.file_name),
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::io_at(parent, e))?;
    }
    std::fs::write(&output_path, &chart.archive).map_err(|e| CliError::io_at(&output_path, e))?;

    if json {
        let out = ConvertOutput {
            report,
            path: output_path.display().to_string(),
        };
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    if report.name_fallback {
        println!(
            "  {} pattern name has no valid chart name characters, kept as {:?}",
            style("⚠").yellow(),
            report.chart_name
        );
    }
    println!(
        "  {} {} v{}",
        style("Chart").dim(),
        report.chart_name,
        report.chart_version
    );
    println!(
        "  {} {}",
        style("Created").green().bold(),
        output_path.display()
    );
    println!("  {} {}", style("Size").dim(), format_size(report.size as u64));
    println!(
        "  {} sha256:{}",
        style("Digest").dim(),
        short_digest(&report.digest, 16)
    );

    Ok(())
}
