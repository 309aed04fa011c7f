//! Render command - print the Kubernetes manifests of a pattern

use meshpack_convert::{KubernetesRenderer, ManifestRenderer};
use std::path::Path;

use crate::error::{CliError, Result};

pub fn run(pattern_path: &Path) -> Result<()> {
    let input =
        std::fs::read_to_string(pattern_path).map_err(|e| CliError::io_at(pattern_path, e))?;

    let manifest = KubernetesRenderer
        .render(&input)
        .map_err(|e| CliError::render(e.to_string()))?;

    print!("{}", manifest);
    Ok(())
}
