//! The complete extraction run, from version probe to data file.

use crate::catalog::read_design_names;
use crate::config::Settings;
use crate::detail::add_design_details;
use crate::output::{resolve_output_path, write_designs};
use crate::probe::read_boxes_version;
use crate::runner::Boxes;
use anyhow::{Context, Result};
use std::path::PathBuf;
use thiserror::Error;

/// Errors detected by the pipeline itself.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("boxes listed aliases before any design: {}", .0.join(", "))]
    OrphanedAliases(Vec<String>),
}

/// Query boxes for all designs and write the data file.
///
/// Returns the path of the file written. Nothing is written if any step
/// fails.
pub fn run(boxes: &dyn Boxes, settings: &Settings) -> Result<PathBuf> {
    let version = read_boxes_version(boxes)?;
    println!("Running boxes v{version}");

    let catalog =
        read_design_names(boxes, &settings.config).context("failed to list designs")?;
    if catalog.has_orphans() {
        return Err(PipelineError::OrphanedAliases(catalog.orphaned_aliases()).into());
    }
    println!("Config file contains {} designs", catalog.len());

    let mut designs = catalog.into_designs();
    for design in &mut designs {
        add_design_details(boxes, &settings.config, design)
            .with_context(|| format!("failed to read details of design {}", design.name))?;
    }

    let path = resolve_output_path(&settings.output, &version);
    write_designs(&designs, &path)?;
    tracing::info!(path = %path.display(), designs = designs.len(), "wrote design data");
    println!("Output file created: {}", path.display());

    Ok(path)
}
