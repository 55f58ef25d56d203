//! The `sheetgrader reorder` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use sheetgrader_core::config::load_config_from;
use sheetgrader_core::reorder::reorder;
use sheetgrader_core::sheet::read_records_from_path;

use super::score::load_sheet;

pub fn execute(
    scored_path: PathBuf,
    arrangement_path: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let scored = load_sheet(&scored_path, config.num_questions)?;
    let arrangement = read_records_from_path(&arrangement_path).with_context(|| {
        format!("failed to read arrangement: {}", arrangement_path.display())
    })?;

    let reordered = reorder(&scored, &arrangement).context("reordering failed")?;
    reordered.save(&output)?;

    eprintln!(
        "Reordered {} rows, saved to: {}",
        reordered.row_count(),
        output.display()
    );
    Ok(())
}
