//! The `sheetgrader validate` command.

use std::path::PathBuf;

use anyhow::Result;

use sheetgrader_core::sheet::read_records_from_path;
use sheetgrader_core::validate::{validate_table, TableKind};

pub fn execute(file: PathBuf, kind: String) -> Result<()> {
    let kind: TableKind = kind.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let table = read_records_from_path(&file)?;
    let warnings = validate_table(&table, kind)?;

    println!(
        "{}: {} table ({} data rows)",
        file.display(),
        kind,
        table.len().saturating_sub(1)
    );

    for w in &warnings {
        let prefix = w
            .line
            .map(|line| format!("  [line {line}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("No problems found.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
