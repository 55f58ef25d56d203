//! The `sheetgrader score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sheetgrader_core::config::load_config_from;
use sheetgrader_core::reorder::reorder;
use sheetgrader_core::report::ScoringReport;
use sheetgrader_core::scoring::{score_with, ScoreOptions};
use sheetgrader_core::sheet::read_records_from_path;
use sheetgrader_core::TabularSheet;
use sheetgrader_report::html::write_html_report;

pub fn execute(
    responses_path: PathBuf,
    keys_path: PathBuf,
    arrangement_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    points: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats: Vec<String> = match &format {
        Some(f) if f == "all" => vec!["csv".into(), "json".into(), "html".into()],
        Some(f) => f.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.output_formats.clone(),
    };

    let responses = load_sheet(&responses_path, config.num_questions)?;
    let keys = load_sheet(&keys_path, config.num_questions)?;
    eprintln!(
        "sheetgrader v{} — Scoring {} responses against {} keys",
        env!("CARGO_PKG_VERSION"),
        responses.row_count(),
        keys.row_count()
    );

    let options = ScoreOptions {
        include_points: points || config.include_points,
    };
    let scored = score_with(&responses, &keys, &options).context("scoring failed")?;

    let report = ScoringReport::new(
        responses_path.display().to_string(),
        keys_path.display().to_string(),
        arrangement_path.as_ref().map(|p| p.display().to_string()),
        &scored,
    )?;
    print_summary(&report);

    tracing::debug!(?formats, output = %output.display(), "writing outputs");
    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    for fmt in &formats {
        match fmt.as_str() {
            "csv" => {
                let path = output.join("results.csv");
                scored.save(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "json" => {
                let path = output.join("report.json");
                report.save_json(&path)?;
                eprintln!("JSON report: {}", path.display());
            }
            "html" => {
                let path = output.join("report.html");
                write_html_report(&report, &scored, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    // Scored outputs are already on disk if reordering fails.
    if let Some(path) = &arrangement_path {
        let table = read_records_from_path(path)
            .with_context(|| format!("failed to read arrangement: {}", path.display()))?;
        let reordered = reorder(&scored, &table).context("reordering failed")?;
        if formats.iter().any(|f| f == "csv") {
            let path = output.join("results_reordered.csv");
            reordered.save(&path)?;
            eprintln!("Reordered results saved to: {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn load_sheet(path: &Path, num_questions: usize) -> Result<TabularSheet> {
    TabularSheet::from_csv_path(path, num_questions)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn print_summary(report: &ScoringReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Form Code", "Rows", "No Key"]);

    for (form, counts) in &report.summary.per_form {
        table.add_row(vec![
            Cell::new(form),
            Cell::new(counts.rows),
            Cell::new(counts.unmatched),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Scored {} of {} rows ({} without a matching key)",
        report.summary.matched, report.summary.total_rows, report.summary.unmatched
    );
}
