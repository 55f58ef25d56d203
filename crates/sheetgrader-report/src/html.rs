//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use sheetgrader_core::report::ScoringReport;
use sheetgrader_core::TabularSheet;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// CSS class for a cell of a scored sheet.
fn cell_class(cell: &str) -> Option<&'static str> {
    match cell {
        "True" => Some("pass"),
        "False" => Some("fail"),
        sheetgrader_core::KEY_NOT_FOUND => Some("missing"),
        _ => None,
    }
}

/// Generate an HTML page for a scored sheet and its run report.
pub fn generate_html(report: &ScoringReport, scored: &TabularSheet) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>sheetgrader report: {}</title>\n",
        html_escape(&report.responses)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>sheetgrader report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Responses: <strong>{}</strong> | Keys: <strong>{}</strong>",
        html_escape(&report.responses),
        html_escape(&report.keys),
    ));
    if let Some(arrangement) = &report.arrangement {
        html.push_str(&format!(
            " | Arrangement: <strong>{}</strong>",
            html_escape(arrangement)
        ));
    }
    html.push_str(&format!(
        " | {}</p>\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Per-form summary
    let summary = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p>{} rows: {} scored, {} without a matching key</p>\n",
        summary.total_rows, summary.matched, summary.unmatched
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Form Code</th><th>Rows</th><th>No Key</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (form, counts) in &summary.per_form {
        let class = if counts.unmatched > 0 { " class=\"missing\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            html_escape(form),
            counts.rows,
            counts.unmatched
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Scored rows
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr>");
    for (i, name) in scored.header().iter().enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable({i})\">{}</th>",
            html_escape(name)
        ));
    }
    html.push_str("</tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in scored.rows() {
        html.push_str("<tr>");
        for cell in row {
            match cell_class(cell) {
                Some(class) => html.push_str(&format!(
                    "<td class=\"{class}\">{}</td>",
                    html_escape(cell)
                )),
                None => html.push_str(&format!("<td>{}</td>", html_escape(cell))),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoringReport, scored: &TabularSheet, path: &Path) -> Result<()> {
    let html = generate_html(report, scored);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --missing: #fef3c7; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --missing: #78350f; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.25rem 0.5rem; text-align: left; white-space: nowrap; }
th { background: var(--border); cursor: pointer; }
.results { overflow-x: auto; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.missing { background: var(--missing); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col] ? a.cells[col].textContent : '';
    const vb = b.cells[col] ? b.cells[col].textContent : '';
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use sheetgrader_core::scoring::score;
    use sheetgrader_core::Field;
    use std::collections::HashMap;

    fn make_scored() -> TabularSheet {
        let mut keys = TabularSheet::new(vec![Field::TestFormCode], 2);
        keys.add(
            &HashMap::from([(Field::TestFormCode, "A".to_string())]),
            vec!["B".into(), "C".into()],
        );
        let mut responses = TabularSheet::new(vec![Field::LastName, Field::TestFormCode], 2);
        responses.add(
            &HashMap::from([
                (Field::LastName, "<Lovelace>".to_string()),
                (Field::TestFormCode, "A".to_string()),
            ]),
            vec!["B".into(), "D".into()],
        );
        responses.add(
            &HashMap::from([
                (Field::LastName, "Hopper".to_string()),
                (Field::TestFormCode, "Z".to_string()),
            ]),
            vec!["B".into(), "C".into()],
        );
        score(&responses, &keys).unwrap()
    }

    #[test]
    fn html_report_contains_required_elements() {
        let scored = make_scored();
        let report = ScoringReport::new("responses.csv", "keys.csv", None, &scored).unwrap();
        let html = generate_html(&report, &scored);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("responses.csv"));
        assert!(html.contains("Total Score (%)"));
        assert!(html.contains("<td class=\"pass\">True</td>"));
        assert!(html.contains("<td class=\"fail\">False</td>"));
        assert!(html.contains("<td class=\"missing\">NO KEY FOUND</td>"));
    }

    #[test]
    fn html_report_escapes_cells() {
        let scored = make_scored();
        let report = ScoringReport::new("responses.csv", "keys.csv", None, &scored).unwrap();
        let html = generate_html(&report, &scored);
        assert!(html.contains("&lt;Lovelace&gt;"));
        assert!(!html.contains("<Lovelace>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let scored = make_scored();
        let report =
            ScoringReport::new("responses.csv", "keys.csv", Some("arr.csv".into()), &scored)
                .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &scored, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Arrangement: <strong>arr.csv</strong>"));
    }
}
