//! Arrangement-based question reordering.
//!
//! Printed test forms scramble question order. An arrangement table lists, for
//! each form code, which original question sits at each printed position. The
//! reorderer uses it to rewrite a scored sheet's answer cells per row.

use std::collections::HashMap;

use crate::error::{GradeError, Result};
use crate::layout::HeaderLayout;
use crate::sheet::TabularSheet;
use crate::KEY_NOT_FOUND;

/// Form code → zero-based question index for each printed position.
pub type ArrangementMap = HashMap<String, Vec<usize>>;

/// Parse one arrangement cell ("3") into a zero-based index (2).
fn parse_position(form_code: &str, cell: &str) -> Result<usize> {
    match cell.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(GradeError::InvalidArrangement {
            form_code: form_code.to_string(),
            value: cell.to_string(),
        }),
    }
}

/// Build the arrangement map from a raw table whose first row is the header.
pub fn build_arrangement_map(table: &[Vec<String>]) -> Result<ArrangementMap> {
    let (header, rows) = table.split_first().ok_or(GradeError::EmptyTable)?;
    let layout = HeaderLayout::parse(header, "arrangement")?;

    let mut map = ArrangementMap::new();
    for row in rows {
        let form_code = layout.form_code_of(row);
        let order = layout
            .answers_of(row)
            .iter()
            .map(|cell| parse_position(form_code, cell))
            .collect::<Result<Vec<_>>>()?;
        if map.insert(form_code.to_string(), order).is_some() {
            tracing::warn!(form_code, "duplicate arrangement, using the later row");
        }
    }

    tracing::debug!(forms = map.len(), "built arrangement map");
    Ok(map)
}

/// Reorder a scored sheet's answers according to an arrangement table.
///
/// Rows scored without a key are copied unchanged. Any other row whose form
/// code is missing from the arrangement is an error.
pub fn reorder(scored: &TabularSheet, arrangement: &[Vec<String>]) -> Result<TabularSheet> {
    let map = build_arrangement_map(arrangement)?;
    reorder_with_map(scored, &map)
}

/// Reorder a scored sheet with an already built arrangement map.
pub fn reorder_with_map(scored: &TabularSheet, map: &ArrangementMap) -> Result<TabularSheet> {
    let layout = HeaderLayout::parse(scored.header(), "scored")?;
    let score_index = layout.require_score("scored")?;

    let mut result = scored.empty_like();
    let mut passed_through = 0usize;
    for row in scored.rows() {
        if row.get(score_index).map(String::as_str) == Some(KEY_NOT_FOUND) {
            passed_through += 1;
            result.push_row(row.clone());
            continue;
        }

        let form_code = layout.form_code_of(row);
        let order = map
            .get(form_code)
            .ok_or_else(|| GradeError::ArrangementNotFound {
                form_code: form_code.to_string(),
            })?;
        let answers = layout.answers_of(row);

        let mut reordered = row[..layout.answer_start.min(row.len())].to_vec();
        for &index in order {
            let cell = answers
                .get(index)
                .ok_or_else(|| GradeError::ArrangementOutOfRange {
                    form_code: form_code.to_string(),
                    index,
                    answers: answers.len(),
                })?;
            reordered.push(cell.clone());
        }
        result.push_row(reordered);
    }

    tracing::info!(rows = result.row_count(), passed_through, "reordered scored sheet");
    Ok(result)
}
