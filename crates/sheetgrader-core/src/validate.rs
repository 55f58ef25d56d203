//! Pre-flight checks for input tables.
//!
//! Structural problems that would abort scoring (no form-code column, no "1"
//! column) are returned as errors. Everything else that looks suspicious but
//! is tolerated by the scoring stages is reported as a warning.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{GradeError, Result};
use crate::layout::{HeaderColumn, HeaderLayout};
use crate::KEY_NOT_FOUND;

/// Which role a table plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Responses,
    Keys,
    Arrangement,
    Scored,
}

impl TableKind {
    /// Name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Responses => "response",
            TableKind::Keys => "key",
            TableKind::Arrangement => "arrangement",
            TableKind::Scored => "scored",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Responses => write!(f, "responses"),
            TableKind::Keys => write!(f, "keys"),
            TableKind::Arrangement => write!(f, "arrangement"),
            TableKind::Scored => write!(f, "scored"),
        }
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "responses" | "response" => Ok(TableKind::Responses),
            "keys" | "key" => Ok(TableKind::Keys),
            "arrangement" | "arrangements" => Ok(TableKind::Arrangement),
            "scored" | "results" => Ok(TableKind::Scored),
            other => Err(format!("unknown table kind: {other}")),
        }
    }
}

/// A warning from table validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based line in the file (the header is line 1), if row-specific.
    pub line: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn table(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    fn row(index: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(index + 2),
            message: message.into(),
        }
    }
}

/// Validate a raw table (header first) for its role in the pipeline.
pub fn validate_table(table: &[Vec<String>], kind: TableKind) -> Result<Vec<ValidationWarning>> {
    let (header, rows) = table.split_first().ok_or(GradeError::EmptyTable)?;
    let layout = HeaderLayout::parse(header, kind.label())?;
    let score_index = match kind {
        TableKind::Scored => Some(layout.require_score(kind.label())?),
        _ => None,
    };

    let mut warnings = Vec::new();

    for cell in &header[..layout.answer_start] {
        if let HeaderColumn::Unknown(name) = HeaderColumn::resolve(cell) {
            warnings.push(ValidationWarning::table(format!(
                "unrecognised column '{name}' will be ignored"
            )));
        }
    }

    for (i, cell) in header[layout.answer_start..].iter().enumerate() {
        let expected = (i + 1).to_string();
        if *cell != expected {
            warnings.push(ValidationWarning::table(format!(
                "answer column {} is named '{cell}', expected '{expected}'",
                layout.answer_start + i + 1
            )));
            break;
        }
    }

    let question_count = header.len() - layout.answer_start;
    let mut seen_codes = HashSet::new();

    for (i, row) in rows.iter().enumerate() {
        let sentinel = score_index
            .and_then(|idx| row.get(idx))
            .is_some_and(|cell| cell == KEY_NOT_FOUND);

        if !sentinel && row.len() != header.len() {
            warnings.push(ValidationWarning::row(
                i,
                format!("row has {} cells, header has {}", row.len(), header.len()),
            ));
        }

        let form_code = layout.form_code_of(row);
        if form_code.trim().is_empty() {
            warnings.push(ValidationWarning::row(i, "form code is empty"));
        }

        if matches!(kind, TableKind::Keys | TableKind::Arrangement)
            && !seen_codes.insert(form_code.to_string())
        {
            warnings.push(ValidationWarning::row(
                i,
                format!("duplicate form code '{form_code}', the later row wins"),
            ));
        }

        if kind == TableKind::Arrangement {
            if let Some(message) = check_permutation(layout.answers_of(row), question_count) {
                warnings.push(ValidationWarning::row(i, message));
            }
        }
    }

    Ok(warnings)
}

/// Describe why an arrangement row is not a permutation of 1..=n, if it isn't.
fn check_permutation(cells: &[String], n: usize) -> Option<String> {
    let mut seen = HashSet::new();
    for cell in cells {
        match cell.trim().parse::<usize>() {
            Ok(v) if (1..=n).contains(&v) => {
                if !seen.insert(v) {
                    return Some(format!("question {v} appears more than once"));
                }
            }
            _ => return Some(format!("'{cell}' is not a question number between 1 and {n}")),
        }
    }
    if seen.len() != n {
        return Some(format!(
            "arrangement lists {} of {n} questions",
            seen.len()
        ));
    }
    None
}
