//! Grading error types.
//!
//! These cover structurally wrong input tables and inconsistent arrangement
//! files. Per-row recoverable outcomes (missing identity fields, unmatched
//! form codes) are not errors and never surface here.

use thiserror::Error;

/// Errors that can occur while loading, scoring or reordering a sheet.
#[derive(Debug, Error)]
pub enum GradeError {
    /// The header has no column literally named "1".
    #[error("malformed input: no answer column named '1' in header")]
    MissingAnswerColumn,

    /// The form-code column is missing or no "1" column follows it.
    #[error("invalid {table} matrix: form-code column must precede a '1'-named answer column")]
    InvalidLayout { table: &'static str },

    /// A required identity column is absent from the header.
    #[error("column '{column}' not found in {table} header")]
    MissingColumn {
        column: &'static str,
        table: &'static str,
    },

    /// The input table has no header row.
    #[error("table is empty: expected a header row")]
    EmptyTable,

    /// A scored row's form code has no entry in the arrangement table.
    #[error("no arrangement found for form code '{form_code}'")]
    ArrangementNotFound { form_code: String },

    /// An arrangement cell is not a positive question number.
    #[error("invalid arrangement value '{value}' for form code '{form_code}'")]
    InvalidArrangement { form_code: String, value: String },

    /// An arrangement points past the end of a row's answers.
    #[error(
        "arrangement for form code '{form_code}' references question {} but the row has {answers} answers",
        .index + 1
    )]
    ArrangementOutOfRange {
        form_code: String,
        index: usize,
        answers: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GradeError>;
