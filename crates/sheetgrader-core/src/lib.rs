//! sheetgrader-core — Answer-sheet data model, scoring, and reordering.
//!
//! This crate defines the tabular sheet that every stage reads and writes,
//! the key-matching scorer, and the arrangement-based reorderer.

pub mod config;
pub mod error;
pub mod field;
pub mod layout;
pub mod reorder;
pub mod report;
pub mod scoring;
pub mod sheet;
pub mod validate;

pub use error::{GradeError, Result};
pub use field::Field;
pub use sheet::TabularSheet;

/// Number of answer columns on the standard printed sheet.
pub const NUM_QUESTIONS: usize = 75;

/// Reserved score value for a response whose form code matched no key.
pub const KEY_NOT_FOUND: &str = "NO KEY FOUND";
