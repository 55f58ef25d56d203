//! Identity fields and their external column names.
//!
//! The column names are part of the on-disk file format. Changing one breaks
//! every CSV written by an earlier version, so the table is fixed here and
//! everything else resolves headers through it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity column of a sheet: either a real field read off the answer
/// sheet, or a virtual field computed during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    LastName,
    FirstName,
    MiddleName,
    StudentId,
    CourseId,
    TestFormCode,
    /// Fraction of questions answered correctly.
    Score,
    /// Count of questions answered correctly.
    Points,
}

impl Field {
    /// Every field, real fields first.
    pub const ALL: [Field; 8] = [
        Field::LastName,
        Field::FirstName,
        Field::MiddleName,
        Field::StudentId,
        Field::CourseId,
        Field::TestFormCode,
        Field::Score,
        Field::Points,
    ];

    /// The fields read from a response sheet, in their default column order.
    pub const REAL: [Field; 6] = [
        Field::LastName,
        Field::FirstName,
        Field::MiddleName,
        Field::StudentId,
        Field::CourseId,
        Field::TestFormCode,
    ];

    /// The header text used for this field in CSV files.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::LastName => "Last Name",
            Field::FirstName => "First Name",
            Field::MiddleName => "Middle Name",
            Field::StudentId => "Student ID",
            Field::CourseId => "Course ID",
            Field::TestFormCode => "Test Form Code",
            Field::Score => "Total Score (%)",
            Field::Points => "Total Points",
        }
    }

    /// Resolve a header cell back to its field. Matching is exact and
    /// case-sensitive.
    pub fn from_column_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// Whether this field is computed rather than read off the sheet.
    pub fn is_virtual(self) -> bool {
        matches!(self, Field::Score | Field::Points)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
