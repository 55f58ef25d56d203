//! Header parsing.
//!
//! Every table exchanged with the outside world has the same shape: identity
//! columns named after [`Field`]s, followed by answer columns "1".."N". The
//! types here turn a header row into positions once, so the stages never
//! re-scan headers per row.

use crate::error::{GradeError, Result};
use crate::field::Field;

/// Header cell that marks the first answer column.
pub const FIRST_ANSWER_HEADER: &str = "1";

/// An identity header cell, resolved against the column-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderColumn {
    Known(Field),
    /// A header we do not recognise. Its cells are dropped on load.
    Unknown(String),
}

impl HeaderColumn {
    pub fn resolve(name: &str) -> Self {
        match Field::from_column_name(name) {
            Some(field) => HeaderColumn::Known(field),
            None => HeaderColumn::Unknown(name.to_string()),
        }
    }

    pub fn field(&self) -> Option<Field> {
        match self {
            HeaderColumn::Known(field) => Some(*field),
            HeaderColumn::Unknown(_) => None,
        }
    }
}

/// Index of the first cell literally equal to `name`.
pub fn find_column<S: AsRef<str>>(header: &[S], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell.as_ref() == name)
}

/// Index of the first "1" header cell, searching from the start.
pub fn first_answer_index<S: AsRef<str>>(header: &[S]) -> Result<usize> {
    find_column(header, FIRST_ANSWER_HEADER).ok_or(GradeError::MissingAnswerColumn)
}

/// Positions of the columns the scoring stages care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Index of the "Test Form Code" column.
    pub form_code: usize,
    /// Index of the first answer column.
    pub answer_start: usize,
    /// Index of the "Total Score (%)" column, if present.
    pub score: Option<usize>,
}

impl HeaderLayout {
    /// Parse a header row. `table` names the input in error messages.
    ///
    /// The "1" column is searched for strictly after the form-code column, so
    /// a numeric-looking header before the form code is never taken as the
    /// start of the answers.
    pub fn parse<S: AsRef<str>>(header: &[S], table: &'static str) -> Result<Self> {
        let form_code = find_column(header, Field::TestFormCode.column_name())
            .ok_or(GradeError::InvalidLayout { table })?;
        let answer_start = find_column(&header[form_code + 1..], FIRST_ANSWER_HEADER)
            .map(|offset| offset + form_code + 1)
            .ok_or(GradeError::InvalidLayout { table })?;
        let score = find_column(header, Field::Score.column_name());

        tracing::debug!(table, form_code, answer_start, ?score, "parsed header layout");

        Ok(Self {
            form_code,
            answer_start,
            score,
        })
    }

    /// The score column index, or a `MissingColumn` error.
    pub fn require_score(&self, table: &'static str) -> Result<usize> {
        self.score.ok_or(GradeError::MissingColumn {
            column: Field::Score.column_name(),
            table,
        })
    }

    /// The form code cell of a row, or `""` for a row too short to hold one.
    pub fn form_code_of<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.form_code).map(String::as_str).unwrap_or("")
    }

    /// The answer cells of a row.
    pub fn answers_of<'a>(&self, row: &'a [String]) -> &'a [String] {
        row.get(self.answer_start..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_standard_header() {
        let h = header(&["Last Name", "Test Form Code", "1", "2", "3"]);
        let layout = HeaderLayout::parse(&h, "keys").unwrap();
        assert_eq!(layout.form_code, 1);
        assert_eq!(layout.answer_start, 2);
        assert_eq!(layout.score, None);
    }

    #[test]
    fn ignores_one_before_form_code() {
        let h = header(&["1", "Test Form Code", "Total Score (%)", "1", "2"]);
        let layout = HeaderLayout::parse(&h, "keys").unwrap();
        assert_eq!(layout.form_code, 1);
        assert_eq!(layout.answer_start, 3);
        assert_eq!(layout.score, Some(2));
    }

    #[test]
    fn missing_form_code_is_invalid() {
        let h = header(&["Last Name", "1", "2"]);
        let err = HeaderLayout::parse(&h, "keys").unwrap_err();
        assert!(matches!(err, GradeError::InvalidLayout { table: "keys" }));
    }

    #[test]
    fn one_only_before_form_code_is_invalid() {
        let h = header(&["1", "Test Form Code"]);
        assert!(matches!(
            HeaderLayout::parse(&h, "responses"),
            Err(GradeError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn require_score_reports_missing_column() {
        let h = header(&["Test Form Code", "1"]);
        let layout = HeaderLayout::parse(&h, "scored").unwrap();
        assert!(matches!(
            layout.require_score("scored"),
            Err(GradeError::MissingColumn { .. })
        ));
    }

    #[test]
    fn resolve_header_columns() {
        assert_eq!(
            HeaderColumn::resolve("Student ID"),
            HeaderColumn::Known(Field::StudentId)
        );
        assert_eq!(
            HeaderColumn::resolve("Homeroom"),
            HeaderColumn::Unknown("Homeroom".into())
        );
        assert_eq!(HeaderColumn::resolve("Homeroom").field(), None);
    }

    #[test]
    fn row_accessors_tolerate_short_rows() {
        let h = header(&["Test Form Code", "1", "2"]);
        let layout = HeaderLayout::parse(&h, "responses").unwrap();
        let row = header(&["A"]);
        assert_eq!(layout.form_code_of(&row), "A");
        assert!(layout.answers_of(&row).is_empty());
        assert_eq!(layout.form_code_of(&[]), "");
    }
}
