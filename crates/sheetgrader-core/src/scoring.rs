//! Key matching and scoring.
//!
//! Each response row is matched to the answer key with the same form code and
//! graded question by question. A response whose form code has no key is not
//! an error: it gets the [`KEY_NOT_FOUND`] score and no answer cells, and the
//! rest of the batch is scored normally.

use std::collections::HashMap;

use crate::error::Result;
use crate::field::Field;
use crate::layout::HeaderLayout;
use crate::sheet::TabularSheet;
use crate::KEY_NOT_FOUND;

/// Form code → correct answers, question 1 at index 0.
pub type KeyDictionary = HashMap<String, Vec<String>>;

/// Options for [`score_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOptions {
    /// Add a "Total Points" column holding the number of correct answers.
    pub include_points: bool,
}

/// Build the key dictionary from a sheet of answer keys.
///
/// If two key rows share a form code, the later one wins.
pub fn build_key_dictionary(keys: &TabularSheet) -> Result<KeyDictionary> {
    let layout = HeaderLayout::parse(keys.header(), "key")?;

    let mut dictionary = KeyDictionary::new();
    for row in keys.rows() {
        let form_code = layout.form_code_of(row);
        let answers = layout.answers_of(row).to_vec();
        if dictionary.insert(form_code.to_string(), answers).is_some() {
            tracing::warn!(form_code, "duplicate answer key, using the later row");
        }
    }

    tracing::debug!(forms = dictionary.len(), "built key dictionary");
    Ok(dictionary)
}

/// Compare responses against a key position by position. Positions past the
/// end of the shorter list are dropped.
pub fn grade_answers(responses: &[String], key: &[String]) -> Vec<bool> {
    responses
        .iter()
        .zip(key)
        .map(|(actual, correct)| actual == correct)
        .collect()
}

/// Fraction of `true` values, or 0 for an empty slice.
pub fn mean(outcomes: &[bool]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|&&b| b).count() as f64 / outcomes.len() as f64
}

/// Render a score rounded to four decimal places, keeping at least one
/// fractional digit ("1.0", "0.5", "0.6667").
///
/// Rounding is done on the exact binary value with ties to even, so 1/32
/// renders as "0.0312".
pub fn format_score(fraction: f64) -> String {
    let text = format!("{fraction:.4}");
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

fn outcome_cell(correct: bool) -> String {
    if correct { "True" } else { "False" }.to_string()
}

/// Score every response against its key. See [`score_with`].
pub fn score(responses: &TabularSheet, keys: &TabularSheet) -> Result<TabularSheet> {
    score_with(responses, keys, &ScoreOptions::default())
}

/// Score every response against the key for its form code.
///
/// The result has the response sheet's columns plus "Total Score (%)" (and
/// "Total Points" when requested). Its answer cells are "True"/"False" per
/// question. Rows keep their order.
pub fn score_with(
    responses: &TabularSheet,
    keys: &TabularSheet,
    options: &ScoreOptions,
) -> Result<TabularSheet> {
    let dictionary = build_key_dictionary(keys)?;
    let layout = HeaderLayout::parse(responses.header(), "response")?;

    // Scores from an earlier run are replaced, never duplicated.
    let mut columns: Vec<Field> = responses
        .columns()
        .iter()
        .copied()
        .filter(|f| !f.is_virtual())
        .collect();
    columns.push(Field::Score);
    if options.include_points {
        columns.push(Field::Points);
    }
    let mut scored = TabularSheet::new(columns, responses.num_questions());

    let mut unmatched = 0usize;
    for row in responses.rows() {
        let identity = &row[..layout.answer_start.min(row.len())];
        let mut fields: HashMap<Field, String> = responses
            .columns()
            .iter()
            .copied()
            .zip(identity.iter().cloned())
            .collect();

        let form_code = layout.form_code_of(row);
        let answers = match dictionary.get(form_code) {
            None => {
                tracing::warn!(form_code, "no answer key for form code");
                unmatched += 1;
                fields.insert(Field::Score, KEY_NOT_FOUND.to_string());
                fields.remove(&Field::Points);
                Vec::new()
            }
            Some(key) => {
                let outcomes = grade_answers(layout.answers_of(row), key);
                fields.insert(Field::Score, format_score(mean(&outcomes)));
                if options.include_points {
                    let points = outcomes.iter().filter(|&&b| b).count();
                    fields.insert(Field::Points, points.to_string());
                }
                outcomes.into_iter().map(outcome_cell).collect()
            }
        };
        scored.add(&fields, answers);
    }

    tracing::info!(rows = scored.row_count(), unmatched, "scored responses");
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeError;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn keys_sheet(rows: &[(&str, &[&str])]) -> TabularSheet {
        let mut sheet = TabularSheet::new(vec![Field::TestFormCode], 3);
        for (code, answers) in rows {
            let fields = HashMap::from([(Field::TestFormCode, code.to_string())]);
            sheet.add(&fields, strings(answers));
        }
        sheet
    }

    fn responses_sheet(rows: &[(&str, &str, &[&str])]) -> TabularSheet {
        let mut sheet = TabularSheet::new(vec![Field::StudentId, Field::TestFormCode], 3);
        for (id, code, answers) in rows {
            let fields = HashMap::from([
                (Field::StudentId, id.to_string()),
                (Field::TestFormCode, code.to_string()),
            ]);
            sheet.add(&fields, strings(answers));
        }
        sheet
    }

    #[test]
    fn format_score_matches_decimal_rendering() {
        assert_eq!(format_score(2.0 / 3.0), "0.6667");
        assert_eq!(format_score(1.0 / 3.0), "0.3333");
        assert_eq!(format_score(0.5), "0.5");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.12346), "0.1235");
    }

    #[test]
    fn format_score_ties_round_to_even() {
        assert_eq!(format_score(1.0 / 32.0), "0.0312");
        assert_eq!(format_score(5.0 / 32.0), "0.1562");
        assert_eq!(format_score(9.0 / 32.0), "0.2812");
        assert_eq!(format_score(3.0 / 32.0), "0.0938");
    }

    #[test]
    fn format_score_of_mean_over_32_answers() {
        let mut outcomes = vec![false; 32];
        outcomes[0] = true;
        assert_eq!(format_score(mean(&outcomes)), "0.0312");
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[true, false, true, true]), 0.75);
    }

    #[test]
    fn grade_answers_drops_extra_positions() {
        let outcomes = grade_answers(&strings(&["A", "B", "C"]), &strings(&["A", "X"]));
        assert_eq!(outcomes, vec![true, false]);
    }

    #[test]
    fn key_dictionary_maps_form_codes() {
        let keys = keys_sheet(&[("A", &["A", "B", "C"]), ("B", &["D", "D", "D"])]);
        let dictionary = build_key_dictionary(&keys).unwrap();
        assert_eq!(dictionary["A"], strings(&["A", "B", "C"]));
        assert_eq!(dictionary["B"], strings(&["D", "D", "D"]));
    }

    #[test]
    fn key_dictionary_requires_form_code_column() {
        let keys = TabularSheet::new(vec![Field::StudentId], 2);
        let err = build_key_dictionary(&keys).unwrap_err();
        assert!(matches!(err, GradeError::InvalidLayout { table: "key" }));
    }

    #[test]
    fn duplicate_form_code_uses_later_key() {
        let keys = keys_sheet(&[("A", &["A", "A", "A"]), ("A", &["B", "B", "B"])]);
        let dictionary = build_key_dictionary(&keys).unwrap();
        assert_eq!(dictionary["A"], strings(&["B", "B", "B"]));
    }

    #[test]
    fn score_partial_match() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let responses = responses_sheet(&[("1", "F", &["A", "X", "C"])]);
        let scored = score(&responses, &keys).unwrap();

        assert_eq!(
            scored.header(),
            strings(&["Student ID", "Test Form Code", "Total Score (%)", "1", "2", "3"])
        );
        assert_eq!(
            scored.rows()[0],
            strings(&["1", "F", "0.6667", "True", "False", "True"])
        );
    }

    #[test]
    fn score_unknown_form_code_uses_sentinel() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let responses = responses_sheet(&[("1", "Q", &["A", "B", "C"])]);
        let scored = score(&responses, &keys).unwrap();
        assert_eq!(scored.rows()[0], strings(&["1", "Q", KEY_NOT_FOUND]));
    }

    #[test]
    fn score_continues_past_unmatched_rows_in_order() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let responses = responses_sheet(&[
            ("1", "F", &["A", "B", "C"]),
            ("2", "Q", &["A", "B", "C"]),
            ("3", "F", &["D", "D", "D"]),
        ]);
        let scored = score(&responses, &keys).unwrap();
        let scores: Vec<&str> = scored.rows().iter().map(|r| r[2].as_str()).collect();
        assert_eq!(scores, vec!["1.0", KEY_NOT_FOUND, "0.0"]);
        let ids: Vec<&str> = scored.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn score_with_points() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let responses = responses_sheet(&[
            ("1", "F", &["A", "B", "D"]),
            ("2", "Z", &["A", "B", "C"]),
        ]);
        let options = ScoreOptions {
            include_points: true,
        };
        let scored = score_with(&responses, &keys, &options).unwrap();
        assert_eq!(scored.header()[3], "Total Points");
        assert_eq!(
            scored.rows()[0],
            strings(&["1", "F", "0.6667", "2", "True", "True", "False"])
        );
        assert_eq!(scored.rows()[1], strings(&["2", "Z", KEY_NOT_FOUND, ""]));
    }

    #[test]
    fn rescoring_replaces_previous_score_columns() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let mut previous = TabularSheet::new(
            vec![Field::StudentId, Field::TestFormCode, Field::Score, Field::Points],
            3,
        );
        let fields = HashMap::from([
            (Field::StudentId, "1".to_string()),
            (Field::TestFormCode, "F".to_string()),
            (Field::Score, "0.1".to_string()),
            (Field::Points, "9".to_string()),
        ]);
        previous.add(&fields, strings(&["A", "B", "X"]));

        let scored = score(&previous, &keys).unwrap();
        assert_eq!(
            scored.header(),
            strings(&["Student ID", "Test Form Code", "Total Score (%)", "1", "2", "3"])
        );
        assert_eq!(
            scored.rows()[0],
            strings(&["1", "F", "0.6667", "True", "True", "False"])
        );
    }

    #[test]
    fn score_requires_response_form_code() {
        let keys = keys_sheet(&[("F", &["A", "B", "C"])]);
        let responses = TabularSheet::new(vec![Field::StudentId], 3);
        let err = score(&responses, &keys).unwrap_err();
        assert!(matches!(err, GradeError::InvalidLayout { table: "response" }));
    }
}
