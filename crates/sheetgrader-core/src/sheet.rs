//! The tabular sheet shared by every stage.
//!
//! A sheet is a header row followed by data rows. The header is the column
//! names of the sheet's identity fields followed by "1".."N". Rows keep their
//! insertion order from load through scoring, reordering and save.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{GradeError, Result};
use crate::field::Field;
use crate::layout::{first_answer_index, HeaderColumn};

/// An ordered matrix of strings over a fixed set of identity columns plus
/// `num_questions` answer columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularSheet {
    columns: Vec<Field>,
    num_questions: usize,
    /// Row 0 is the header.
    data: Vec<Vec<String>>,
}

impl TabularSheet {
    /// Create an empty sheet holding only the header row.
    pub fn new(columns: Vec<Field>, num_questions: usize) -> Self {
        let header = columns
            .iter()
            .map(|c| c.column_name().to_string())
            .chain((1..=num_questions).map(|i| i.to_string()))
            .collect();
        Self {
            columns,
            num_questions,
            data: vec![header],
        }
    }

    /// Build a sheet whose identity columns are the recognised headers of
    /// `rows[0]`, then load the remaining rows into it.
    pub fn from_rows<I>(rows: I, num_questions: usize) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(GradeError::EmptyTable)?;
        let first_answer = first_answer_index(&header)?;

        let mut columns: Vec<Field> = Vec::new();
        for name in &header[..first_answer] {
            if let Some(field) = HeaderColumn::resolve(name).field() {
                if !columns.contains(&field) {
                    columns.push(field);
                }
            }
        }

        let mut sheet = Self::new(columns, num_questions);
        sheet.load_rows(std::iter::once(header).chain(rows))?;
        Ok(sheet)
    }

    /// Read a CSV file into a new sheet, taking its columns from the file.
    pub fn from_csv_path(path: &Path, num_questions: usize) -> Result<Self> {
        let records = read_records(File::open(path)?)?;
        Self::from_rows(records, num_questions)
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    pub fn header(&self) -> &[String] {
        &self.data[0]
    }

    /// Data rows, without the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.data[1..]
    }

    pub fn row_count(&self) -> usize {
        self.data.len() - 1
    }

    /// Append one row. Identity fields missing from `fields` become empty
    /// cells. `answers` is appended as given; its length is not checked.
    pub fn add(&mut self, fields: &HashMap<Field, String>, answers: Vec<String>) {
        let mut row: Vec<String> = self
            .columns
            .iter()
            .map(|c| fields.get(c).cloned().unwrap_or_default())
            .collect();
        row.extend(answers);
        self.data.push(row);
    }

    /// A sheet with this sheet's columns and header but no data rows.
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            num_questions: self.num_questions,
            data: vec![self.data[0].clone()],
        }
    }

    /// Append a fully formed row verbatim.
    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.data.push(row);
    }

    /// Append rows from a header-tagged table. The first row must be a header
    /// containing a "1" column. Everything before it is an identity column,
    /// everything from it on is an answer. Identity headers that are not
    /// known fields are dropped. Returns the number of rows added.
    pub fn load_rows<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(GradeError::EmptyTable)?;
        let first_answer = first_answer_index(&header)?;

        let keys: Vec<HeaderColumn> = header[..first_answer]
            .iter()
            .map(|name| HeaderColumn::resolve(name))
            .collect();
        for key in &keys {
            if let HeaderColumn::Unknown(name) = key {
                tracing::warn!(column = %name, "dropping unrecognised column");
            }
        }

        let mut added = 0;
        for mut row in rows {
            let split = first_answer.min(row.len());
            let answers = row.split_off(split);
            let fields: HashMap<Field, String> = keys
                .iter()
                .zip(row)
                .filter_map(|(key, value)| key.field().map(|f| (f, value)))
                .collect();
            self.add(&fields, answers);
            added += 1;
        }

        tracing::debug!(rows = added, "loaded rows");
        Ok(added)
    }

    /// Append rows from CSV text.
    pub fn load_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        self.load_rows(read_records(reader)?)
    }

    /// Append rows from a CSV file.
    pub fn add_file(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        self.load_csv(BufReader::new(file))
    }

    /// Write the header and all rows as CSV. Rows of differing width (such as
    /// rows scored without a key) are written as they are.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        for row in &self.data {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Save the sheet as a CSV file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

/// Read every CSV record as a row of strings. No header handling, and rows
/// may differ in width. A leading byte-order mark is stripped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    Ok(rows)
}

/// Read a CSV file with [`read_records`].
pub fn read_records_from_path(path: &Path) -> Result<Vec<Vec<String>>> {
    read_records(BufReader::new(File::open(path)?))
}
