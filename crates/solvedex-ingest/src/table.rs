//! Tabular views over lookup records

use serde_json::Value;
use solvedex_common::{Result, SolvedexError};
use std::collections::HashSet;
use std::io::Write;

use crate::Record;

/// Numeric columns kept in the projected table, in output order
pub const PROJECTION_COLUMNS: [&str; 4] = [
    "acceptedUserCount",
    "level",
    "votedUserCount",
    "averageTries",
];

/// Column-oriented view of a record sequence
///
/// Rows follow the input order. A cell is `None` when its record has no such
/// field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    /// Build a table whose columns are every key seen, in first-seen order
    pub fn from_records(records: &[Record]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for key in records.iter().flat_map(|record| record.keys()) {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }

        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| record.get(c).cloned()).collect())
            .collect();

        Self { columns, rows }
    }

    /// Build a table restricted to `columns`.
    ///
    /// Every record must carry every requested field; a field holding `null`
    /// counts as present. The first gap is reported as
    /// [`SolvedexError::MissingField`].
    pub fn project(records: &[Record], columns: &[&str]) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let cells = columns
                .iter()
                .map(|&field| {
                    record
                        .get(field)
                        .cloned()
                        .map(Some)
                        .ok_or_else(|| SolvedexError::MissingField {
                            row,
                            field: field.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }

        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row` in the column named `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)?.as_ref()
    }

    /// Write a header row followed by one line per row.
    ///
    /// A table without columns writes nothing, even when it has rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(row.iter().map(|cell| render_cell(cell.as_ref())))?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Text form of a cell in CSV output.
///
/// Strings are written raw and numbers exactly as JSON spells them, so `5`
/// stays `5`. Nested arrays and objects are written as compact JSON; missing
/// and `null` cells are empty.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested) => nested.to_string(),
    }
}
