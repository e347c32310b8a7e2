//! Render- and export-neutral tabular view.
//!
//! Every dataset (search result, historical series, curve) converts into a
//! `Table` before it is printed or exported, so the console and the exporter
//! only ever deal with one shape.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A single typed table value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Missing and NaN values both become `Empty`.
    pub fn number(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value, if the cell holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// True for number-like cells (used for right alignment and typed export).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Number(_) | Cell::Integer(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v:.2}"),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    index: Option<Cell>,
    cells: Vec<Cell>,
}

/// Titled table with an optional index column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    title: Option<String>,
    index_name: Option<String>,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            index_name: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Show an index column with the given header.
    pub fn with_index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Append a row. The index value is dropped when the table has no index column.
    pub fn push_row(&mut self, index: Option<Cell>, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.headers.len(), "row width mismatch");
        let index = if self.index_name.is_some() {
            Some(index.unwrap_or(Cell::Empty))
        } else {
            None
        };
        self.rows.push(Row { index, cells });
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index value of a row, if the table has an index column.
    pub fn index_at(&self, row: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.index.as_ref())
    }

    /// Data cells of a row (index excluded).
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(|r| r.cells.as_slice())
    }

    /// Header names including the index column, if shown.
    pub fn column_names(&self) -> Vec<String> {
        self.index_name
            .iter()
            .cloned()
            .chain(self.headers.iter().cloned())
            .collect()
    }

    /// Rows including the index value as the first cell, if shown.
    pub fn records(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| r.index.iter().cloned().chain(r.cells.iter().cloned()).collect())
            .collect()
    }
}
