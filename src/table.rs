use std::fmt;

/// A single cell value. Everything arrives from the remote source as a
/// string; `Null` stands in for empty cells and `Bool` for cells in columns
/// the coercer has re-tagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Null,
    Str(String),
    Bool(bool),
}

impl Cell {
    /// Map a raw cell as delivered by the remote source; the empty string
    /// marks a null.
    pub fn from_raw(raw: String) -> Self {
        if raw.is_empty() {
            Cell::Null
        } else {
            Cell::Str(raw)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// Wire form: nulls collapse to the empty string, booleans to the sheet
/// convention `TRUE`/`FALSE`, which the coercer recognizes on the way back.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Str(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("TRUE"),
            Cell::Bool(false) => f.write_str("FALSE"),
        }
    }
}

/// One named column; cells are aligned by row index across the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// An ordered set of named columns with identical row counts — the unit the
/// shaping pipeline operates on. A table is rebuilt fresh on every
/// fetch-and-parse cycle rather than retained across a write-back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Columns must already be aligned (equal cell counts) and uniquely
    /// named; the parse pipeline guarantees both.
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(columns
            .windows(2)
            .all(|w| w[0].cells.len() == w[1].cells.len()));
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// True when there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in order, for the leading header row on write-back.
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
