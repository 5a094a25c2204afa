// src/process/mod.rs
//
// The shaping layer between raw worksheet rows and the typed, de-duplicated
// table the presentation layer edits, plus the reverse direction for
// write-back.

pub mod booleans;
pub mod headers;

pub use booleans::coerce_booleans;
pub use headers::normalize_headers;

use tracing::warn;

use crate::table::{Cell, Column, Table};

/// A flat row of string cells, exactly as the remote source delivers and
/// accepts them.
pub type RawRow = Vec<String>;

/// Shape raw worksheet rows into a table.
///
/// The first row is the header, run through the normalizer; every later row
/// becomes one table row with empty cells mapped to `Null`. Ragged rows are
/// shaped deterministically: rows shorter than the header are padded with
/// `Null`, rows longer than the header are truncated to the header width.
/// An empty fetch yields an empty table, never an error.
pub fn parse_rows(raw: Vec<RawRow>) -> Table {
    let mut rows = raw.into_iter();
    let header = match rows.next() {
        Some(h) => h,
        None => return Table::default(),
    };

    let mut columns: Vec<Column> = normalize_headers(&header)
        .into_iter()
        .map(|name| Column {
            name,
            cells: Vec::new(),
        })
        .collect();

    let width = columns.len();
    let mut ragged = 0usize;
    for mut row in rows {
        if row.len() != width {
            ragged += 1;
            row.resize(width, String::new());
        }
        for (column, raw_cell) in columns.iter_mut().zip(row) {
            column.cells.push(Cell::from_raw(raw_cell));
        }
    }
    if ragged > 0 {
        warn!(rows = ragged, "reshaped ragged rows to header width");
    }

    Table::new(columns)
}

/// Flatten a table back into rows for write-back, optionally with a leading
/// header row of column names. Nulls become empty strings and booleans
/// their wire form, so a round trip through `parse_rows` and the coercer
/// reproduces the same values. No I/O happens here.
pub fn serialize_rows(table: &Table, include_header: bool) -> Vec<RawRow> {
    let mut out = Vec::with_capacity(table.row_count() + usize::from(include_header));
    if include_header {
        out.push(table.header());
    }
    for row in 0..table.row_count() {
        out.push(
            table
                .columns()
                .iter()
                .map(|c| c.cells[row].to_string())
                .collect(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<RawRow> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_fetch_is_empty_table() {
        let table = parse_rows(Vec::new());
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn header_normalization_and_nulls() {
        let table = parse_rows(raw(&[&["Name", "", "Name"], &["A", "1", "B"], &["", "2", ""]]));

        assert_eq!(table.header(), vec!["Name", "Unnamed", "Name_1"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("Name").unwrap().cells,
            vec![Cell::Str("A".to_string()), Cell::Null]
        );
        assert_eq!(
            table.column("Unnamed").unwrap().cells,
            vec![Cell::Str("1".to_string()), Cell::Str("2".to_string())]
        );
        assert_eq!(
            table.column("Name_1").unwrap().cells,
            vec![Cell::Str("B".to_string()), Cell::Null]
        );
    }

    #[test]
    fn short_rows_pad_with_null() {
        let table = parse_rows(raw(&[&["A", "B", "C"], &["1"]]));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("A").unwrap().cells, vec![Cell::Str("1".to_string())]);
        assert_eq!(table.column("B").unwrap().cells, vec![Cell::Null]);
        assert_eq!(table.column("C").unwrap().cells, vec![Cell::Null]);
    }

    #[test]
    fn long_rows_truncate_to_header_width() {
        let table = parse_rows(raw(&[&["A", "B"], &["1", "2", "3", "4"]]));
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("A").unwrap().cells, vec![Cell::Str("1".to_string())]);
        assert_eq!(table.column("B").unwrap().cells, vec![Cell::Str("2".to_string())]);
    }

    #[test]
    fn header_only_fetch_has_columns_but_no_rows() {
        let table = parse_rows(raw(&[&["A", "B"]]));
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn serialize_with_and_without_header() {
        let table = parse_rows(raw(&[&["A", "B"], &["1", ""], &["", "2"]]));

        let with_header = serialize_rows(&table, true);
        assert_eq!(
            with_header,
            raw(&[&["A", "B"], &["1", ""], &["", "2"]])
        );

        let without_header = serialize_rows(&table, false);
        assert_eq!(without_header, raw(&[&["1", ""], &["", "2"]]));
    }

    #[test]
    fn round_trip_without_booleans_is_exact() {
        let original = parse_rows(raw(&[
            &["Name", "", "Name"],
            &["A", "1", "B"],
            &["", "x", ""],
        ]));

        let reparsed = parse_rows(serialize_rows(&original, true));
        assert_eq!(reparsed, original);
    }

    #[test]
    fn round_trip_with_booleans_survives_recoercion() {
        let keywords = vec!["INICIO".to_string()];
        let original = coerce_booleans(
            parse_rows(raw(&[&["INICIO", "OPERARIO"], &["x", "Ana"], &["no", "Luis"]])),
            &keywords,
        );
        assert_eq!(
            original.column("INICIO").unwrap().cells,
            vec![Cell::Bool(true), Cell::Bool(false)]
        );

        let reparsed = coerce_booleans(parse_rows(serialize_rows(&original, true)), &keywords);
        assert_eq!(reparsed, original);
    }
}
