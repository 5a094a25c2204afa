use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

use crate::table::{Cell, Column, Table};

/// Cell strings recognized as true, compared after trim + lowercase.
static TRUTHY_TOKENS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["true", "yes", "1", "x", "✓"].into_iter().collect());

/// True if the raw cell text is one of the recognized truthy tokens.
fn is_truthy(raw: &str) -> bool {
    TRUTHY_TOKENS.contains(raw.trim().to_lowercase().as_str())
}

/// Re-tag every column whose upper-cased name contains one of `keywords`
/// (also upper-cased) as a boolean column. Cells matching the truthy
/// vocabulary become `true`; everything else — nulls included — `false`.
///
/// Non-matching columns keep their values untouched, and a matching column
/// that cannot be coerced (it already holds booleans) is logged and skipped
/// rather than failing the pass.
pub fn coerce_booleans(table: Table, keywords: &[String]) -> Table {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_uppercase()).collect();

    let columns = table
        .into_columns()
        .into_iter()
        .map(|column| {
            let name_upper = column.name.to_uppercase();
            if !keywords.iter().any(|k| name_upper.contains(k.as_str())) {
                return column;
            }
            if column.cells.iter().any(|c| matches!(c, Cell::Bool(_))) {
                debug!(column = %column.name, "column already boolean, skipping");
                return column;
            }

            let cells = column
                .cells
                .into_iter()
                .map(|cell| {
                    let truthy = match &cell {
                        Cell::Str(s) => is_truthy(s),
                        Cell::Null => false,
                        Cell::Bool(b) => *b,
                    };
                    Cell::Bool(truthy)
                })
                .collect();
            Column {
                name: column.name,
                cells,
            }
        })
        .collect();

    Table::new(columns)
}
