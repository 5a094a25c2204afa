use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::fetch::{FetchCache, TabularSource};
use crate::process::{coerce_booleans, parse_rows, serialize_rows};
use crate::table::Table;

/// One worksheet as the presentation layer should show it: possibly empty,
/// with the reason attached when the load was degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetState {
    pub name: String,
    pub table: Table,
    pub error: Option<SyncError>,
}

/// Everything one load cycle produced, plus when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sheets: Vec<SheetState>,
    pub fetched_at: DateTime<Utc>,
}

/// A single editing session against one spreadsheet.
///
/// Fetches the configured worksheets through a TTL cache, shapes them for
/// display (parse, then boolean coercion), and writes edited tables back.
/// The cache is owned here, one per remote source identity, so separate
/// sessions in one process never share state.
pub struct Session<S> {
    source: S,
    worksheets: Vec<String>,
    boolean_keywords: Vec<String>,
    cache: FetchCache<Snapshot>,
}

impl<S: TabularSource> Session<S> {
    pub fn new(
        source: S,
        worksheets: Vec<String>,
        boolean_keywords: Vec<String>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            source,
            worksheets,
            boolean_keywords,
            cache: FetchCache::new(cache_ttl),
        }
    }

    /// Current tables, served from cache while fresh.
    ///
    /// Worksheets are fetched independently: a missing sheet degrades to an
    /// empty table with its error recorded while the others still load.
    /// Only a source-level failure (auth, connection) aborts the whole
    /// load, and such a failure is never cached.
    pub fn load(&mut self) -> Result<Snapshot, SyncError> {
        let source = &self.source;
        let worksheets = &self.worksheets;
        let keywords = &self.boolean_keywords;
        self.cache
            .get_or_fetch(|| fetch_snapshot(source, worksheets, keywords))
    }

    /// Forget the cached tables; the next `load` hits the remote again.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    /// Write an edited table back to its worksheet, header row included.
    ///
    /// On success the cache is dropped so the next load sees the remote as
    /// authoritative again; on failure the caller keeps its edited table
    /// and can simply retry.
    pub fn save(&mut self, worksheet: &str, table: &Table) -> Result<(), SyncError> {
        let rows = serialize_rows(table, true);
        self.source.write_all(worksheet, &rows)?;
        info!(worksheet, rows = table.row_count(), "saved worksheet");
        self.cache.invalidate();
        Ok(())
    }
}

fn fetch_snapshot<S: TabularSource>(
    source: &S,
    worksheets: &[String],
    keywords: &[String],
) -> Result<Snapshot, SyncError> {
    let mut sheets = Vec::with_capacity(worksheets.len());
    for name in worksheets {
        match source.read_all(name) {
            Ok(rows) => {
                let table = coerce_booleans(parse_rows(rows), keywords);
                info!(worksheet = %name, rows = table.row_count(), "loaded worksheet");
                sheets.push(SheetState {
                    name: name.clone(),
                    table,
                    error: None,
                });
            }
            Err(err @ SyncError::SourceUnavailable(_)) => return Err(err),
            Err(err) => {
                warn!(worksheet = %name, error = %err, "worksheet load degraded");
                sheets.push(SheetState {
                    name: name.clone(),
                    table: Table::default(),
                    error: Some(err),
                });
            }
        }
    }

    Ok(Snapshot {
        sheets,
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RawRow;
    use crate::table::Cell;
    use std::cell::{Cell as StdCell, RefCell};
    use std::collections::HashMap;

    /// In-memory stand-in for the remote service.
    struct FakeSource {
        worksheets: RefCell<HashMap<String, Vec<RawRow>>>,
        reads: StdCell<usize>,
        unavailable: StdCell<bool>,
        fail_writes: StdCell<bool>,
    }

    impl FakeSource {
        fn new(worksheets: &[(&str, &[&[&str]])]) -> Self {
            let map = worksheets
                .iter()
                .map(|(name, rows)| {
                    let rows: Vec<RawRow> = rows
                        .iter()
                        .map(|r| r.iter().map(|s| s.to_string()).collect())
                        .collect();
                    (name.to_string(), rows)
                })
                .collect();
            Self {
                worksheets: RefCell::new(map),
                reads: StdCell::new(0),
                unavailable: StdCell::new(false),
                fail_writes: StdCell::new(false),
            }
        }
    }

    impl TabularSource for FakeSource {
        fn read_all(&self, worksheet: &str) -> Result<Vec<RawRow>, SyncError> {
            if self.unavailable.get() {
                return Err(SyncError::SourceUnavailable("offline".to_string()));
            }
            self.reads.set(self.reads.get() + 1);
            self.worksheets
                .borrow()
                .get(worksheet)
                .cloned()
                .ok_or_else(|| SyncError::TableMissing(worksheet.to_string()))
        }

        fn write_all(&self, worksheet: &str, rows: &[RawRow]) -> Result<(), SyncError> {
            if self.fail_writes.get() {
                return Err(SyncError::WriteFailure {
                    worksheet: worksheet.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.worksheets
                .borrow_mut()
                .insert(worksheet.to_string(), rows.to_vec());
            Ok(())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn session(source: FakeSource, worksheets: &[&str]) -> Session<FakeSource> {
        Session::new(
            source,
            names(worksheets),
            names(&["INICIO"]),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn load_parses_and_coerces_each_worksheet() {
        let source = FakeSource::new(&[(
            "ops",
            &[&["OPERARIO", "INICIO"], &["Ana", "x"], &["Luis", ""]],
        )]);
        let mut session = session(source, &["ops"]);

        let snapshot = session.load().unwrap();
        assert_eq!(snapshot.sheets.len(), 1);

        let sheet = &snapshot.sheets[0];
        assert!(sheet.error.is_none());
        assert_eq!(
            sheet.table.column("INICIO").unwrap().cells,
            vec![Cell::Bool(true), Cell::Bool(false)]
        );
        assert_eq!(
            sheet.table.column("OPERARIO").unwrap().cells,
            vec![Cell::Str("Ana".to_string()), Cell::Str("Luis".to_string())]
        );
    }

    #[test]
    fn missing_worksheet_degrades_without_blocking_the_other() {
        let source = FakeSource::new(&[("present", &[&["A"], &["1"]])]);
        let mut session = session(source, &["present", "absent"]);

        let snapshot = session.load().unwrap();
        assert_eq!(snapshot.sheets.len(), 2);

        assert!(snapshot.sheets[0].error.is_none());
        assert_eq!(snapshot.sheets[0].table.row_count(), 1);

        let degraded = &snapshot.sheets[1];
        assert!(degraded.table.is_empty());
        assert_eq!(
            degraded.error,
            Some(SyncError::TableMissing("absent".to_string()))
        );
    }

    #[test]
    fn loads_within_ttl_hit_the_cache() {
        let source = FakeSource::new(&[("ops", &[&["A"], &["1"]])]);
        let mut session = session(source, &["ops"]);

        session.load().unwrap();
        session.load().unwrap();
        assert_eq!(session.source.reads.get(), 1);

        session.refresh();
        session.load().unwrap();
        assert_eq!(session.source.reads.get(), 2);
    }

    #[test]
    fn unavailable_source_fails_the_load_and_is_not_cached() {
        let source = FakeSource::new(&[("ops", &[&["A"], &["1"]])]);
        source.unavailable.set(true);
        let mut session = session(source, &["ops"]);

        assert_eq!(
            session.load(),
            Err(SyncError::SourceUnavailable("offline".to_string()))
        );

        // service comes back; the failure must not have been memoized
        session.source.unavailable.set(false);
        let snapshot = session.load().unwrap();
        assert_eq!(snapshot.sheets[0].table.row_count(), 1);
    }

    #[test]
    fn save_writes_header_and_wire_rows_then_invalidates() {
        let source = FakeSource::new(&[("ops", &[&["OPERARIO", "INICIO"], &["Ana", "x"]])]);
        let mut session = session(source, &["ops"]);

        let snapshot = session.load().unwrap();
        assert_eq!(session.source.reads.get(), 1);

        session.save("ops", &snapshot.sheets[0].table).unwrap();

        let written = session.source.worksheets.borrow().get("ops").cloned().unwrap();
        assert_eq!(written[0], vec!["OPERARIO", "INICIO"]);
        assert_eq!(written[1], vec!["Ana", "TRUE"]);

        // next load refetches the now-authoritative remote
        session.load().unwrap();
        assert_eq!(session.source.reads.get(), 2);
    }

    #[test]
    fn failed_save_surfaces_write_failure_and_keeps_the_cache() {
        let source = FakeSource::new(&[("ops", &[&["A"], &["1"]])]);
        let mut session = session(source, &["ops"]);

        let snapshot = session.load().unwrap();
        session.source.fail_writes.set(true);

        let err = session.save("ops", &snapshot.sheets[0].table);
        assert!(matches!(err, Err(SyncError::WriteFailure { .. })));

        // the cached snapshot is still fresh; no refetch happens
        session.load().unwrap();
        assert_eq!(session.source.reads.get(), 1);
    }
}
