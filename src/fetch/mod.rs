// src/fetch/mod.rs
//
// The remote boundary: a trait for the spreadsheet-style service the
// dashboard edits, an HTTP implementation of it, and the TTL cache that
// sits in front of the read path.

pub mod cache;
pub mod rest;

pub use cache::FetchCache;
pub use rest::RestSource;

use crate::error::SyncError;
use crate::process::RawRow;

/// A remote tabular source addressed by worksheet name, speaking flat rows
/// of strings in both directions. Authentication, connection setup, and any
/// retry policy live behind this trait; the shaping pipeline never does I/O
/// itself.
pub trait TabularSource {
    /// Every row of the named worksheet, header row first. An empty
    /// worksheet is an empty row list, not an error.
    fn read_all(&self, worksheet: &str) -> Result<Vec<RawRow>, SyncError>;

    /// Replace the named worksheet's contents with `rows`.
    fn write_all(&self, worksheet: &str, rows: &[RawRow]) -> Result<(), SyncError>;
}
