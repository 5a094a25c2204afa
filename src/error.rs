use thiserror::Error;

/// Failures crossing the remote-source boundary.
///
/// Ragged rows and uncoercible columns deliberately have no variant here:
/// the adapter shapes the former deterministically and the coercer logs and
/// skips the latter. Variants are cloneable so a degraded worksheet can
/// carry its cause alongside an empty table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Authentication or connection failure against the remote source.
    #[error("spreadsheet source unavailable: {0}")]
    SourceUnavailable(String),

    /// The named worksheet does not exist in the spreadsheet.
    #[error("worksheet '{0}' not found")]
    TableMissing(String),

    /// The remote write was rejected (permission, network, quota). The
    /// in-memory edited table is untouched, so the save can be retried.
    #[error("writing worksheet '{worksheet}' failed: {reason}")]
    WriteFailure { worksheet: String, reason: String },
}
