use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

use super::TabularSource;
use crate::error::SyncError;
use crate::process::RawRow;

/// Service credentials: a bearer token issued for the spreadsheet scope,
/// stored in a small JSON file next to the config.
#[derive(Deserialize)]
struct Credentials {
    token: String,
}

/// The values payload a Sheets-style API returns for a worksheet read.
/// An empty worksheet comes back without the `values` field at all.
#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<RawRow>,
}

/// HTTP client for one spreadsheet on a Sheets-style values API. Blocking
/// calls throughout: the dashboard drives a single synchronous session, so
/// every read and write holds the turn until the service answers.
pub struct RestSource {
    client: Client,
    base: Url,
    spreadsheet_id: String,
    token: String,
}

impl RestSource {
    /// Build a source for one spreadsheet, reading the bearer token from
    /// the JSON credentials file at `credentials_path`.
    pub fn new(
        base_url: &str,
        spreadsheet_id: &str,
        credentials_path: &Path,
    ) -> Result<Self, SyncError> {
        let raw = fs::read_to_string(credentials_path).map_err(|e| {
            SyncError::SourceUnavailable(format!(
                "reading credentials {}: {}",
                credentials_path.display(),
                e
            ))
        })?;
        let credentials: Credentials = serde_json::from_str(&raw)
            .map_err(|e| SyncError::SourceUnavailable(format!("parsing credentials: {}", e)))?;
        let base = Url::parse(base_url).map_err(|e| {
            SyncError::SourceUnavailable(format!("invalid base url {}: {}", base_url, e))
        })?;

        Ok(Self {
            client: Client::new(),
            base,
            spreadsheet_id: spreadsheet_id.to_string(),
            token: credentials.token,
        })
    }

    fn values_url(&self, worksheet: &str, suffix: &str) -> Result<Url, SyncError> {
        values_url(&self.base, &self.spreadsheet_id, worksheet, suffix)
    }
}

fn values_url(
    base: &Url,
    spreadsheet_id: &str,
    worksheet: &str,
    suffix: &str,
) -> Result<Url, SyncError> {
    let path = format!(
        "v4/spreadsheets/{}/values/{}{}",
        spreadsheet_id, worksheet, suffix
    );
    base.join(&path).map_err(|e| {
        SyncError::SourceUnavailable(format!("building url for '{}': {}", worksheet, e))
    })
}

impl TabularSource for RestSource {
    fn read_all(&self, worksheet: &str) -> Result<Vec<RawRow>, SyncError> {
        let url = self.values_url(worksheet, "")?;
        debug!(%url, "fetching worksheet values");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| SyncError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SyncError::SourceUnavailable(format!("status {}", status)))
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(SyncError::TableMissing(worksheet.to_string()))
            }
            s if !s.is_success() => {
                return Err(SyncError::SourceUnavailable(format!("status {}", status)))
            }
            _ => {}
        }

        let range: ValueRange = response.json().map_err(|e| {
            SyncError::SourceUnavailable(format!("decoding values for '{}': {}", worksheet, e))
        })?;
        info!(worksheet, rows = range.values.len(), "fetched worksheet");
        Ok(range.values)
    }

    fn write_all(&self, worksheet: &str, rows: &[RawRow]) -> Result<(), SyncError> {
        let write_failure = |reason: String| SyncError::WriteFailure {
            worksheet: worksheet.to_string(),
            reason,
        };

        // clear first so rows deleted in the editor do not survive as a
        // stale tail past the new data
        let clear_url = self.values_url(worksheet, ":clear")?;
        debug!(%clear_url, "clearing worksheet");
        let response = self
            .client
            .post(clear_url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| write_failure(e.to_string()))?;
        if !response.status().is_success() {
            return Err(write_failure(format!("clear returned {}", response.status())));
        }

        let update_url = self.values_url(worksheet, "")?;
        let response = self
            .client
            .put(update_url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&json!({ "values": rows }))
            .send()
            .map_err(|e| write_failure(e.to_string()))?;
        if !response.status().is_success() {
            return Err(write_failure(format!(
                "update returned {}",
                response.status()
            )));
        }

        info!(worksheet, rows = rows.len(), "wrote worksheet");
        Ok(())
    }
}
