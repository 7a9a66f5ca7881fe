use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::{AppPaths, UNIT_CODE, UNIT_COLUMN};
use crate::data::loader::{read_csv, write_table};
use crate::data::model::Table;
use crate::error::DownloadError;

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Source of raw dataset bytes for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Blocking HTTP GET with a fixed timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DownloadError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let request_error = |e: reqwest::Error| DownloadError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?;
        let body = response.bytes().map_err(request_error)?;
        Ok(body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Download pipeline
// ---------------------------------------------------------------------------

/// Result of refreshing one year.
#[derive(Debug)]
pub struct YearOutcome {
    pub year: String,
    /// Rows written to the local file.
    pub result: Result<usize, DownloadError>,
}

/// Refresh every configured year in order. A failing year is logged and
/// skipped; the others still run.
pub fn download_all(
    fetcher: &impl Fetcher,
    sources: &BTreeMap<String, String>,
    paths: &AppPaths,
) -> Vec<YearOutcome> {
    if sources.is_empty() {
        log::warn!("No data sources configured");
        return Vec::new();
    }
    if let Err(e) = paths.ensure_data_dir() {
        log::error!("Could not create {}: {e}", paths.data_dir.display());
    }

    sources
        .iter()
        .map(|(year, url)| {
            log::info!("Downloading data for {year}...");
            let result = download_year(fetcher, year, url, paths);
            match &result {
                Ok(rows) => log::info!("Saved {rows} rows for {year}"),
                Err(e) => log::error!("Error downloading data for {year}: {e}"),
            }
            YearOutcome {
                year: year.clone(),
                result,
            }
        })
        .collect()
}

/// Fetch one year, narrow it to the unit code and overwrite its local file.
pub fn download_year(
    fetcher: &impl Fetcher,
    year: &str,
    url: &str,
    paths: &AppPaths,
) -> Result<usize, DownloadError> {
    let body = fetcher.fetch(url)?;
    let text = String::from_utf8_lossy(&body);
    let mut table = read_csv(text.as_bytes()).map_err(DownloadError::Parse)?;

    log::info!(
        "{year}: {} rows downloaded, filtering by {UNIT_COLUMN} {UNIT_CODE}",
        table.len()
    );
    keep_unit_rows(&mut table);

    let path = paths.year_file(year);
    write_table(&path, &table).map_err(|cause| DownloadError::Write {
        path: path.clone(),
        cause,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(table.len())
}

/// Keep only rows of the fixed unit code. Without a unit column every row is
/// kept and a warning is logged. Returns whether the filter applied.
pub fn keep_unit_rows(table: &mut Table) -> bool {
    match table.retain_equal(UNIT_COLUMN, UNIT_CODE) {
        Some(_) => true,
        None => {
            log::warn!("Column '{UNIT_COLUMN}' not found, keeping all rows");
            false
        }
    }
}
