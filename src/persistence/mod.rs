//! Persistence layer (C6, §4.8): the tabular/dated SQLite store plus the
//! file-store artifact tree, both keyed by `(date, ecosystem, name)` or
//! `(date)`. Every write for a given date is transactional and replaces
//! that date's prior contents — a second `run-all` for the same day
//! produces identical output, never duplicate rows.

mod file_store;
mod store;

pub use file_store::FileStore;
pub use store::Store;

use crate::error::Result;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// Default location of the SQLite database, under the OS data directory.
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("phantomscan")
        .join("phantomscan.sqlite3")
}

/// Default root of the file store, `./` by convention (`feeds/`, `raw/`,
/// `processed/` are created relative to the working directory).
#[must_use]
pub fn default_file_store_root() -> PathBuf {
    PathBuf::from(".")
}

/// Delete rows and file-store directories older than `retention_days`
/// relative to today (§4.8, "retention is policy-driven").
pub fn cleanup_old_data(store: &mut Store, files: &FileStore, retention_days: i64) -> Result<()> {
    let cutoff = Utc::now().date_naive() - chrono::Duration::days(retention_days.max(0));
    let known_dates = store.get_all_dates()?;
    store.delete_older_than(cutoff)?;
    files.delete_older_than(cutoff, &known_dates)?;
    Ok(())
}

/// Parse a `--date` CLI flag (`YYYY-MM-DD`), defaulting to today when absent.
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| crate::error::PhantomScanError::validation(format!("invalid --date {s:?}: {e}"))),
        None => Ok(Utc::now().date_naive()),
    }
}
