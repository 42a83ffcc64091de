//! File-store report generators (C6, §4.8): the per-day artifacts written
//! under `feeds/{date}/` — `topN.json`/`topN.csv` for the ranked feed,
//! `watchlist.json`/`watchlist.csv` for names that didn't resolve in their
//! registry, and `feed.md` for a human-readable summary.
//!
//! # Security
//!
//! The `escape` module provides utilities for safe output generation. All
//! untrusted registry data (package names, descriptions, reasons) is
//! escaped before embedding in Markdown.

pub mod csv;
pub mod escape;
pub mod json;
pub mod markdown;

use crate::error::{PhantomScanError, Result};
use std::fs;
use std::path::Path;

/// Write `contents` to `path`, creating parent directories as needed.
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PhantomScanError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| PhantomScanError::io(path, e))
}
