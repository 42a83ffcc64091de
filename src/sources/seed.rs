//! Offline seed files: canned newline-delimited JSON, one raw registry
//! record per line, parsed with the same parser the live path uses.

use crate::model::Ecosystem;
use std::path::PathBuf;

/// Path to the seed file for one ecosystem. Resolution order: the
/// `PHANTOMSCAN_SEED_DIR` environment variable, then `./seeds/`.
#[must_use]
pub fn seed_path(ecosystem: Ecosystem) -> PathBuf {
    let dir = std::env::var("PHANTOMSCAN_SEED_DIR").unwrap_or_else(|_| "seeds".to_string());
    PathBuf::from(dir).join(format!("{}.ndjson", ecosystem.as_str()))
}

/// Parse newline-delimited JSON, skipping blank lines and lines that fail
/// to parse as JSON (logged, not fatal — §4.1's failure semantics).
pub fn read_ndjson(path: &std::path::Path) -> Vec<serde_json::Value> {
    let Ok(text) = std::fs::read_to_string(path) else {
        tracing::warn!(path = %path.display(), "offline seed file not found");
        return Vec::new();
    };
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed seed record");
                None
            }
        })
        .collect()
}
