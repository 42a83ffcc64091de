//! JSON report generator: `topN.json`/`watchlist.json` (§4.8).

use super::write_file;
use crate::error::{PhantomScanError, Result};
use crate::model::{Feed, WatchlistEntry};
use serde::Serialize;
use std::path::Path;

/// Write `topN.json`: the ranked feed, one entry per scored candidate with
/// its full subscore breakdown.
pub fn write_top_n(feed: &Feed, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(feed).map_err(PhantomScanError::from)?;
    write_file(path, &json)
}

/// Write `watchlist.json`: names observed during ingestion that did not
/// resolve in their registry.
pub fn write_watchlist(entries: &[WatchlistEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&WatchlistDocument { entries })
        .map_err(PhantomScanError::from)?;
    write_file(path, &json)
}

#[derive(Serialize)]
struct WatchlistDocument<'a> {
    entries: &'a [WatchlistEntry],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ecosystem, PackageCandidate, ScoreBreakdown, ScoredCandidate};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn top_n_json_round_trips_through_serde() {
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI,
            "requests",
            "1.0.0",
            Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        );
        let feed = Feed {
            date: NaiveDate::from_ymd_opt(2026, 7, 26).unwrap(),
            generated_at: Utc::now(),
            items: vec![ScoredCandidate {
                candidate,
                breakdown: ScoreBreakdown::default(),
                total: 0.42,
                scored_at: Utc::now(),
            }],
        };
        let json = serde_json::to_string(&feed).unwrap();
        let round_tripped: Feed = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped.items.len(), 1);
        assert_eq!(round_tripped.items[0].total, 0.42);
    }

    #[test]
    fn watchlist_document_serializes_under_entries_key() {
        let entries = vec![WatchlistEntry {
            ecosystem: Ecosystem::Npm,
            name: "ghost-pkg".to_string(),
            not_found_reason: "404".to_string(),
            first_seen_at: Utc::now(),
        }];
        let json = serde_json::to_string(&WatchlistDocument { entries: &entries }).unwrap();
        assert!(json.contains("\"entries\""));
        assert!(json.contains("ghost-pkg"));
    }
}
