//! File store (C6, §4.8): the artifact tree under the data directory —
//! `raw/{date}/{ecosystem}.jsonl`, `processed/{date}/scored.jsonl`, and the
//! `feeds/{date}/` reports produced by `crate::reports`.

use crate::error::{PhantomScanError, Result};
use crate::model::{Ecosystem, Feed, PackageCandidate, ScoredCandidate, WatchlistEntry};
use crate::reports;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of the file store; every artifact path is relative to this.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn raw_path(&self, date: NaiveDate, ecosystem: Ecosystem) -> PathBuf {
        self.root
            .join("raw")
            .join(date.to_string())
            .join(format!("{}.jsonl", ecosystem.as_str()))
    }

    fn processed_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("processed")
            .join(date.to_string())
            .join("scored.jsonl")
    }

    fn feed_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join("feeds").join(date.to_string())
    }

    /// Append-free overwrite of `raw/{date}/{ecosystem}.jsonl`, one
    /// candidate per line.
    pub fn write_raw_candidates(
        &self,
        date: NaiveDate,
        ecosystem: Ecosystem,
        candidates: &[PackageCandidate],
    ) -> Result<()> {
        let body = ndjson(candidates)?;
        write_file(&self.raw_path(date, ecosystem), &body)
    }

    /// Overwrite `processed/{date}/scored.jsonl`, one scored candidate per
    /// line — the "columnar scored dump" of §6's persisted-state layout.
    pub fn write_processed_scored(&self, date: NaiveDate, scored: &[ScoredCandidate]) -> Result<()> {
        let body = ndjson(scored)?;
        write_file(&self.processed_path(date), &body)
    }

    /// Write every `feeds/{date}/` artifact: `topN.json`, `topN.csv`,
    /// `feed.md`, and (when non-empty) `watchlist.{json,csv}`.
    pub fn write_feed(&self, feed: &Feed, watchlist: &[WatchlistEntry]) -> Result<()> {
        let dir = self.feed_dir(feed.date);
        reports::json::write_top_n(feed, &dir.join("topN.json"))?;
        reports::csv::write_top_n(feed, &dir.join("topN.csv"))?;
        reports::markdown::write_feed(feed, &dir.join("feed.md"))?;
        if !watchlist.is_empty() {
            reports::json::write_watchlist(watchlist, &dir.join("watchlist.json"))?;
            reports::csv::write_watchlist(watchlist, &dir.join("watchlist.csv"))?;
        }
        Ok(())
    }

    /// Read back a previously written `feeds/{date}/topN.json`.
    pub fn read_feed(&self, date: NaiveDate) -> Result<Feed> {
        let path = self.feed_dir(date).join("topN.json");
        let text = fs::read_to_string(&path).map_err(|e| PhantomScanError::io(&path, e))?;
        serde_json::from_str(&text).map_err(PhantomScanError::from)
    }

    /// Delete the `feeds/`, `raw/`, and `processed/` directories for every
    /// date strictly before `cutoff` (best-effort; missing directories are
    /// not an error).
    pub fn delete_older_than(&self, cutoff: NaiveDate, known_dates: &[NaiveDate]) -> Result<()> {
        for date in known_dates.iter().filter(|d| **d < cutoff) {
            for subdir in ["feeds", "raw", "processed"] {
                let path = self.root.join(subdir).join(date.to_string());
                if path.is_dir() {
                    fs::remove_dir_all(&path).map_err(|e| PhantomScanError::io(&path, e))?;
                }
            }
        }
        Ok(())
    }
}

fn ndjson<T: serde::Serialize>(items: &[T]) -> Result<String> {
    let mut out = String::new();
    for item in items {
        out.push_str(&serde_json::to_string(item).map_err(PhantomScanError::from)?);
        out.push('\n');
    }
    Ok(out)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PhantomScanError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| PhantomScanError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ecosystem, PackageCandidate, ScoreBreakdown};
    use chrono::Utc;

    fn candidate() -> PackageCandidate {
        PackageCandidate::new(
            Ecosystem::Npm,
            "left-pad",
            "1.0.0",
            Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        )
    }

    #[test]
    fn write_and_read_feed_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2026, 7, 26).unwrap();
        let feed = Feed {
            date,
            generated_at: Utc::now(),
            items: vec![ScoredCandidate {
                candidate: candidate(),
                breakdown: ScoreBreakdown::default(),
                total: 0.5,
                scored_at: Utc::now(),
            }],
        };
        store.write_feed(&feed, &[]).unwrap();
        assert!(dir.path().join("feeds").join("2026-07-26").join("topN.csv").is_file());
        assert!(dir.path().join("feeds").join("2026-07-26").join("feed.md").is_file());
        assert!(!dir.path().join("feeds").join("2026-07-26").join("watchlist.json").exists());

        let read_back = store.read_feed(date).unwrap();
        assert_eq!(read_back.items.len(), 1);
        assert_eq!(read_back.items[0].candidate.name, "left-pad");
    }

    #[test]
    fn empty_watchlist_writes_no_watchlist_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let feed = Feed {
            date: NaiveDate::from_ymd_opt(2026, 7, 26).unwrap(),
            generated_at: Utc::now(),
            items: vec![],
        };
        store.write_feed(&feed, &[]).unwrap();
        let feed_dir = dir.path().join("feeds").join("2026-07-26");
        assert!(!feed_dir.join("watchlist.csv").exists());
    }

    #[test]
    fn delete_older_than_removes_only_expired_dates() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let old = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let recent = NaiveDate::from_ymd_opt(2026, 7, 26).unwrap();
        for date in [old, recent] {
            store
                .write_raw_candidates(date, Ecosystem::Npm, &[candidate()])
                .unwrap();
        }
        store.delete_older_than(recent, &[old, recent]).unwrap();
        assert!(!dir.path().join("raw").join(old.to_string()).exists());
        assert!(dir.path().join("raw").join(recent.to_string()).exists());
    }
}
