//! The day's ranked feed and the watchlist of not-yet-existing names.

use super::candidate::Ecosystem;
use super::score::ScoredCandidate;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A name observed during ingestion that did not currently resolve in its
/// registry. Created only when strict-existence gating is on (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub ecosystem: Ecosystem,
    pub name: String,
    /// One of `"404" | "timeout" | "offline" | "error"`.
    pub not_found_reason: String,
    pub first_seen_at: DateTime<Utc>,
}

/// The day's ranked output: ordered by `total` descending with deterministic
/// tie-breaks (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ScoredCandidate>,
}

impl Feed {
    /// Sort `items` by the ranking rule in §4.7 step 4: `total` descending,
    /// then `newness` descending, then `ecosystem:name` ascending.
    pub fn sort_ranked(&mut self) {
        self.items.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.breakdown
                        .newness
                        .partial_cmp(&a.breakdown.newness)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.sort_key().cmp(&b.sort_key()))
        });
    }
}
