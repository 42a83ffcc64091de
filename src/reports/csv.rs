//! CSV report generator: flat projections for SIEM import (§4.8).

use super::write_file;
use crate::error::Result;
use crate::model::{Feed, WatchlistEntry};
use std::path::Path;

/// Write `topN.csv`: one row per scored candidate, subscores inlined in the
/// fixed order `ScoreBreakdown::subscores` documents.
pub fn write_top_n(feed: &Feed, path: &Path) -> Result<()> {
    write_file(path, &render_top_n(feed))
}

#[must_use]
pub fn render_top_n(feed: &Feed) -> String {
    let mut content = String::new();
    content.push_str(
        "ecosystem,name,version,total,created_at,repository,homepage,\
         name_suspicion,known_hallucination,content_risk,script_risk,newness,\
         repo_missing,maintainer_reputation,docs_absence,provenance_risk,\
         repo_asymmetry,download_anomaly,version_flip,reasons\n",
    );
    for item in &feed.items {
        let c = &item.candidate;
        let subscores: Vec<String> = item
            .breakdown
            .subscores()
            .iter()
            .map(|(_, v)| format!("{v:.4}"))
            .collect();
        content.push_str(&format!(
            "{},\"{}\",\"{}\",{:.4},\"{}\",\"{}\",\"{}\",{},\"{}\"\n",
            c.ecosystem,
            escape_csv(&c.name),
            escape_csv(&c.version),
            item.total,
            c.created_at.to_rfc3339(),
            c.repository.as_deref().map(escape_csv).unwrap_or_default(),
            c.homepage.as_deref().map(escape_csv).unwrap_or_default(),
            subscores.join(","),
            escape_csv(&item.breakdown.reasons.join("; ")),
        ));
    }
    content
}

/// Write `watchlist.csv`: one row per name that did not resolve in its
/// registry.
pub fn write_watchlist(entries: &[WatchlistEntry], path: &Path) -> Result<()> {
    write_file(path, &render_watchlist(entries))
}

#[must_use]
pub fn render_watchlist(entries: &[WatchlistEntry]) -> String {
    let mut content = String::new();
    content.push_str("ecosystem,name,not_found_reason,first_seen_at\n");
    for entry in entries {
        content.push_str(&format!(
            "{},\"{}\",{},{}\n",
            entry.ecosystem,
            escape_csv(&entry.name),
            entry.not_found_reason,
            entry.first_seen_at.to_rfc3339(),
        ));
    }
    content
}

/// Escape a string for CSV embedding: double-quote escaping per RFC 4180,
/// plus newline flattening since fields are already wrapped in double quotes.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace('\n', " ")
}
