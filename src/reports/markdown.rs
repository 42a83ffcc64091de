//! Markdown report generator: the human-readable `feed.md` summary (§4.8).

use super::escape::{escape_markdown_inline, escape_markdown_table};
use super::write_file;
use crate::error::Result;
use crate::model::Feed;
use std::path::Path;

/// Write `feed.md`: a Markdown table of the day's ranked feed, with the
/// top reasons for each candidate.
pub fn write_feed(feed: &Feed, path: &Path) -> Result<()> {
    write_file(path, &render_feed(feed))
}

#[must_use]
pub fn render_feed(feed: &Feed) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# PhantomScan feed — {}\n\n",
        feed.date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "Generated at {} · {} candidate(s)\n\n",
        feed.generated_at.to_rfc3339(),
        feed.items.len()
    ));

    if feed.items.is_empty() {
        out.push_str("No candidates scored above the reporting threshold today.\n");
        return out;
    }

    out.push_str("| Rank | Ecosystem | Package | Score | Top reasons |\n");
    out.push_str("|---:|---|---|---:|---|\n");
    for (i, item) in feed.items.iter().enumerate() {
        let reasons = item
            .breakdown
            .reasons
            .iter()
            .take(3)
            .map(|r| escape_markdown_table(r))
            .collect::<Vec<_>>()
            .join("; ");
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {} |\n",
            i + 1,
            item.candidate.ecosystem,
            escape_markdown_inline(&item.candidate.name),
            item.total,
            reasons,
        ));
    }
    out
}
