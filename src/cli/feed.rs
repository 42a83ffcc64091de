//! `phantomscan feed`: rank and persist today's (or a past day's) feed from
//! already-scored candidates (§4.7 steps 4-5).

use crate::error::Result;
use crate::model::{Feed, Policy};
use crate::persistence::{FileStore, Store};
use chrono::{NaiveDate, Utc};

pub fn run_feed(
    date: NaiveDate,
    top_n: Option<usize>,
    policy: &Policy,
    store: &mut Store,
    files: &FileStore,
) -> Result<Feed> {
    let scored = store.get_scored_candidates(date)?;
    let watchlist = store.get_watchlist(date)?;

    let mut feed = Feed {
        date,
        generated_at: Utc::now(),
        items: scored,
    };
    feed.sort_ranked();
    feed.items.retain(|item| item.total >= policy.min_score);
    feed.items.truncate(top_n.unwrap_or(policy.top_n));

    files.write_feed(&feed, &watchlist)?;
    tracing::info!(date = %date, items = feed.items.len(), "wrote feed");
    Ok(feed)
}
