//! `phantomscan score`: re-score the raw candidates already fetched for a
//! date (§4.7 steps 2-3), without ranking or filtering into a feed.

use crate::error::Result;
use crate::model::{Corpus, Ecosystem, Policy};
use crate::persistence::Store;
use chrono::NaiveDate;

pub fn run_score(date: NaiveDate, policy: &Policy, corpus: &Corpus, store: &mut Store) -> Result<usize> {
    let mut scored = Vec::new();
    let mut watchlist = Vec::new();

    for ecosystem in [Ecosystem::PyPI, Ecosystem::Npm] {
        let raw = store.get_raw_candidates(date, ecosystem)?;
        if raw.is_empty() {
            continue;
        }
        let (mut batch, mut not_found) = crate::pipeline::probe_and_score(raw, policy, corpus);
        scored.append(&mut batch);
        watchlist.append(&mut not_found);
    }

    // `insert_scored`/`insert_watchlist` replace the whole date atomically,
    // so every ecosystem's results must be collected before either call.
    store.insert_scored(date, &scored)?;
    store.insert_watchlist(date, &watchlist)?;
    tracing::info!(
        scored = scored.len(),
        watchlisted = watchlist.len(),
        "scored candidates"
    );
    Ok(scored.len())
}
