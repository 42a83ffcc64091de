//! Pipeline orchestration (C7, §4.7): `run_all` drives fetch → existence
//! probe → score → rank → persist for one or more ecosystems and a given
//! date.

use crate::error::Result;
use crate::model::{
    Corpus, Ecosystem, Feed, PackageCandidate, Policy, ScoreBreakdown, ScoredCandidate,
    WatchlistEntry,
};
use crate::persistence::{FileStore, Store};
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit codes for the CLI binary (§6: "0 success; 1 generic failure; 130
/// interrupted").
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const INTERRUPTED: i32 = 130;
}

/// Installs a `SIGINT` handler and returns a flag that flips to `true` on
/// the first interrupt. Non-fatal if the handler cannot be installed —
/// the pipeline simply runs to completion uninterruptible in that case.
#[must_use]
pub fn install_cancellation_flag() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    })
    .ok();
    stop
}

/// Outcome of a full `run_all` invocation: the persisted feed plus the
/// watchlist entries collected along the way.
pub struct RunOutcome {
    pub feed: Feed,
    pub watchlist: Vec<WatchlistEntry>,
}

/// `RunAll(ecosystems, limit, date, topN)` (§4.7): fetch, probe, score,
/// rank, and persist for `date`. `stop` is polled between stages so a
/// `SIGINT` aborts promptly instead of running to completion.
pub fn run_all(
    ecosystems: &[Ecosystem],
    limit: usize,
    date: NaiveDate,
    policy: &Policy,
    corpus: &Corpus,
    store: &mut Store,
    files: &FileStore,
    stop: &AtomicBool,
) -> Result<RunOutcome> {
    let mut scored = Vec::new();
    let mut watchlist = Vec::new();

    for ecosystem in ecosystems {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let candidates = fetch_stage(*ecosystem, limit, policy);
        store.insert_raw_candidates(date, *ecosystem, &candidates)?;
        files.write_raw_candidates(date, *ecosystem, &candidates)?;

        if stop.load(Ordering::Relaxed) {
            break;
        }
        let (mut batch, not_found) = probe_and_score(candidates, policy, corpus);
        scored.append(&mut batch);
        watchlist.extend(not_found);
    }

    let mut feed = Feed {
        date,
        generated_at: Utc::now(),
        items: scored,
    };
    feed.sort_ranked();
    feed.items.retain(|item| item.total >= policy.min_score);
    feed.items.truncate(policy.top_n);

    store.insert_scored(date, &feed.items)?;
    store.insert_watchlist(date, &watchlist)?;
    files.write_processed_scored(date, &feed.items)?;
    files.write_feed(&feed, &watchlist)?;

    Ok(RunOutcome { feed, watchlist })
}

/// Step 1: drive the source adapter for one ecosystem, up to `limit`
/// candidates.
fn fetch_stage(ecosystem: Ecosystem, limit: usize, _policy: &Policy) -> Vec<PackageCandidate> {
    crate::sources::fetch_recent(ecosystem, limit)
}

/// Steps 2-3 of §4.7: probe existence, then score every surviving
/// candidate. Shared by `run_all` and the standalone `score` CLI
/// subcommand, which re-scores raw candidates already on disk.
#[must_use]
pub fn probe_and_score(
    candidates: Vec<PackageCandidate>,
    policy: &Policy,
    corpus: &Corpus,
) -> (Vec<ScoredCandidate>, Vec<WatchlistEntry>) {
    let (surviving, watchlist) = probe_stage(candidates, policy);
    let now = Utc::now();
    let scored = score_stage(surviving, policy, corpus, now);
    (scored, watchlist)
}

/// Step 2: run the existence prober over every candidate, in parallel
/// (§5: "a bounded worker pool that performs per-candidate existence
/// checks"). Under strict mode a not-found candidate is routed to the
/// watchlist instead of being scored; otherwise the probe result is
/// attached to the candidate's future breakdown.
fn probe_stage(
    candidates: Vec<PackageCandidate>,
    policy: &Policy,
) -> (Vec<(PackageCandidate, Option<(bool, &'static str)>)>, Vec<WatchlistEntry>) {
    let now = Utc::now();
    let probed: Vec<(PackageCandidate, (bool, &'static str))> = candidates
        .into_par_iter()
        .map(|candidate| {
            let (exists, reason) =
                crate::registry::exists_in_registry(candidate.ecosystem, &candidate.name, policy);
            (candidate, (exists, reason))
        })
        .collect();

    let mut surviving = Vec::new();
    let mut watchlist = Vec::new();
    for (candidate, (exists, reason)) in probed {
        if policy.strict_existence && !exists {
            watchlist.push(WatchlistEntry {
                ecosystem: candidate.ecosystem,
                name: candidate.name,
                not_found_reason: reason.to_string(),
                first_seen_at: now,
            });
        } else {
            surviving.push((candidate, Some((exists, reason))));
        }
    }
    (surviving, watchlist)
}

/// Step 3: fire every metadata signal and enrichment for each surviving
/// candidate, in parallel (§5: "across tasks they run concurrently").
fn score_stage(
    surviving: Vec<(PackageCandidate, Option<(bool, &'static str)>)>,
    policy: &Policy,
    corpus: &Corpus,
    now: chrono::DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    surviving
        .into_par_iter()
        .map(|(candidate, probe)| score_one(candidate, probe, policy, corpus, now))
        .collect()
}

fn score_one(
    candidate: PackageCandidate,
    probe: Option<(bool, &'static str)>,
    policy: &Policy,
    corpus: &Corpus,
    now: chrono::DateTime<Utc>,
) -> ScoredCandidate {
    let mut breakdown = crate::scoring::score_metadata_signals(&candidate, policy, corpus, now);
    if let Some((exists, reason)) = probe {
        breakdown.exists = Some(exists);
        if !exists {
            breakdown.not_found_reason = Some(reason.to_string());
        }
    }
    #[cfg(feature = "enrichment")]
    crate::enrichment::enrich(&candidate, policy, now, &mut breakdown);
    breakdown.clamp();

    let total = weighted_total(&breakdown, policy);
    ScoredCandidate {
        candidate,
        breakdown,
        total,
        scored_at: now,
    }
}

/// §4.6 step 4: `total = clamp(Σ weight[s] · subscore[s], 0, 1)`.
fn weighted_total(breakdown: &ScoreBreakdown, policy: &Policy) -> f64 {
    let sum: f64 = breakdown
        .subscores()
        .iter()
        .map(|(name, value)| policy.weights.get(name) * value)
        .sum();
    sum.clamp(0.0, 1.0)
}
