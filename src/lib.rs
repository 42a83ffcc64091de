//! **PhantomScan — daily threat intelligence for newly published packages.**
//!
//! `phantomscan` watches PyPI and npm for packages published in the last
//! rolling window and scores each one for the likelihood that it is a
//! slopsquat: a package whose name exists only because an LLM hallucinated
//! it as a dependency, or a typosquat riding on a popular project's name.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The central data types — [`model::PackageCandidate`],
//!   [`model::ScoreBreakdown`], [`model::ScoredCandidate`], [`model::Feed`],
//!   [`model::Policy`], and the known-hallucination [`model::Corpus`].
//! - **[`sources`]**: Adapters that list recently published packages from
//!   PyPI and npm, with an offline seed fallback.
//! - **[`registry`]**: The existence prober — does a candidate name resolve
//!   to a real package right now?
//! - **[`scoring`]**: The metadata-only signals that need no network access
//!   (name suspicion, known-hallucination match, newness, ...).
//! - **[`analysis`]**: Package-content analysis (script risk, suspicious
//!   imports) for PyPI sdists/wheels and npm tarballs.
//! - **[`enrichment`]**: Network-backed signals (repository facts, OSV
//!   vulnerabilities, download counts, dependents, version flips).
//!   Requires the `enrichment` feature flag.
//! - **[`pipeline`]**: The orchestrator that drives fetch → probe → score →
//!   rank → persist for a full `run-all` invocation.
//! - **[`persistence`]**: The tabular (SQLite) and file-system stores feeds
//!   and watchlists are written to.
//! - **[`reports`]**: JSON, CSV, and Markdown report generators for the
//!   file-store artifacts.
//! - **[`config`]**: Policy loading, presets, and the offline-mode switch.
//! - **[`cli`]**: Subcommand handlers backing the `phantomscan` binary.
//!
//! ## Getting Started: Scoring One Package
//!
//! ```no_run
//! use phantomscan::model::{Corpus, Ecosystem, PackageCandidate, Policy};
//! use phantomscan::scoring::score_metadata_signals;
//! use chrono::Utc;
//!
//! let policy = Policy::default();
//! let corpus = Corpus::empty();
//! let candidate = PackageCandidate::new(
//!     Ecosystem::PyPI,
//!     "reqeusts",
//!     "0.0.1",
//!     Utc::now(),
//!     None,
//!     None,
//!     1,
//!     false,
//!     None,
//!     None,
//! );
//! let breakdown = score_metadata_signals(&candidate, &policy, &corpus, Utc::now());
//! println!("name_suspicion = {}", breakdown.name_suspicion);
//! ```
//!
//! ## Running the full pipeline
//!
//! ```ignore
//! use phantomscan::model::Ecosystem;
//! use phantomscan::persistence::{FileStore, Store};
//! use phantomscan::pipeline::{install_cancellation_flag, run_all};
//!
//! let mut store = Store::open(&phantomscan::persistence::default_db_path())?;
//! let files = FileStore::new(phantomscan::persistence::default_file_store_root());
//! let policy = phantomscan::config::load_policy(None)?;
//! let corpus = phantomscan::model::Corpus::empty();
//! let stop = install_cancellation_flag();
//!
//! let outcome = run_all(
//!     &[Ecosystem::PyPI, Ecosystem::Npm],
//!     200,
//!     chrono::Utc::now().date_naive(),
//!     &policy,
//!     &corpus,
//!     &mut store,
//!     &files,
//!     &stop,
//! )?;
//! println!("{} candidates made today's feed", outcome.feed.items.len());
//! # Ok::<(), phantomscan::error::PhantomScanError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `enrichment`: enables all network-backed enrichment modules (repo
//!   facts, OSV vulnerabilities, download counts, dependents, version
//!   flips) and the registry existence prober. This adds network
//!   dependencies like `reqwest`. Disabling it yields an offline-only
//!   build where every enrichment collapses to its neutral value.
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `phantomscan` library crate. The binary
//! exposes `fetch`, `score`, `feed`, `run-all`, and `analyze` subcommands;
//! see the project README for usage.

#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod analysis;
pub mod cli;
pub mod config;
#[cfg(feature = "enrichment")]
pub mod enrichment;
pub mod error;
pub mod matching;
pub mod model;
pub mod persistence;
pub mod pipeline;
pub mod registry;
pub mod reports;
pub mod scoring;
pub mod sources;
pub mod utils;

pub use config::{load_policy, save_policy, PolicyPreset};
pub use error::{ErrorContext, OptionContext, PhantomScanError, Result};
pub use matching::{alternatives_ratio, suggest_alternatives};
pub use model::{Corpus, Ecosystem, Feed, PackageCandidate, Policy, ScoreBreakdown, ScoredCandidate, WatchlistEntry};
pub use persistence::{FileStore, Store};
pub use pipeline::{install_cancellation_flag, run_all, RunOutcome};
