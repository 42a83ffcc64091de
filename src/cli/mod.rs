//! Subcommand handlers backing the `phantomscan` binary (§6 CLI surface):
//! `fetch`, `score`, `feed`, `run-all`, `analyze`.

mod analyze;
mod feed;
mod fetch;
mod run_all;
mod score;

pub use analyze::{run_analyze, AnalyzeOutcome};
pub use feed::run_feed;
pub use fetch::{run_fetch, FetchArgs};
pub use run_all::{run_run_all, RunAllArgs};
pub use score::run_score;
