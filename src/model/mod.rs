//! Core data model shared by every component of the detection engine.
//!
//! `Ecosystem` and `PackageCandidate` are produced by the source adapters
//! (`crate::sources`); `ScoreBreakdown` and `ScoredCandidate` are produced by
//! the scorer (`crate::scoring`); `Feed` and `WatchlistEntry` are produced by
//! the pipeline orchestrator (`crate::pipeline`). `Policy` and `Corpus` are
//! loaded once at start-up (`crate::config`) and passed by reference into
//! every signal.

mod candidate;
mod corpus;
mod feed;
mod policy;
mod score;

pub use candidate::{Ecosystem, PackageCandidate, RawMetadata};
pub use corpus::Corpus;
pub use feed::{Feed, WatchlistEntry};
pub use policy::Policy;
pub use score::{ScoreBreakdown, ScoredCandidate};
