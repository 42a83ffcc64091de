//! Registry source adapters (C1, §4.1): `fetch_recent(limit)` for each
//! ecosystem. Finite, not restartable across invocations — exhaustion is
//! normal, not an error.
//!
//! Every adapter shares one failure posture: a single candidate that
//! fails to parse is logged and skipped, never fatal; a failed discovery
//! call yields an empty sequence; offline mode swaps in a canned seed
//! file. None of that is visible in the return type — callers get back
//! whatever candidates were successfully built.

mod npm;
mod pypi;
mod seed;

pub use npm::fetch_recent_npm;
pub use pypi::fetch_recent_pypi;

use crate::model::{Ecosystem, PackageCandidate};

/// Fetch up to `limit` recent candidates for one ecosystem, dispatching to
/// the matching adapter.
#[must_use]
pub fn fetch_recent(ecosystem: Ecosystem, limit: usize) -> Vec<PackageCandidate> {
    match ecosystem {
        Ecosystem::PyPI => fetch_recent_pypi(limit),
        Ecosystem::Npm => fetch_recent_npm(limit),
    }
}

/// Fetch one named package's metadata directly, used by `analyze`.
#[must_use]
pub fn fetch_by_name(ecosystem: Ecosystem, name: &str) -> Option<PackageCandidate> {
    match ecosystem {
        Ecosystem::PyPI => pypi::fetch_by_name(name),
        Ecosystem::Npm => npm::fetch_by_name(name),
    }
}

/// Retry an HTTP call with exponential backoff (`2^k` seconds), default 3
/// attempts, per §4.1's back-off contract.
#[cfg(feature = "enrichment")]
pub(crate) fn with_retries<T>(attempts: u32, mut op: impl FnMut() -> Option<T>) -> Option<T> {
    for attempt in 0..attempts {
        if let Some(result) = op() {
            return Some(result);
        }
        if attempt + 1 < attempts {
            std::thread::sleep(std::time::Duration::from_secs(2u64.pow(attempt)));
        }
    }
    None
}
