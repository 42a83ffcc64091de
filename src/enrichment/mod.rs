//! Enrichment providers (C4.b, §4.5): best-effort, time-bounded network
//! calls that add facts a registry's own metadata doesn't carry.
//!
//! Every provider here follows one rule: on any failure — timeout, bad
//! status, parse error, disabled by policy, offline mode — it returns a
//! neutral value and an empty reason list. None of them return `Result`;
//! none of them can abort a scoring run. This is a deliberate departure
//! from a shared `trait Enricher { fn enrich(&self, ...) -> Result<...> }`
//! abstraction: PhantomScan enriches one candidate at a time, not a batch,
//! and a provider that can fail the whole batch is exactly what §7 rules
//! out (see DESIGN.md).
//!
//! When the `enrichment` feature is off (no `reqwest`), every provider
//! degrades to its neutral value unconditionally — this module still
//! compiles, it just never makes a network call.

mod dependents;
mod downloads;
mod http;
mod provenance;
mod repo_facts;
mod version_flip;
mod vulnerabilities;

pub use dependents::dependents_adjustment;
pub use downloads::{download_anomaly, weekly_downloads};
pub use provenance::provenance_risk;
pub use repo_facts::{repo_asymmetry, RepoFacts};
pub use version_flip::version_flip_risk;
pub use vulnerabilities::has_known_vulnerabilities;

use crate::model::{PackageCandidate, Policy, ScoreBreakdown};
use chrono::{DateTime, Utc};

/// Run every toggled-on enrichment provider for one candidate and fold the
/// results into `breakdown`, in addition to the metadata-only signals
/// `crate::scoring::score_metadata_signals` already populated.
///
/// This is the one place network calls happen during scoring. Each call is
/// independently best-effort; a slow or failing provider degrades that one
/// subscore to neutral rather than failing the candidate.
pub fn enrich(
    candidate: &PackageCandidate,
    policy: &Policy,
    now: DateTime<Utc>,
    breakdown: &mut ScoreBreakdown,
) {
    let mut repo_facts = None;
    if policy.enrichment.repo_facts {
        repo_facts = repo_facts::fetch(candidate, policy);
    }

    if let Some(facts) = &repo_facts {
        let (score, reason) = repo_asymmetry(candidate, facts, policy, now);
        breakdown.repo_asymmetry = score;
        breakdown.push_reason(reason);
    }

    if policy.enrichment.vulnerabilities {
        if let Some(reason) = has_known_vulnerabilities(candidate, policy) {
            breakdown.content_risk = breakdown.content_risk.max(1.0);
            breakdown.push_reason(reason);
        }
    }

    if policy.enrichment.dependents {
        if let Some((multiplier, reason)) = dependents_adjustment(candidate, policy) {
            breakdown.maintainer_reputation *= multiplier;
            breakdown.push_reason(reason);
        }
    }

    if policy.enrichment.downloads {
        let downloads = weekly_downloads(candidate, policy);
        let (score, reason) = download_anomaly(candidate, downloads, policy, now);
        breakdown.download_anomaly = score;
        if let Some(reason) = reason {
            breakdown.push_reason(reason);
        }
    }

    if policy.enrichment.provenance {
        let (score, reason) = provenance_risk(candidate);
        breakdown.provenance_risk = score;
        if let Some(reason) = reason {
            breakdown.push_reason(reason);
        }
    }

    if policy.enrichment.version_flip {
        let (score, reason) = version_flip_risk(candidate, policy, now);
        breakdown.version_flip = score;
        if let Some(reason) = reason {
            breakdown.push_reason(reason);
        }
    }
}
