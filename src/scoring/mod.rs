//! The heuristic signal bank (C3): twelve pure functions, each returning
//! `(score in [0,1], reasons)`. None of these return `Result` and none
//! panic on malformed input — every signal degrades to a neutral value
//! instead, per the propagation rule in `crate::error`.

mod maintainer_reputation;
mod name_suspicion;
mod repo_docs;

pub use maintainer_reputation::maintainer_reputation;
pub use name_suspicion::{known_hallucination, name_suspicion};
pub use repo_docs::{docs_absence, repo_missing};

use crate::model::{Corpus, Ecosystem, PackageCandidate, Policy, ScoreBreakdown};
use chrono::{DateTime, Utc};

/// Fire every metadata-only signal (C3) for one candidate, in the fixed
/// order `ScoreBreakdown::subscores` documents, and return the populated
/// breakdown. Enrichment-derived subscores (repo_asymmetry, provenance_risk,
/// download_anomaly, version_flip) are left at their zero default — the
/// pipeline orchestrator fills those in separately via `crate::enrichment`
/// before calling `ScoreBreakdown::clamp`.
#[must_use]
pub fn score_metadata_signals(
    candidate: &PackageCandidate,
    policy: &Policy,
    corpus: &Corpus,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    let (name_score, name_reasons) = name_suspicion(candidate, policy);
    breakdown.name_suspicion = name_score;
    for reason in name_reasons {
        breakdown.push_reason(reason);
    }

    let (hallucination_score, hallucination_reason) = known_hallucination(candidate, corpus);
    breakdown.known_hallucination = hallucination_score;
    if let Some(reason) = hallucination_reason {
        breakdown.push_reason(reason);
    }

    let (newness_score, newness_reason) = newness(candidate, policy, now);
    breakdown.newness = newness_score;
    breakdown.push_reason(newness_reason);

    let (repo_missing_score, repo_missing_reason) = repo_missing(candidate);
    breakdown.repo_missing = repo_missing_score;
    if let Some(reason) = repo_missing_reason {
        breakdown.push_reason(reason);
    }

    let (maintainer_score, maintainer_reasons) = maintainer_reputation(candidate, policy);
    breakdown.maintainer_reputation = maintainer_score;
    for reason in maintainer_reasons {
        breakdown.push_reason(reason);
    }

    let (script_score, script_reason) = script_risk(candidate);
    breakdown.script_risk = script_score;
    if let Some(reason) = script_reason {
        breakdown.push_reason(reason);
    }

    let (content_score, content_reasons) = content_risk(candidate, policy);
    breakdown.content_risk = content_score;
    for reason in content_reasons {
        breakdown.push_reason(reason);
    }

    let (docs_score, docs_reason) = docs_absence(candidate);
    breakdown.docs_absence = docs_score;
    if let Some(reason) = docs_reason {
        breakdown.push_reason(reason);
    }

    breakdown
}

/// Newness (§4.3): `ageDays == 0` scores 1.0; within `new_package_days` the
/// score decays linearly; past that window it is zero.
#[must_use]
pub fn newness(candidate: &PackageCandidate, policy: &Policy, now: DateTime<Utc>) -> (f64, String) {
    let age_days = candidate.age_days(now);
    let window = policy.thresholds.new_package_days.max(1);
    let score = if age_days == 0 {
        1.0
    } else if age_days <= window {
        1.0 - (age_days as f64 / window as f64)
    } else {
        0.0
    };
    let reason = if score > 0.0 {
        format!("published {age_days} day(s) ago")
    } else {
        String::new()
    };
    (score, reason)
}

/// Content risk (§4.4): dispatches to the npm lifecycle-script linter or
/// the PyPI sdist/wheel comparison depending on ecosystem.
#[must_use]
pub fn content_risk(candidate: &PackageCandidate, policy: &Policy) -> (f64, Vec<String>) {
    match candidate.ecosystem {
        Ecosystem::Npm => {
            let scripts = candidate
                .raw_metadata
                .as_ref()
                .map(crate::model::RawMetadata::latest_scripts)
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            crate::analysis::content_risk_npm(&scripts)
        }
        Ecosystem::PyPI => crate::analysis::content_risk_pypi(candidate, policy),
    }
}

/// Script risk (§4.3): PyPI candidates never run install scripts; npm
/// candidates score 1.0 iff `has_install_scripts`.
#[must_use]
pub fn script_risk(candidate: &PackageCandidate) -> (f64, Option<String>) {
    match candidate.ecosystem {
        Ecosystem::PyPI => (0.0, None),
        Ecosystem::Npm => {
            if candidate.has_install_scripts {
                (1.0, Some("package declares an install/preinstall/postinstall script".to_string()))
            } else {
                (0.0, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Corpus, Policy};

    fn candidate(age_days: i64, homepage: bool, repo: bool, maintainers: u32) -> PackageCandidate {
        PackageCandidate::new(
            Ecosystem::PyPI,
            "somepackage",
            "1.0.0",
            Utc::now() - chrono::Duration::days(age_days),
            homepage.then(|| "https://example.com".to_string()),
            repo.then(|| "https://github.com/example/somepackage".to_string()),
            maintainers,
            false,
            Some("a perfectly normal package".to_string()),
            None,
        )
    }

    #[test]
    fn benign_established_package_scores_low() {
        let policy = Policy::default();
        let corpus = Corpus::empty();
        let candidate = candidate(365, true, true, 5);
        let breakdown = score_metadata_signals(&candidate, &policy, &corpus, Utc::now());
        assert!(breakdown.name_suspicion < 0.5);
        assert_eq!(breakdown.newness, 0.0);
        assert_eq!(breakdown.repo_missing, 0.0);
        assert_eq!(breakdown.maintainer_reputation, 0.0);
    }

    #[test]
    fn suspicious_brand_new_package_scores_high() {
        let policy = Policy::default();
        let corpus = Corpus::empty();
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI,
            "requests2",
            "0.0.1",
            Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        );
        let breakdown = score_metadata_signals(&candidate, &policy, &corpus, Utc::now());
        assert!(breakdown.name_suspicion > 0.5, "{}", breakdown.name_suspicion);
        assert_eq!(breakdown.newness, 1.0);
        assert_eq!(breakdown.repo_missing, 1.0);
        assert_eq!(breakdown.maintainer_reputation, 1.0);
    }

    #[test]
    fn newness_is_monotonic_in_age() {
        let policy = Policy::default();
        let brand_new = newness(&candidate(0, true, true, 5), &policy, Utc::now()).0;
        let old = newness(&candidate(365, true, true, 5), &policy, Utc::now()).0;
        assert_eq!(brand_new, 1.0);
        assert_eq!(old, 0.0);
    }

    #[test]
    fn script_risk_only_applies_to_npm() {
        let mut pypi = candidate(10, true, true, 2);
        pypi.has_install_scripts = true;
        assert_eq!(script_risk(&pypi).0, 0.0);

        let npm = PackageCandidate::new(
            Ecosystem::Npm,
            "somepkg",
            "1.0.0",
            Utc::now(),
            None,
            None,
            1,
            true,
            None,
            None,
        );
        assert_eq!(script_risk(&npm).0, 1.0);
    }
}
