//! Name suspicion and known-hallucination signals (§4.3).

use crate::matching::best_name_suspicion_match;
use crate::model::{Corpus, PackageCandidate, Policy};

/// Name suspicion: suspicious prefix/suffix hits, plus fuzzy closeness to a
/// canonical name in the same ecosystem. Final score is the max of the
/// three, clamped to 1.
#[must_use]
pub fn name_suspicion(candidate: &PackageCandidate, policy: &Policy) -> (f64, Vec<String>) {
    let mut score: f64 = 0.0;
    let mut reasons = Vec::new();

    if let Some(prefix) = policy
        .suspicious_prefixes
        .iter()
        .find(|p| candidate.name.starts_with(p.as_str()))
    {
        score = score.max(0.8);
        reasons.push(format!("name starts with suspicious prefix '{prefix}'"));
    }

    if let Some(suffix) = policy
        .suspicious_suffixes
        .iter()
        .find(|s| candidate.name.ends_with(s.as_str()))
    {
        score = score.max(0.6);
        reasons.push(format!("name ends with suspicious suffix '{suffix}'"));
    }

    if let Some(canonical_names) = policy.canonical_names.get(candidate.ecosystem.as_str()) {
        let fuzzy_threshold_ratio = 100.0 - f64::from(policy.thresholds.fuzzy_threshold);
        if let Some((matched, ratio)) =
            best_name_suspicion_match(&candidate.name, canonical_names, fuzzy_threshold_ratio)
        {
            let distance = 100.0 - ratio;
            let fuzzy_score = 0.9 * (1.0 - distance / f64::from(policy.thresholds.fuzzy_threshold));
            score = score.max(fuzzy_score);
            reasons.push(format!(
                "Very similar to '{matched}' (distance: {distance:.0})"
            ));
        }
    }

    (score.clamp(0.0, 1.0), reasons)
}

/// Known hallucination: 1.0 iff the lowercased name matches an exact entry
/// or regex pattern in the corpus.
#[must_use]
pub fn known_hallucination(candidate: &PackageCandidate, corpus: &Corpus) -> (f64, Option<String>) {
    match corpus.matching(&candidate.name) {
        Some(matched) => (1.0, Some(format!("matches known hallucination entry '{matched}'"))),
        None => (0.0, None),
    }
}
