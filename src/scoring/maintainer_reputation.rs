//! Maintainer reputation signal (§4.3).

use crate::model::{Ecosystem, PackageCandidate, Policy};

/// Base score from maintainer count, plus registry-specific modifiers:
/// a disposable-email maintainer forces the score to 1.0; a maintainer
/// account younger than `maintainer_age_floor_days` adds 0.3 (clamped).
///
/// The account-age modifier only fires when the registry payload actually
/// carries a maintainer creation date; neither adapter currently populates
/// one (see DESIGN.md), so in practice only the disposable-email modifier
/// and the base tiers are reachable today.
#[must_use]
pub fn maintainer_reputation(candidate: &PackageCandidate, policy: &Policy) -> (f64, Vec<String>) {
    let mut reasons = Vec::new();
    let mut score = match candidate.maintainers_count {
        0 | 1 => 1.0,
        2 => 0.5,
        _ => 0.0,
    };

    if has_disposable_email_maintainer(candidate, policy) {
        score = 1.0;
        reasons.push("maintainer email uses a disposable provider".to_string());
    }

    if let Some(age_days) = maintainer_account_age_days(candidate) {
        if age_days < policy.thresholds.maintainer_age_floor_days {
            score = (score + 0.3).clamp(0.0, 1.0);
            reasons.push(format!("maintainer account is only {age_days} day(s) old"));
        }
    }

    (score, reasons)
}

fn has_disposable_email_maintainer(candidate: &PackageCandidate, policy: &Policy) -> bool {
    let emails: Vec<String> = match candidate.ecosystem {
        Ecosystem::Npm => candidate
            .raw_metadata
            .as_ref()
            .and_then(|m| m.npm_maintainers())
            .map(|maintainers| {
                maintainers
                    .iter()
                    .filter_map(|m| m.get("email").and_then(|e| e.as_str()))
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default(),
        Ecosystem::PyPI => candidate
            .raw_metadata
            .as_ref()
            .and_then(|m| m.pypi_json())
            .and_then(|doc| doc.get("info"))
            .map(|info| {
                ["author_email", "maintainer_email"]
                    .iter()
                    .filter_map(|key| info.get(*key).and_then(|v| v.as_str()))
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default(),
    };

    emails.iter().any(|email| {
        policy
            .disposable_email_domains
            .iter()
            .any(|domain| email.ends_with(&format!("@{domain}")))
    })
}

fn maintainer_account_age_days(candidate: &PackageCandidate) -> Option<i64> {
    candidate
        .raw_metadata
        .as_ref()
        .and_then(|m| match m {
            crate::model::RawMetadata::Npm(doc) => doc.get("maintainer_account_age_days"),
            crate::model::RawMetadata::PyPI(doc) => doc.get("maintainer_account_age_days"),
        })
        .and_then(serde_json::Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMetadata;
    use chrono::Utc;

    fn npm_candidate(maintainers_count: u32, raw: Option<RawMetadata>) -> PackageCandidate {
        PackageCandidate::new(
            Ecosystem::Npm,
            "somepkg",
            "1.0.0",
            Utc::now(),
            None,
            None,
            maintainers_count,
            false,
            None,
            raw,
        )
    }

    #[test]
    fn single_maintainer_scores_one() {
        let policy = Policy::default();
        let (score, _) = maintainer_reputation(&npm_candidate(1, None), &policy);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn two_maintainers_scores_half() {
        let policy = Policy::default();
        let (score, _) = maintainer_reputation(&npm_candidate(2, None), &policy);
        assert_eq!(score, 0.5);
    }

    #[test]
    fn many_maintainers_scores_zero() {
        let policy = Policy::default();
        let (score, _) = maintainer_reputation(&npm_candidate(5, None), &policy);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn disposable_email_forces_max_score() {
        let policy = Policy::default();
        let raw = RawMetadata::Npm(serde_json::json!({
            "maintainers": [{ "name": "x", "email": "person@mailinator.com" }]
        }));
        let (score, reasons) = maintainer_reputation(&npm_candidate(5, Some(raw)), &policy);
        assert_eq!(score, 1.0);
        assert!(reasons.iter().any(|r| r.contains("disposable")));
    }

    #[test]
    fn young_maintainer_account_adds_bonus() {
        let policy = Policy::default();
        let raw = RawMetadata::Npm(serde_json::json!({ "maintainer_account_age_days": 3 }));
        let (score, reasons) = maintainer_reputation(&npm_candidate(2, Some(raw)), &policy);
        assert!((score - 0.8).abs() < 1e-9);
        assert!(reasons.iter().any(|r| r.contains("day(s) old")));
    }
}
