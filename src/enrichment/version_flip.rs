//! Version-flip signal (§4.5): did the most recent release change
//! behaviour in a way that smells like a bait-and-switch — a clean
//! initial release followed by a version that adds install scripts or
//! otherwise changes shape?
//!
//! The npm path is fully grounded in data the source adapter already
//! fetches (`packument_head`'s `time`/`versions` maps). The PyPI path is
//! deliberately partial: the PyPI JSON API's `releases` map only carries
//! distribution file listings, not per-release metadata, so comparing
//! `requires_dist` or entry points across versions would need one extra
//! HTTP fetch per historical release. Rather than add an unbounded-fanout
//! provider, this only fires the project-URL-change check, and only when
//! the source adapter has populated an optional `previous_project_urls`
//! field — see DESIGN.md for the Open Question this resolves.

use crate::model::{Ecosystem, PackageCandidate, Policy};
use chrono::{DateTime, Utc};

#[must_use]
pub fn version_flip_risk(candidate: &PackageCandidate, policy: &Policy, now: DateTime<Utc>) -> (f64, Option<String>) {
    match candidate.ecosystem {
        Ecosystem::Npm => npm_version_flip(candidate, policy, now),
        Ecosystem::PyPI => pypi_version_flip(candidate),
    }
}

fn npm_version_flip(candidate: &PackageCandidate, policy: &Policy, now: DateTime<Utc>) -> (f64, Option<String>) {
    let Some(head) = candidate.raw_metadata.as_ref().and_then(|m| m.packument_head()) else {
        return (0.0, None);
    };
    let Some(time) = head.get("time").and_then(|t| t.as_object()) else {
        return (0.0, None);
    };
    let Some(versions) = head.get("versions").and_then(|v| v.as_object()) else {
        return (0.0, None);
    };

    let window_start = now - chrono::Duration::days(policy.thresholds.version_flip_window_days);

    let mut prior_versions: Vec<(&String, DateTime<Utc>)> = time
        .iter()
        .filter(|(version, _)| version.as_str() != candidate.version && version.as_str() != "created" && version.as_str() != "modified")
        .filter_map(|(version, ts)| {
            let published_at: DateTime<Utc> = ts.as_str()?.parse().ok()?;
            (published_at >= window_start && published_at <= now).then_some((version, published_at))
        })
        .collect();
    prior_versions.sort_by_key(|(_, published_at)| *published_at);

    let Some((prior_version, _)) = prior_versions.last() else {
        return (0.0, None);
    };

    let latest_has_scripts = candidate.has_install_scripts;
    let prior_has_scripts = versions
        .get(prior_version.as_str())
        .and_then(|v| v.get("scripts"))
        .and_then(|s| s.as_object())
        .is_some_and(|scripts| {
            ["install", "preinstall", "postinstall"]
                .iter()
                .any(|name| scripts.contains_key(*name))
        });

    if latest_has_scripts && !prior_has_scripts {
        (
            0.7,
            Some(format!(
                "version {} added an install script that {prior_version} did not have",
                candidate.version
            )),
        )
    } else {
        (0.0, None)
    }
}

fn pypi_version_flip(candidate: &PackageCandidate) -> (f64, Option<String>) {
    let Some(doc) = candidate.raw_metadata.as_ref().and_then(|m| m.pypi_json()) else {
        return (0.0, None);
    };

    let current_urls = candidate
        .raw_metadata
        .as_ref()
        .and_then(|m| m.project_urls())
        .map(|m| m.keys().cloned().collect::<std::collections::BTreeSet<_>>())
        .unwrap_or_default();
    let previous_urls: std::collections::BTreeSet<String> = doc
        .get("previous_project_urls")
        .and_then(|v| v.as_object())
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();

    if previous_urls.is_empty() || current_urls == previous_urls {
        return (0.0, None);
    }

    (0.5, Some("project URLs changed materially since the prior release".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMetadata;

    #[test]
    fn npm_flip_detects_newly_added_install_script() {
        let now = Utc::now();
        let prior_time = (now - chrono::Duration::days(5)).to_rfc3339();
        let raw = RawMetadata::Npm(serde_json::json!({
            "packument_head": {
                "time": { "0.9.0": prior_time },
                "versions": { "0.9.0": { "scripts": {} } }
            }
        }));
        let candidate = PackageCandidate::new(
            Ecosystem::Npm,
            "somepkg",
            "1.0.0",
            now,
            None,
            None,
            1,
            true,
            None,
            Some(raw),
        );
        let (score, reason) = version_flip_risk(&candidate, &Policy::default(), now);
        assert_eq!(score, 0.7);
        assert!(reason.is_some());
    }

    #[test]
    fn npm_flip_is_silent_without_packument_head() {
        let now = Utc::now();
        let candidate = PackageCandidate::new(
            Ecosystem::Npm, "somepkg", "1.0.0", now, None, None, 1, true, None, None,
        );
        assert_eq!(version_flip_risk(&candidate, &Policy::default(), now), (0.0, None));
    }

    #[test]
    fn pypi_flip_is_neutral_without_previous_urls() {
        let raw = RawMetadata::PyPI(serde_json::json!({ "info": {} }));
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI, "somepkg", "1.0.0", Utc::now(), None, None, 1, false, None, Some(raw),
        );
        assert_eq!(version_flip_risk(&candidate, &Policy::default(), Utc::now()), (0.0, None));
    }
}
