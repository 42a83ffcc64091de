//! npm weekly downloads and the download-anomaly signal (§4.5).

use crate::model::{Ecosystem, PackageCandidate, Policy};
use chrono::{DateTime, Utc};

#[cfg(feature = "enrichment")]
pub fn weekly_downloads(candidate: &PackageCandidate, policy: &Policy) -> u64 {
    if candidate.ecosystem != Ecosystem::Npm {
        return 0;
    }
    (|| -> Option<u64> {
        let client = super::http::client(policy)?;
        let url = format!(
            "https://api.npmjs.org/downloads/point/last-week/{}",
            candidate.name
        );
        let response = client.get(&url).send().ok()?;
        if response.status().as_u16() == 404 {
            return Some(0);
        }
        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().ok()?;
        body.get("downloads").and_then(serde_json::Value::as_u64)
    })()
    .unwrap_or(0)
}

#[cfg(not(feature = "enrichment"))]
pub fn weekly_downloads(_candidate: &PackageCandidate, _policy: &Policy) -> u64 {
    0
}

/// Download anomaly (§4.5): a brand-new package with already-high weekly
/// downloads, or a recently-new package whose downloads overshoot the
/// established-package floor, both suggest inflated/purchased installs.
#[must_use]
pub fn download_anomaly(
    candidate: &PackageCandidate,
    downloads: u64,
    policy: &Policy,
    now: DateTime<Utc>,
) -> (f64, Option<String>) {
    let age_days = candidate.age_days(now);
    let new_floor = policy.thresholds.download_anomaly_new_floor;
    let established_floor = policy.thresholds.download_anomaly_established_floor;

    if age_days < 7 && downloads >= new_floor {
        let score = (downloads as f64 / 10_000.0).min(1.0);
        return (
            score,
            Some(format!(
                "brand-new package ({age_days}d old) already has {downloads} weekly downloads"
            )),
        );
    }

    if (7..=30).contains(&age_days) && downloads > established_floor {
        let score = ((downloads - established_floor) as f64 / 50_000.0).min(1.0);
        return (
            score,
            Some(format!(
                "{age_days}d-old package has {downloads} weekly downloads, above the established-package floor"
            )),
        );
    }

    (0.0, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(age_days: i64) -> PackageCandidate {
        PackageCandidate::new(
            Ecosystem::Npm,
            "somepkg",
            "1.0.0",
            Utc::now() - chrono::Duration::days(age_days),
            None,
            None,
            1,
            false,
            None,
            None,
        )
    }

    #[test]
    fn brand_new_with_low_downloads_is_not_anomalous() {
        let (score, reason) = download_anomaly(&candidate(1), 50, &Policy::default(), Utc::now());
        assert_eq!(score, 0.0);
        assert!(reason.is_none());
    }

    #[test]
    fn brand_new_with_high_downloads_is_anomalous() {
        let (score, reason) = download_anomaly(&candidate(1), 5000, &Policy::default(), Utc::now());
        assert!(score > 0.0);
        assert!(reason.is_some());
    }

    #[test]
    fn established_new_package_past_floor_scores() {
        let (score, reason) = download_anomaly(&candidate(20), 20_000, &Policy::default(), Utc::now());
        assert!(score > 0.0);
        assert!(reason.is_some());
    }

    #[test]
    fn old_package_is_never_anomalous() {
        let (score, reason) = download_anomaly(&candidate(365), 1_000_000, &Policy::default(), Utc::now());
        assert_eq!(score, 0.0);
        assert!(reason.is_none());
    }
}
