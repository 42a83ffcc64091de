//! libraries.io dependents hint (§4.5): a reputation multiplier based on
//! how many other packages depend on this one. Only meaningful alongside
//! `maintainer_reputation`, since a widely-depended-on package with few
//! maintainers is a different risk profile than an unknown one.

use crate::model::{PackageCandidate, Policy};

const HIGH_DEPENDENTS_THRESHOLD: u64 = 1000;

#[cfg(feature = "enrichment")]
pub fn dependents_adjustment(candidate: &PackageCandidate, policy: &Policy) -> Option<(f64, String)> {
    let api_key = policy.libraries_io_api_key.as_ref()?;
    let client = super::http::client(policy)?;
    let platform = match candidate.ecosystem {
        crate::model::Ecosystem::PyPI => "Pypi",
        crate::model::Ecosystem::Npm => "NPM",
    };
    let url = format!(
        "https://libraries.io/api/{platform}/{}/dependents?api_key={api_key}",
        candidate.name
    );
    let response = client.get(&url).send().ok()?;
    if !response.status().is_success() {
        return None;
    }
    let total = response
        .headers()
        .get("X-Total")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let count = match total {
        Some(total) => total,
        None => response.json::<Vec<serde_json::Value>>().ok()?.len() as u64,
    };

    adjustment_for_count(count)
}

fn adjustment_for_count(count: u64) -> Option<(f64, String)> {
    if count == 0 {
        None
    } else if count >= HIGH_DEPENDENTS_THRESHOLD {
        Some((0.7, format!("{count} dependents on libraries.io")))
    } else {
        Some((0.85, format!("{count} dependents on libraries.io")))
    }
}

#[cfg(not(feature = "enrichment"))]
pub fn dependents_adjustment(_candidate: &PackageCandidate, _policy: &Policy) -> Option<(f64, String)> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dependents_makes_no_adjustment() {
        assert_eq!(adjustment_for_count(0), None);
    }

    #[test]
    fn high_dependents_applies_strong_multiplier() {
        let (multiplier, _) = adjustment_for_count(2000).unwrap();
        assert_eq!(multiplier, 0.7);
    }

    #[test]
    fn low_nonzero_dependents_applies_mild_multiplier() {
        let (multiplier, _) = adjustment_for_count(5).unwrap();
        assert_eq!(multiplier, 0.85);
    }
}
