//! Provenance signal (§4.5): npm attestations/signatures vs. PyPI, which
//! has no equivalent provenance attestation mechanism yet.

use crate::model::{Ecosystem, PackageCandidate};

/// npm: `attestations` present on the latest dist ⇒ 0 (fully provenanced);
/// `signatures` present ⇒ 0.2 (partially provenanced); neither ⇒ 1.
/// PyPI: always neutral (0), since PyPI has not adopted a provenance
/// attestation standard as of this writing.
#[must_use]
pub fn provenance_risk(candidate: &PackageCandidate) -> (f64, Option<String>) {
    match candidate.ecosystem {
        Ecosystem::PyPI => (0.0, None),
        Ecosystem::Npm => {
            let dist = candidate
                .raw_metadata
                .as_ref()
                .and_then(|m| m.packument_head())
                .and_then(|head| head.get("dist"));

            let has_attestations = dist
                .and_then(|d| d.get("attestations"))
                .is_some_and(|v| !v.is_null());
            let has_signatures = dist
                .and_then(|d| d.get("signatures"))
                .and_then(|v| v.as_array())
                .is_some_and(|v| !v.is_empty());

            if has_attestations {
                (0.0, None)
            } else if has_signatures {
                (0.2, Some("release has registry signatures but no attestations".to_string()))
            } else {
                (1.0, Some("release has no provenance attestations or signatures".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMetadata;
    use chrono::Utc;

    fn candidate(raw: Option<RawMetadata>) -> PackageCandidate {
        PackageCandidate::new(
            Ecosystem::Npm,
            "somepkg",
            "1.0.0",
            Utc::now(),
            None,
            None,
            1,
            false,
            None,
            raw,
        )
    }

    #[test]
    fn pypi_is_always_neutral() {
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI,
            "somepkg",
            "1.0.0",
            Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        );
        assert_eq!(provenance_risk(&candidate), (0.0, None));
    }

    #[test]
    fn npm_with_attestations_scores_zero() {
        let raw = RawMetadata::Npm(serde_json::json!({
            "packument_head": { "dist": { "attestations": { "url": "https://example.com" } } }
        }));
        let (score, _) = provenance_risk(&candidate(Some(raw)));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn npm_with_only_signatures_scores_partial() {
        let raw = RawMetadata::Npm(serde_json::json!({
            "packument_head": { "dist": { "signatures": [{"keyid": "x"}] } }
        }));
        let (score, _) = provenance_risk(&candidate(Some(raw)));
        assert_eq!(score, 0.2);
    }

    #[test]
    fn npm_with_neither_scores_max() {
        let (score, reason) = provenance_risk(&candidate(None));
        assert_eq!(score, 1.0);
        assert!(reason.is_some());
    }
}
