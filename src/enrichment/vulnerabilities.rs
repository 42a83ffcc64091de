//! OSV vulnerability check (§4.5): a single best-effort query, collapsed
//! to a boolean flag rather than the full vulnerability record the OSV API
//! can return — PhantomScan only needs "does this release have any known
//! vulnerabilities published against it".

use crate::model::{PackageCandidate, Policy};

const OSV_ECOSYSTEM_PYPI: &str = "PyPI";
const OSV_ECOSYSTEM_NPM: &str = "npm";

#[cfg(feature = "enrichment")]
pub fn has_known_vulnerabilities(candidate: &PackageCandidate, policy: &Policy) -> Option<String> {
    let client = super::http::client(policy)?;
    let ecosystem = match candidate.ecosystem {
        crate::model::Ecosystem::PyPI => OSV_ECOSYSTEM_PYPI,
        crate::model::Ecosystem::Npm => OSV_ECOSYSTEM_NPM,
    };
    let body = serde_json::json!({
        "package": { "name": candidate.name, "ecosystem": ecosystem }
    });
    let response = super::http::post_json(&client, "https://api.osv.dev/v1/query", &body)?;
    let vulns = response.get("vulns")?.as_array()?;
    if vulns.is_empty() {
        None
    } else {
        Some(format!("{} known vulnerability record(s) on OSV", vulns.len()))
    }
}

#[cfg(not(feature = "enrichment"))]
pub fn has_known_vulnerabilities(_candidate: &PackageCandidate, _policy: &Policy) -> Option<String> {
    None
}
