//! Content risk (C4.a): static analysis of package artifacts (§4.4).
//!
//! npm linting is pure metadata analysis and always compiled in; the PyPI
//! sdist/wheel comparison needs network access to download artifacts, so
//! it only exists under the `enrichment` feature — with a neutral stub
//! otherwise, matching the "never aborts scoring" contract every other
//! enrichment provider follows.

mod npm;

pub use npm::content_risk_npm;

#[cfg(feature = "enrichment")]
mod pypi;

#[cfg(feature = "enrichment")]
pub use pypi::content_risk_pypi;

#[cfg(not(feature = "enrichment"))]
pub fn content_risk_pypi(
    _candidate: &crate::model::PackageCandidate,
    _policy: &crate::model::Policy,
) -> (f64, Vec<String>) {
    (0.0, Vec::new())
}
