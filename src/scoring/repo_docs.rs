//! Repo-missing and docs-absence signals (§4.3).

use crate::model::{Ecosystem, PackageCandidate};

/// Repo missing: neither homepage nor repository ⇒ 1.0; exactly one ⇒ 0.5;
/// both ⇒ 0.
#[must_use]
pub fn repo_missing(candidate: &PackageCandidate) -> (f64, Option<String>) {
    let present = usize::from(candidate.homepage.is_some()) + usize::from(candidate.repository.is_some());
    match present {
        0 => (1.0, Some("no homepage or repository listed".to_string())),
        1 => (0.5, Some("only one of homepage/repository listed".to_string())),
        _ => (0.0, None),
    }
}

/// Docs absence: PyPI candidates look for a `Documentation`/`Docs` key in
/// `project_urls`; npm candidates (which have no `project_urls`) fall back
/// to homepage/repository presence as a proxy.
#[must_use]
pub fn docs_absence(candidate: &PackageCandidate) -> (f64, Option<String>) {
    match candidate.ecosystem {
        Ecosystem::PyPI => {
            let has_docs_url = candidate
                .raw_metadata
                .as_ref()
                .and_then(|m| m.project_urls())
                .is_some_and(|urls| {
                    urls.keys()
                        .any(|k| matches!(k.to_lowercase().as_str(), "documentation" | "docs"))
                });
            if has_docs_url {
                (0.0, None)
            } else {
                partial_presence_score(candidate)
            }
        }
        Ecosystem::Npm => partial_presence_score(candidate),
    }
}

fn partial_presence_score(candidate: &PackageCandidate) -> (f64, Option<String>) {
    let present = usize::from(candidate.homepage.is_some()) + usize::from(candidate.repository.is_some());
    match present {
        0 => (1.0, Some("no documentation, homepage, or repository found".to_string())),
        1 => (0.5, Some("no documentation URL; only partial homepage/repository".to_string())),
        _ => (0.0, None),
    }
}
