//! `phantomscan analyze --ecosystem --name [--alternatives]`: score one
//! named package on demand, the `ScorePackage` operation of §6.

use crate::error::{PhantomScanError, Result};
use crate::matching::suggest_alternatives;
use crate::model::{Corpus, Ecosystem, PackageCandidate, Policy, ScoredCandidate};
use chrono::Utc;

pub struct AnalyzeOutcome {
    pub scored: ScoredCandidate,
    /// `(canonical_name, similarity)` pairs, only populated when requested.
    pub alternatives: Vec<(String, f64)>,
}

/// Fetch `name`'s current metadata and score it. Errors only when the
/// package cannot be found at all (offline mode, or a genuine 404) — a
/// found-but-suspicious package is not an error, it is exactly what this
/// command exists to surface.
pub fn run_analyze(
    ecosystem: Ecosystem,
    name: &str,
    include_alternatives: bool,
    policy: &Policy,
    corpus: &Corpus,
) -> Result<AnalyzeOutcome> {
    let candidate = crate::sources::fetch_by_name(ecosystem, name).ok_or_else(|| {
        PhantomScanError::registry(
            format!("{ecosystem}:{name}"),
            crate::error::RegistryErrorKind::UnexpectedStatus {
                status: 404,
                body: "package not found (or running offline)".to_string(),
            },
        )
    })?;

    let now = Utc::now();
    let mut breakdown = crate::scoring::score_metadata_signals(&candidate, policy, corpus, now);
    let (exists, reason) = crate::registry::exists_in_registry(ecosystem, name, policy);
    breakdown.exists = Some(exists);
    if !exists {
        breakdown.not_found_reason = Some(reason.to_string());
    }

    #[cfg(feature = "enrichment")]
    crate::enrichment::enrich(&candidate, policy, now, &mut breakdown);
    breakdown.clamp();

    let total: f64 = breakdown
        .subscores()
        .iter()
        .map(|(subscore, value)| policy.weights.get(subscore) * value)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let alternatives = if include_alternatives {
        let canonical = policy
            .canonical_names
            .get(ecosystem.as_str())
            .cloned()
            .unwrap_or_default();
        let ratio_threshold = 100.0 - f64::from(policy.thresholds.fuzzy_threshold);
        suggest_alternatives(&candidate.name, &canonical, ratio_threshold)
    } else {
        Vec::new()
    };

    Ok(AnalyzeOutcome {
        scored: ScoredCandidate {
            candidate,
            breakdown,
            total,
            scored_at: now,
        },
        alternatives,
    })
}
