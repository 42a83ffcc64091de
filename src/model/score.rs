//! Scoring output: the twelve-subscore breakdown and the scored candidate.

use super::candidate::PackageCandidate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The twelve domain signals fired by the scorer, each clamped to `[0, 1]`,
/// plus the reasons that justified them and the outcome of the existence
/// probe (when one was run).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub name_suspicion: f64,
    pub known_hallucination: f64,
    pub content_risk: f64,
    pub script_risk: f64,
    pub newness: f64,
    pub repo_missing: f64,
    pub maintainer_reputation: f64,
    pub docs_absence: f64,
    pub provenance_risk: f64,
    pub repo_asymmetry: f64,
    pub download_anomaly: f64,
    pub version_flip: f64,
    /// Ordered, append-only union of every reason produced by a
    /// contributing subscore.
    pub reasons: Vec<String>,
    /// Result of the existence probe, when the pipeline ran one.
    pub exists: Option<bool>,
    pub not_found_reason: Option<String>,
}

impl ScoreBreakdown {
    /// Clamp every subscore into `[0, 1]`. Called once after all signals
    /// and enrichments have fired, per the scorer's algorithm (§4.6 step 3).
    pub fn clamp(&mut self) {
        for field in [
            &mut self.name_suspicion,
            &mut self.known_hallucination,
            &mut self.content_risk,
            &mut self.script_risk,
            &mut self.newness,
            &mut self.repo_missing,
            &mut self.maintainer_reputation,
            &mut self.docs_absence,
            &mut self.provenance_risk,
            &mut self.repo_asymmetry,
            &mut self.download_anomaly,
            &mut self.version_flip,
        ] {
            *field = field.clamp(0.0, 1.0);
        }
    }

    /// Append a reason if non-empty; keeps the union append-only and
    /// de-duplicated against the immediately preceding entry (signals may
    /// be invoked more than once in tests).
    pub fn push_reason(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if !reason.is_empty() && self.reasons.last() != Some(&reason) {
            self.reasons.push(reason);
        }
    }

    /// Iterate `(subscore_name, value)` pairs in the fixed order the scorer
    /// fires them in — used by the weighted-sum fold and by CSV/JSON output.
    #[must_use]
    pub fn subscores(&self) -> [(&'static str, f64); 12] {
        [
            ("name_suspicion", self.name_suspicion),
            ("known_hallucination", self.known_hallucination),
            ("content_risk", self.content_risk),
            ("script_risk", self.script_risk),
            ("newness", self.newness),
            ("repo_missing", self.repo_missing),
            ("maintainer_reputation", self.maintainer_reputation),
            ("docs_absence", self.docs_absence),
            ("provenance_risk", self.provenance_risk),
            ("repo_asymmetry", self.repo_asymmetry),
            ("download_anomaly", self.download_anomaly),
            ("version_flip", self.version_flip),
        ]
    }
}

/// A fully scored candidate, ready for ranking and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: PackageCandidate,
    pub breakdown: ScoreBreakdown,
    /// Weighted sum of subscores, clamped to `[0, 1]`.
    pub total: f64,
    pub scored_at: DateTime<Utc>,
}

impl ScoredCandidate {
    /// The `ecosystem:name` key used as the final tie-break in ranking
    /// (§4.7 step 4).
    #[must_use]
    pub fn sort_key(&self) -> String {
        format!("{}:{}", self.candidate.ecosystem, self.candidate.name)
    }
}
