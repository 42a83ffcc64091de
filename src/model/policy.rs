//! Policy: weights, thresholds, pattern catalogues, and network settings.
//!
//! Loaded once at start-up from `policy.yml` (or the built-in default) and
//! treated as immutable, process-wide state for the duration of a run — see
//! the design note on global state in `SPEC_FULL.md` §9.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight applied to each of the twelve subscores when folding them into
/// `ScoredCandidate::total`. Missing weights default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Weights {
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
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            name_suspicion: 0.20,
            known_hallucination: 0.15,
            content_risk: 0.15,
            script_risk: 0.10,
            newness: 0.08,
            repo_missing: 0.08,
            maintainer_reputation: 0.08,
            docs_absence: 0.04,
            provenance_risk: 0.04,
            repo_asymmetry: 0.03,
            download_anomaly: 0.03,
            version_flip: 0.02,
        }
    }
}

impl Weights {
    /// Look up a weight by subscore name, defaulting to zero for unknown
    /// names (per §4.6 step 4, "missing weights default to 0").
    #[must_use]
    pub fn get(&self, subscore: &str) -> f64 {
        match subscore {
            "name_suspicion" => self.name_suspicion,
            "known_hallucination" => self.known_hallucination,
            "content_risk" => self.content_risk,
            "script_risk" => self.script_risk,
            "newness" => self.newness,
            "repo_missing" => self.repo_missing,
            "maintainer_reputation" => self.maintainer_reputation,
            "docs_absence" => self.docs_absence,
            "provenance_risk" => self.provenance_risk,
            "repo_asymmetry" => self.repo_asymmetry,
            "download_anomaly" => self.download_anomaly,
            "version_flip" => self.version_flip,
            _ => 0.0,
        }
    }
}

/// Numeric thresholds governing signal behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Thresholds {
    /// Window (days) within which a package counts as "new". Confirmed
    /// against the reference implementation's test suite.
    pub new_package_days: i64,
    /// Maximum edit-distance (on a 0-100 scale) for the fuzzy name-match
    /// bonus to fire.
    pub fuzzy_threshold: u32,
    /// Rolling window (days) for version-flip analysis.
    pub version_flip_window_days: i64,
    /// Dependency-count delta (PyPI version flip) that alone scores ≥ 0.6.
    pub version_flip_dep_increase: u32,
    /// Maintainer account age (days) below which the age modifier fires.
    pub maintainer_age_floor_days: i64,
    /// Weekly-download floor for a brand-new package (< 7d) to be flagged.
    pub download_anomaly_new_floor: u64,
    /// Weekly-download floor for a 7-30 day-old package to be flagged.
    pub download_anomaly_established_floor: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            new_package_days: 30,
            fuzzy_threshold: 15,
            version_flip_window_days: 30,
            version_flip_dep_increase: 5,
            maintainer_age_floor_days: 30,
            download_anomaly_new_floor: 1000,
            download_anomaly_established_floor: 10_000,
        }
    }
}

/// Network-level configuration: timeouts, retries, user agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NetworkConfig {
    pub user_agent: String,
    /// Timeout (seconds) for registry and enrichment HTTP calls.
    pub registry_timeout_seconds: u64,
    /// Timeout (seconds) for individual enrichment provider calls.
    pub enrichment_timeout_seconds: u64,
    /// Retry attempts for transient transport failures.
    pub retries: u32,
    /// Overall deadline (seconds) for a single `ScorePackage` call.
    pub score_deadline_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            registry_timeout_seconds: 4,
            enrichment_timeout_seconds: 8,
            retries: 3,
            score_deadline_seconds: 8,
        }
    }
}

/// Per-provider enrichment toggles.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EnrichmentToggles {
    pub repo_facts: bool,
    pub vulnerabilities: bool,
    pub dependents: bool,
    pub downloads: bool,
    pub provenance: bool,
    pub version_flip: bool,
    pub content_scan: bool,
}

impl Default for EnrichmentToggles {
    fn default() -> Self {
        Self {
            repo_facts: true,
            vulnerabilities: true,
            dependents: true,
            downloads: true,
            provenance: true,
            version_flip: true,
            content_scan: true,
        }
    }
}

/// Concurrency bounds for the orchestrator's worker pools (§5).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub fetch_concurrency: usize,
    pub score_concurrency: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: 8,
            score_concurrency: 8,
        }
    }
}

/// The top-level policy document, deserialized from `policy.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Policy {
    pub weights: Weights,
    pub thresholds: Thresholds,
    pub network: NetworkConfig,
    pub enrichment: EnrichmentToggles,
    pub concurrency: ConcurrencyConfig,
    /// Suspicious name prefixes (e.g. well-known AI/infra brand names).
    pub suspicious_prefixes: Vec<String>,
    /// Suspicious name suffixes/tropes (e.g. "-cli", "-utils").
    pub suspicious_suffixes: Vec<String>,
    /// Domains treated as disposable/throwaway email providers.
    pub disposable_email_domains: Vec<String>,
    /// Canonical (trusted) package names per ecosystem, used as the anchor
    /// set for fuzzy name-similarity comparison and alternative suggestion.
    pub canonical_names: HashMap<String, Vec<String>>,
    /// Strict existence gating: when true, names that don't resolve in
    /// their registry are routed to the watchlist instead of being scored.
    pub strict_existence: bool,
    /// Number of top-ranked candidates to emit in the daily feed.
    pub top_n: usize,
    /// Minimum `total` for a candidate to appear in the feed.
    pub min_score: f64,
    /// Days of persisted data to retain before cleanup.
    pub retention_days: i64,
    /// libraries.io API key, if dependents enrichment is to run for real.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libraries_io_api_key: Option<String>,
}

impl Default for Policy {
    fn default() -> Self {
        let mut canonical_names = HashMap::new();
        canonical_names.insert(
            "pypi".to_string(),
            vec![
                "requests".to_string(),
                "numpy".to_string(),
                "pandas".to_string(),
                "flask".to_string(),
                "django".to_string(),
                "openai".to_string(),
            ],
        );
        canonical_names.insert(
            "npm".to_string(),
            vec![
                "react".to_string(),
                "express".to_string(),
                "lodash".to_string(),
                "axios".to_string(),
                "openai".to_string(),
            ],
        );

        Self {
            weights: Weights::default(),
            thresholds: Thresholds::default(),
            network: NetworkConfig::default(),
            enrichment: EnrichmentToggles::default(),
            concurrency: ConcurrencyConfig::default(),
            suspicious_prefixes: vec![
                "openai".to_string(),
                "anthropic".to_string(),
                "google".to_string(),
                "microsoft".to_string(),
                "aws".to_string(),
            ],
            suspicious_suffixes: vec![
                "-cli".to_string(),
                "-utils".to_string(),
                "-helper".to_string(),
                "-sdk".to_string(),
                "-official".to_string(),
            ],
            disposable_email_domains: vec![
                "mailinator.com".to_string(),
                "10minutemail.com".to_string(),
                "guerrillamail.com".to_string(),
                "tempmail.com".to_string(),
            ],
            canonical_names,
            strict_existence: false,
            top_n: 50,
            min_score: 0.3,
            retention_days: 90,
            libraries_io_api_key: None,
        }
    }
}

impl Policy {
    /// Parse a policy document from YAML text.
    pub fn from_yaml(text: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Validate invariants that must hold before a run starts: weights
    /// non-negative, thresholds positive. Fatal at start-up only (§7).
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::{PhantomScanError, PolicyErrorKind};

        for (name, value) in [
            ("name_suspicion", self.weights.name_suspicion),
            ("known_hallucination", self.weights.known_hallucination),
            ("content_risk", self.weights.content_risk),
            ("script_risk", self.weights.script_risk),
            ("newness", self.weights.newness),
            ("repo_missing", self.weights.repo_missing),
            ("maintainer_reputation", self.weights.maintainer_reputation),
            ("docs_absence", self.weights.docs_absence),
            ("provenance_risk", self.weights.provenance_risk),
            ("repo_asymmetry", self.weights.repo_asymmetry),
            ("download_anomaly", self.weights.download_anomaly),
            ("version_flip", self.weights.version_flip),
        ] {
            if value < 0.0 {
                return Err(PhantomScanError::policy(
                    "weight validation",
                    PolicyErrorKind::WeightOutOfRange {
                        subscore: name.to_string(),
                        value,
                    },
                ));
            }
        }

        if self.thresholds.new_package_days < 0 || self.thresholds.version_flip_window_days < 0 {
            return Err(PhantomScanError::policy(
                "threshold validation",
                PolicyErrorKind::InvalidCorpus("thresholds must be non-negative".to_string()),
            ));
        }

        Ok(())
    }

    /// JSON Schema for this policy document, used by `phantomscan config schema`.
    #[must_use]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Policy)
    }
}
