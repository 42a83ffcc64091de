//! Package candidates and the registry-specific metadata they carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two registries PhantomScan watches. Closed variant by design — see
/// the Non-goals in the project's scope ("covering ecosystems other than
/// PyPI and npm").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    PyPI,
    Npm,
}

impl Ecosystem {
    /// Lowercase string form, used in file paths, storage keys, and the
    /// `ecosystem:name` tie-break sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PyPI => "pypi",
            Self::Npm => "npm",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pypi" => Ok(Self::PyPI),
            "npm" => Ok(Self::Npm),
            other => Err(format!("unknown ecosystem: {other}")),
        }
    }
}

/// The registry-specific document a candidate was built from, retained
/// opaquely for enrichment. Per-variant accessors are the only sanctioned
/// way to read registry-specific fields; nothing outside this module should
/// match on the underlying JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "registry", rename_all = "lowercase")]
pub enum RawMetadata {
    PyPI(Value),
    Npm(Value),
}

impl RawMetadata {
    /// The `scripts` table of the latest npm version, or an empty object for
    /// PyPI candidates (which have no scripts).
    #[must_use]
    pub fn latest_scripts(&self) -> &Value {
        static EMPTY: Value = Value::Null;
        match self {
            Self::Npm(doc) => doc.get("latest_scripts").unwrap_or(&EMPTY),
            Self::PyPI(_) => &EMPTY,
        }
    }

    /// The `{versions, time, dist-tags}` packument subset for npm, used by
    /// the version-flip analysis. `None` for PyPI.
    #[must_use]
    pub fn packument_head(&self) -> Option<&Value> {
        match self {
            Self::Npm(doc) => doc.get("packument_head"),
            Self::PyPI(_) => None,
        }
    }

    /// The full PyPI JSON API response (`{info, releases, urls}`). `None`
    /// for npm.
    #[must_use]
    pub fn pypi_json(&self) -> Option<&Value> {
        match self {
            Self::PyPI(doc) => Some(doc),
            Self::Npm(_) => None,
        }
    }

    /// `project_urls` map for PyPI, or `None` for npm (npm has no such
    /// concept; homepage/repository cover the same ground).
    #[must_use]
    pub fn project_urls(&self) -> Option<&serde_json::Map<String, Value>> {
        self.pypi_json()?
            .get("info")?
            .get("project_urls")?
            .as_object()
    }

    /// npm `maintainers` array, if present.
    #[must_use]
    pub fn npm_maintainers(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Npm(doc) => doc.get("maintainers").and_then(Value::as_array),
            Self::PyPI(_) => None,
        }
    }
}

/// A normalised view of one package observed during ingestion.
///
/// Invariants: `name` is lowercased and non-empty at construction time;
/// `created_at` is always assigned (falls back to "now" if the source had
/// no timestamp); `raw_metadata` is never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageCandidate {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub maintainers_count: u32,
    /// npm only; true if `install`, `preinstall`, or `postinstall` exists in
    /// the latest version's script table. Always `false` for PyPI.
    pub has_install_scripts: bool,
    pub description: Option<String>,
    pub raw_metadata: Option<RawMetadata>,
}

impl PackageCandidate {
    /// Build a candidate, normalising `name` to lowercase and non-empty.
    ///
    /// # Panics
    /// Panics if `name` is empty after trimming — callers are expected to
    /// have already filtered out blank names during parsing.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ecosystem: Ecosystem,
        name: impl Into<String>,
        version: impl Into<String>,
        created_at: DateTime<Utc>,
        homepage: Option<String>,
        repository: Option<String>,
        maintainers_count: u32,
        has_install_scripts: bool,
        description: Option<String>,
        raw_metadata: Option<RawMetadata>,
    ) -> Self {
        let name = name.into().trim().to_lowercase();
        assert!(!name.is_empty(), "package candidate name must not be empty");
        Self {
            ecosystem,
            name,
            version: version.into(),
            created_at,
            homepage,
            repository,
            maintainers_count,
            has_install_scripts,
            description,
            raw_metadata,
        }
    }

    /// The identity this candidate is addressed by: `(date, ecosystem, name)`
    /// minus the date, which the persistence layer supplies separately.
    #[must_use]
    pub fn identity(&self) -> (Ecosystem, &str) {
        (self.ecosystem, self.name.as_str())
    }

    /// Age in whole days relative to `now`, floored at zero.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(0)
    }
}
