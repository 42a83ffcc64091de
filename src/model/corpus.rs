//! Known-hallucination corpus: exact names and regex patterns.
//!
//! Loaded once at start-up and treated as immutable process-wide state —
//! unlike the reference implementation's module-global mutable cache, this
//! is an ordinary owned struct passed by reference into scoring.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// A document shape matching the corpus file on disk (YAML or JSON):
/// `{exact: [...], patterns: [...]}`.
#[derive(Debug, Deserialize)]
struct CorpusDocument {
    #[serde(default)]
    exact: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
}

/// Compiled known-hallucination corpus.
pub struct Corpus {
    exact: HashSet<String>,
    patterns: Vec<Regex>,
}

impl Corpus {
    /// Build an empty corpus (used as a safe fallback when no corpus file
    /// is configured).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            exact: HashSet::new(),
            patterns: Vec::new(),
        }
    }

    /// Parse and compile a corpus from YAML (or JSON, which is a YAML
    /// subset) text. Patterns are compiled case-insensitively once here;
    /// invalid patterns are rejected at load time, not silently dropped,
    /// since corpus loading is part of the fatal start-up path (§7,
    /// `PolicyError`).
    pub fn from_yaml(text: &str) -> crate::error::Result<Self> {
        use crate::error::{PhantomScanError, PolicyErrorKind};

        let doc: CorpusDocument = serde_yaml::from_str(text)?;
        let exact = doc.exact.into_iter().map(|n| n.to_lowercase()).collect();

        let mut patterns = Vec::with_capacity(doc.patterns.len());
        for raw in doc.patterns {
            let compiled = Regex::new(&format!("(?i){raw}")).map_err(|e| {
                PhantomScanError::policy(
                    "compiling corpus pattern",
                    PolicyErrorKind::InvalidCorpus(format!("{raw}: {e}")),
                )
            })?;
            patterns.push(compiled);
        }

        Ok(Self { exact, patterns })
    }

    /// Check whether `name` (any case) is a known hallucinated name, either
    /// by exact match or by matching one of the corpus regex patterns.
    /// Returns the literal name or the pattern source that matched, for
    /// inclusion in the reason string.
    #[must_use]
    pub fn matching(&self, name: &str) -> Option<String> {
        let lower = name.to_lowercase();
        if self.exact.contains(&lower) {
            return Some(lower);
        }
        self.patterns
            .iter()
            .find(|re| re.is_match(&lower))
            .map(|re| re.as_str().to_string())
    }
}
