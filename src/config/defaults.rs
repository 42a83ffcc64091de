//! Named policy presets.
//!
//! Mirrors the model repository's `ConfigPreset` pattern: a small closed set
//! of named starting points users can pick with `--preset`, layered under
//! any `policy.yml` overrides.

use crate::model::Policy;

/// Named policy presets for common triage postures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyPreset {
    /// Default balanced weights and thresholds.
    Balanced,
    /// Strict: existence gating on, higher minimum score, tighter fuzzy
    /// threshold — fewer but higher-confidence candidates.
    Strict,
    /// Permissive: existence gating off, lower minimum score, wider fuzzy
    /// threshold — casts a wider net for manual triage.
    Permissive,
}

impl PolicyPreset {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "balanced" | "default" => Some(Self::Balanced),
            "strict" => Some(Self::Strict),
            "permissive" | "loose" => Some(Self::Permissive),
            _ => None,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Balanced, Self::Strict, Self::Permissive]
    }
}

impl std::fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Policy {
    /// Build a `Policy` from a named preset.
    #[must_use]
    pub fn from_preset(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Balanced => Self::default(),
            PolicyPreset::Strict => Self::strict_preset(),
            PolicyPreset::Permissive => Self::permissive_preset(),
        }
    }

    fn strict_preset() -> Self {
        let mut policy = Self::default();
        policy.strict_existence = true;
        policy.min_score = 0.5;
        policy.thresholds.fuzzy_threshold = 10;
        policy
    }

    fn permissive_preset() -> Self {
        let mut policy = Self::default();
        policy.strict_existence = false;
        policy.min_score = 0.15;
        policy.thresholds.fuzzy_threshold = 25;
        policy
    }
}
