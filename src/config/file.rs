//! Policy file discovery and loading, plus the offline-mode switch.

use crate::error::{ErrorContext, PhantomScanError, PolicyErrorKind, Result};
use crate::model::Policy;
use std::path::{Path, PathBuf};

/// Environment variable that forces offline mode: sources read from seed
/// files, the existence prober returns `(false, "offline")`, and every
/// enrichment short-circuits to its neutral value (§6 environment controls).
pub const OFFLINE_ENV_VAR: &str = "PHANTOMSCAN_OFFLINE";

/// Whether the global offline switch is set.
#[must_use]
pub fn is_offline_mode() -> bool {
    std::env::var(OFFLINE_ENV_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Search, in order, `./policy.yml`, `./policy.yaml`, and
/// `~/.config/phantomscan/policy.yml` for a policy document.
#[must_use]
pub fn discover_policy_file() -> Option<PathBuf> {
    for candidate in ["policy.yml", "policy.yaml"] {
        let path = PathBuf::from(candidate);
        if path.is_file() {
            return Some(path);
        }
    }
    dirs::config_dir()
        .map(|d| d.join("phantomscan").join("policy.yml"))
        .filter(|p| p.is_file())
}

/// Load policy from an explicit path, or fall back to discovery, or the
/// built-in default if nothing is found. Invalid YAML is a fatal
/// `PolicyError` per §7 ("invalid policy YAML ... fatal at start-up only").
pub fn load_policy(explicit_path: Option<&Path>) -> Result<Policy> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(discover_policy_file);

    let policy = match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .context(format!("reading policy file {}", path.display()))?;
            Policy::from_yaml(&text)
                .context(format!("parsing policy file {}", path.display()))?
        }
        None => Policy::default(),
    };

    policy.validate()?;
    Ok(policy)
}

/// Save a policy document to disk as YAML.
pub fn save_policy(policy: &Policy, path: &Path) -> Result<()> {
    let text = serde_yaml::to_string(policy).map_err(|e| {
        PhantomScanError::policy(
            "serializing policy",
            PolicyErrorKind::InvalidYaml(e.to_string()),
        )
    })?;
    std::fs::write(path, text).map_err(PhantomScanError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_mode_reads_env_var() {
        std::env::remove_var(OFFLINE_ENV_VAR);
        assert!(!is_offline_mode());
        std::env::set_var(OFFLINE_ENV_VAR, "true");
        assert!(is_offline_mode());
        std::env::remove_var(OFFLINE_ENV_VAR);
    }

    #[test]
    fn load_policy_falls_back_to_default_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.yml");
        // discover_policy_file only looks at CWD/config dir, not this path;
        // explicit_path pointing at a missing file should error instead of
        // silently falling back, so exercise the no-explicit-path branch.
        let _ = missing;
        let policy = load_policy(None).expect("default policy should load");
        assert_eq!(policy.thresholds.new_package_days, 30);
    }

    #[test]
    fn load_policy_rejects_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yml");
        std::fs::write(&path, "weights: [this, is, not, a, map]\n").unwrap();
        assert!(load_policy(Some(&path)).is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yml");
        let mut policy = Policy::default();
        policy.top_n = 7;
        save_policy(&policy, &path).unwrap();
        let loaded = load_policy(Some(&path)).unwrap();
        assert_eq!(loaded.top_n, 7);
    }
}
