//! GitHub repo facts and the repo-asymmetry signal (§4.5).

use crate::model::{PackageCandidate, Policy};
use chrono::{DateTime, Utc};

/// Facts pulled from a GitHub repository, used by `repo_asymmetry` and
/// available for other future signals.
#[derive(Debug, Clone)]
pub struct RepoFacts {
    pub repo_age_days: i64,
    pub has_topics: bool,
    pub recent_commit_activity: bool,
}

/// Parse `owner/repo` out of a repository URL, accepting the common GitHub
/// URL shapes (`https://github.com/o/r`, `git+https://...`, `.git` suffix).
#[must_use]
pub fn parse_github_owner_repo(url: &str) -> Option<(String, String)> {
    let trimmed = url
        .trim()
        .trim_start_matches("git+")
        .trim_end_matches(".git")
        .trim_end_matches('/');
    let after_host = trimmed.split("github.com").nth(1)?;
    let mut parts = after_host.trim_start_matches(['/', ':']).splitn(2, '/');
    let owner = parts.next()?.to_string();
    let repo = parts.next()?.split('/').next()?.to_string();
    if owner.is_empty() || repo.is_empty() {
        None
    } else {
        Some((owner, repo))
    }
}

#[cfg(feature = "enrichment")]
pub fn fetch(candidate: &PackageCandidate, policy: &Policy) -> Option<RepoFacts> {
    let repo_url = candidate.repository.as_deref()?;
    let (owner, repo) = parse_github_owner_repo(repo_url)?;
    let client = super::http::client(policy)?;

    let mut request = client.get(format!("https://api.github.com/repos/{owner}/{repo}"));
    if let Ok(token) = std::env::var("GITHUB_TOKEN").or_else(|_| std::env::var("GH_TOKEN")) {
        request = request.bearer_auth(token);
    }
    let response = request.send().ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body: serde_json::Value = response.json().ok()?;

    let created_at = body.get("created_at")?.as_str()?;
    let created_at: DateTime<Utc> = created_at.parse().ok()?;
    let repo_age_days = (Utc::now() - created_at).num_days().max(0);
    let has_topics = body
        .get("topics")
        .and_then(|t| t.as_array())
        .is_some_and(|t| !t.is_empty());
    let recent_commit_activity = body
        .get("pushed_at")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        .is_some_and(|pushed_at| (Utc::now() - pushed_at).num_days() <= 90);

    Some(RepoFacts {
        repo_age_days,
        has_topics,
        recent_commit_activity,
    })
}

#[cfg(not(feature = "enrichment"))]
pub fn fetch(_candidate: &PackageCandidate, _policy: &Policy) -> Option<RepoFacts> {
    None
}

/// Repo asymmetry (§4.5): `pkgAgeDays - repoAgeDays`, floored at 0 and
/// scaled by 30 days. A package materially older than its own repository
/// is suspicious (borrowed/backdated repo, or repo created after the fact).
#[must_use]
pub fn repo_asymmetry(
    candidate: &PackageCandidate,
    facts: &RepoFacts,
    _policy: &Policy,
    now: DateTime<Utc>,
) -> (f64, String) {
    let pkg_age_days = candidate.age_days(now);
    let diff = pkg_age_days - facts.repo_age_days;
    if diff <= 0 {
        (0.0, String::new())
    } else {
        let score = (diff as f64 / 30.0).min(1.0);
        (
            score,
            format!("package is {diff} day(s) older than its repository"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ecosystem;

    #[test]
    fn parses_standard_github_url() {
        assert_eq!(
            parse_github_owner_repo("https://github.com/psf/requests"),
            Some(("psf".to_string(), "requests".to_string()))
        );
    }

    #[test]
    fn parses_git_plus_scheme_and_dot_git_suffix() {
        assert_eq!(
            parse_github_owner_repo("git+https://github.com/psf/requests.git"),
            Some(("psf".to_string(), "requests".to_string()))
        );
    }

    #[test]
    fn rejects_non_github_url() {
        assert_eq!(parse_github_owner_repo("https://gitlab.com/psf/requests"), None);
    }

    #[test]
    fn asymmetry_is_zero_when_repo_is_older_or_equal() {
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI,
            "somepkg",
            "1.0.0",
            Utc::now() - chrono::Duration::days(10),
            None,
            Some("https://github.com/o/r".to_string()),
            1,
            false,
            None,
            None,
        );
        let facts = RepoFacts {
            repo_age_days: 100,
            has_topics: false,
            recent_commit_activity: true,
        };
        let (score, reason) = repo_asymmetry(&candidate, &facts, &Policy::default(), Utc::now());
        assert_eq!(score, 0.0);
        assert!(reason.is_empty());
    }

    #[test]
    fn asymmetry_scales_with_day_difference() {
        let candidate = PackageCandidate::new(
            Ecosystem::PyPI,
            "somepkg",
            "1.0.0",
            Utc::now() - chrono::Duration::days(100),
            None,
            Some("https://github.com/o/r".to_string()),
            1,
            false,
            None,
            None,
        );
        let facts = RepoFacts {
            repo_age_days: 10,
            has_topics: false,
            recent_commit_activity: true,
        };
        let (score, reason) = repo_asymmetry(&candidate, &facts, &Policy::default(), Utc::now());
        assert!(score > 0.0);
        assert!(reason.contains("older than its repository"));
    }
}
