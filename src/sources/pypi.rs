//! PyPI source adapter (§4.1).

use super::seed;
use crate::model::{Ecosystem, PackageCandidate, RawMetadata};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

const REPO_KEY_PRIORITY: [&str; 5] = ["Source", "Repository", "Code", "GitHub", "GitLab"];

/// Build a `PackageCandidate` from a PyPI package JSON document
/// (`{info, releases, urls}`), shared between the live fetch path and the
/// offline seed path.
#[must_use]
pub fn parse_pypi_record(doc: &Value) -> Option<PackageCandidate> {
    let info = doc.get("info")?;
    let name = info.get("name")?.as_str()?;
    let version = info.get("version").and_then(|v| v.as_str()).unwrap_or("0.0.0");

    let created_at = earliest_upload_time(doc).unwrap_or_else(Utc::now);

    let project_urls = info.get("project_urls").and_then(Value::as_object);
    let repository = project_urls.and_then(|urls| {
        REPO_KEY_PRIORITY
            .iter()
            .find_map(|key| urls.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });
    let homepage = info
        .get("home_page")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| project_urls.and_then(|urls| urls.values().find_map(Value::as_str)))
        .map(str::to_string);

    let description = info
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some(PackageCandidate::new(
        Ecosystem::PyPI,
        name,
        version,
        created_at,
        homepage,
        repository,
        1,
        false,
        description,
        Some(RawMetadata::PyPI(doc.clone())),
    ))
}

fn earliest_upload_time(doc: &Value) -> Option<DateTime<Utc>> {
    doc.get("releases")?
        .as_object()?
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|file| file.get("upload_time_iso_8601")?.as_str())
        .filter_map(|s| s.parse::<DateTime<Utc>>().ok())
        .min()
}

#[cfg(feature = "enrichment")]
fn build_client(policy_timeout: u64) -> Option<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(policy_timeout))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .ok()
}

#[cfg(feature = "enrichment")]
fn discover_names(client: &reqwest::blocking::Client) -> Vec<String> {
    let title_re = Regex::new(r"(?s)<title>(.*?)</title>").expect("static pattern compiles");
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();

    for url in ["https://pypi.org/rss/packages.xml", "https://pypi.org/rss/updates.xml"] {
        let Some(body) = super::with_retries(3, || client.get(url).send().ok()?.text().ok()) else {
            continue;
        };
        for (i, capture) in title_re.captures_iter(&body).enumerate() {
            if i == 0 {
                continue; // channel title, not a package entry
            }
            let Some(title) = capture.get(1) else { continue };
            let name = title.as_str().split_whitespace().next().unwrap_or("").to_lowercase();
            if !name.is_empty() && seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }
    names
}

#[cfg(feature = "enrichment")]
fn fetch_one(client: &reqwest::blocking::Client, name: &str) -> Option<PackageCandidate> {
    let url = format!("https://pypi.org/pypi/{name}/json");
    let doc: Value = super::with_retries(3, || {
        let resp = client.get(&url).send().ok()?;
        resp.status().is_success().then_some(()).and(resp.json().ok())
    })?;
    parse_pypi_record(&doc)
}

/// Fetch one named package's metadata directly, bypassing discovery. Used
/// by `analyze`. `None` if offline, the name doesn't resolve, or the
/// document fails to parse.
#[cfg(feature = "enrichment")]
#[must_use]
pub fn fetch_by_name(name: &str) -> Option<PackageCandidate> {
    if crate::config::is_offline_mode() {
        return None;
    }
    let client = build_client(4)?;
    fetch_one(&client, name)
}

#[cfg(not(feature = "enrichment"))]
#[must_use]
pub fn fetch_by_name(_name: &str) -> Option<PackageCandidate> {
    None
}

#[cfg(feature = "enrichment")]
#[must_use]
pub fn fetch_recent_pypi(limit: usize) -> Vec<PackageCandidate> {
    if crate::config::is_offline_mode() {
        return load_from_seed(limit);
    }
    let Some(client) = build_client(4) else {
        return load_from_seed(limit);
    };
    let names = discover_names(&client);
    if names.is_empty() {
        return load_from_seed(limit);
    }
    let mut out = Vec::with_capacity(limit);
    for name in names {
        if out.len() >= limit {
            break;
        }
        if let Some(candidate) = fetch_one(&client, &name) {
            out.push(candidate);
        }
    }
    out
}

#[cfg(not(feature = "enrichment"))]
#[must_use]
pub fn fetch_recent_pypi(limit: usize) -> Vec<PackageCandidate> {
    load_from_seed(limit)
}

fn load_from_seed(limit: usize) -> Vec<PackageCandidate> {
    seed::read_ndjson(&seed::seed_path(Ecosystem::PyPI))
        .iter()
        .filter_map(parse_pypi_record)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_record() {
        let doc = serde_json::json!({
            "info": {
                "name": "Requests",
                "version": "2.31.0",
                "home_page": "https://example.com",
                "summary": "HTTP for humans",
                "project_urls": { "Source": "https://github.com/psf/requests" }
            },
            "releases": {
                "2.31.0": [{ "upload_time_iso_8601": "2023-05-22T00:00:00Z" }],
                "2.30.0": [{ "upload_time_iso_8601": "2023-03-22T00:00:00Z" }]
            }
        });
        let candidate = parse_pypi_record(&doc).unwrap();
        assert_eq!(candidate.name, "requests");
        assert_eq!(candidate.repository.as_deref(), Some("https://github.com/psf/requests"));
        assert_eq!(candidate.created_at.to_rfc3339(), "2023-03-22T00:00:00+00:00");
        assert!(!candidate.has_install_scripts);
        assert_eq!(candidate.maintainers_count, 1);
    }

    #[test]
    fn missing_name_yields_none() {
        let doc = serde_json::json!({ "info": {} });
        assert!(parse_pypi_record(&doc).is_none());
    }

    #[test]
    fn repo_key_priority_prefers_source_over_others() {
        let doc = serde_json::json!({
            "info": {
                "name": "pkg",
                "project_urls": { "GitHub": "https://github.com/a/b", "Source": "https://github.com/c/d" }
            },
            "releases": {}
        });
        let candidate = parse_pypi_record(&doc).unwrap();
        assert_eq!(candidate.repository.as_deref(), Some("https://github.com/c/d"));
    }
}
