//! npm source adapter (§4.1).

use super::seed;
use crate::model::{Ecosystem, PackageCandidate, RawMetadata};
use chrono::{DateTime, Utc};
use serde_json::Value;

const LIFECYCLE_SCRIPTS: [&str; 3] = ["install", "preinstall", "postinstall"];

/// Build a `PackageCandidate` from a full npm packument, shared between
/// the live fetch path and the offline seed path.
#[must_use]
pub fn parse_npm_record(doc: &Value) -> Option<PackageCandidate> {
    let id = doc.get("_id").or_else(|| doc.get("name"))?.as_str()?;
    if id.starts_with('_') {
        return None;
    }

    let versions = doc.get("versions").and_then(Value::as_object);
    let latest = doc
        .get("dist-tags")
        .and_then(|t| t.get("latest"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| versions.and_then(|v| v.keys().next().cloned()))?;

    let created_at = doc
        .get("time")
        .and_then(|t| t.get("created"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now);

    let latest_version = versions.and_then(|v| v.get(&latest));
    let scripts = latest_version
        .and_then(|v| v.get("scripts"))
        .cloned()
        .unwrap_or(Value::Null);
    let has_install_scripts = scripts
        .as_object()
        .is_some_and(|s| LIFECYCLE_SCRIPTS.iter().any(|name| s.contains_key(*name)));

    let homepage = doc
        .get("homepage")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| latest_version.and_then(|v| v.get("homepage")).and_then(Value::as_str).map(str::to_string));
    let repository = doc
        .get("repository")
        .and_then(repository_url)
        .or_else(|| latest_version.and_then(|v| v.get("repository")).and_then(repository_url));

    let description = doc
        .get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let maintainers = doc.get("maintainers").cloned().unwrap_or(Value::Array(Vec::new()));
    let maintainers_count = maintainers.as_array().map_or(1, |m| m.len().max(1) as u32);

    let raw = serde_json::json!({
        "latest_scripts": scripts,
        "packument_head": {
            "time": doc.get("time").cloned().unwrap_or(Value::Null),
            "versions": doc.get("versions").cloned().unwrap_or(Value::Null),
        },
        "maintainers": maintainers,
    });

    Some(PackageCandidate::new(
        Ecosystem::Npm,
        id,
        latest,
        created_at,
        homepage,
        repository,
        maintainers_count,
        has_install_scripts,
        description,
        Some(RawMetadata::Npm(raw)),
    ))
}

fn repository_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => value.get("url").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(feature = "enrichment")]
fn build_client(timeout_seconds: u64) -> Option<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .ok()
}

#[cfg(feature = "enrichment")]
fn discover_ids(client: &reqwest::blocking::Client, limit: usize) -> Vec<String> {
    let url = format!("https://replicate.npmjs.com/_changes?descending=true&limit={}", limit * 2);
    let body: Option<Value> = super::with_retries(3, || client.get(&url).send().ok()?.json().ok());
    body.and_then(|v| v.get("results").cloned())
        .and_then(|r| r.as_array().cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.get("id")?.as_str().map(str::to_string))
        .filter(|id| !id.starts_with('_'))
        .collect()
}

#[cfg(feature = "enrichment")]
fn fetch_one(client: &reqwest::blocking::Client, name: &str) -> Option<PackageCandidate> {
    let url = format!("https://registry.npmjs.org/{name}");
    let doc: Value = super::with_retries(3, || {
        let resp = client.get(&url).send().ok()?;
        resp.status().is_success().then_some(()).and(resp.json().ok())
    })?;
    parse_npm_record(&doc)
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
pub fn fetch_recent_npm(limit: usize) -> Vec<PackageCandidate> {
    if crate::config::is_offline_mode() {
        return load_from_seed(limit);
    }
    let Some(client) = build_client(4) else {
        return load_from_seed(limit);
    };
    let ids = discover_ids(&client, limit);
    if ids.is_empty() {
        return load_from_seed(limit);
    }
    let mut out = Vec::with_capacity(limit);
    for id in ids {
        if out.len() >= limit {
            break;
        }
        if let Some(candidate) = fetch_one(&client, &id) {
            out.push(candidate);
        }
    }
    out
}

#[cfg(not(feature = "enrichment"))]
#[must_use]
pub fn fetch_recent_npm(limit: usize) -> Vec<PackageCandidate> {
    load_from_seed(limit)
}

fn load_from_seed(limit: usize) -> Vec<PackageCandidate> {
    seed::read_ndjson(&seed::seed_path(Ecosystem::Npm))
        .iter()
        .filter_map(parse_npm_record)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_packument() {
        let doc = serde_json::json!({
            "_id": "left-pad",
            "dist-tags": { "latest": "1.3.0" },
            "versions": { "1.3.0": { "scripts": { "postinstall": "node setup.js" } } },
            "time": { "created": "2014-01-01T00:00:00.000Z" },
            "homepage": "https://example.com",
            "repository": { "url": "git+https://github.com/a/left-pad.git" },
            "maintainers": [{ "name": "a", "email": "a@example.com" }]
        });
        let candidate = parse_npm_record(&doc).unwrap();
        assert_eq!(candidate.name, "left-pad");
        assert_eq!(candidate.version, "1.3.0");
        assert!(candidate.has_install_scripts);
        assert_eq!(candidate.repository.as_deref(), Some("git+https://github.com/a/left-pad.git"));
        assert_eq!(candidate.maintainers_count, 1);
    }

    #[test]
    fn ignores_ids_starting_with_underscore() {
        let doc = serde_json::json!({ "_id": "_design/foo" });
        assert!(parse_npm_record(&doc).is_none());
    }

    #[test]
    fn falls_back_to_first_version_key_when_dist_tags_missing() {
        let doc = serde_json::json!({
            "_id": "weird-pkg",
            "versions": { "0.1.0": { "scripts": {} } },
            "time": { "created": "2020-01-01T00:00:00.000Z" }
        });
        let candidate = parse_npm_record(&doc).unwrap();
        assert_eq!(candidate.version, "0.1.0");
    }
}
