//! Shared HTTP plumbing for enrichment providers: a short-timeout client,
//! offline-mode short-circuiting, and a JSON-GET helper that swallows
//! every failure mode a best-effort provider is allowed to swallow.

use crate::model::Policy;

#[cfg(feature = "enrichment")]
pub fn client(policy: &Policy) -> Option<reqwest::blocking::Client> {
    if crate::config::is_offline_mode() {
        return None;
    }
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(
            policy.network.enrichment_timeout_seconds,
        ))
        .user_agent(&policy.network.user_agent)
        .build()
        .ok()
}

#[cfg(feature = "enrichment")]
pub fn get_json(client: &reqwest::blocking::Client, url: &str) -> Option<serde_json::Value> {
    client
        .get(url)
        .send()
        .ok()
        .filter(|resp| resp.status().is_success())
        .and_then(|resp| resp.json::<serde_json::Value>().ok())
}

#[cfg(feature = "enrichment")]
pub fn get_text(client: &reqwest::blocking::Client, url: &str) -> Option<String> {
    client
        .get(url)
        .send()
        .ok()
        .filter(|resp| resp.status().is_success())
        .and_then(|resp| resp.text().ok())
}

#[cfg(feature = "enrichment")]
pub fn post_json(
    client: &reqwest::blocking::Client,
    url: &str,
    body: &serde_json::Value,
) -> Option<serde_json::Value> {
    client
        .post(url)
        .json(body)
        .send()
        .ok()
        .filter(|resp| resp.status().is_success())
        .and_then(|resp| resp.json::<serde_json::Value>().ok())
}

#[cfg(not(feature = "enrichment"))]
pub fn client(_policy: &Policy) -> Option<()> {
    None
}
