//! Existence Prober (C2, §4.2): `exists_in_registry(ecosystem, name)`.
//!
//! Never raises — every failure mode collapses to `(false, reason)` where
//! `reason` is one of `"ok"`, `"404"`, `"timeout"`, `"offline"`, `"error"`,
//! suitable for direct inclusion in the watchlist.

use crate::model::{Ecosystem, Policy};

/// Check whether `name` currently resolves in its registry.
#[must_use]
pub fn exists_in_registry(ecosystem: Ecosystem, name: &str, policy: &Policy) -> (bool, &'static str) {
    if crate::config::is_offline_mode() {
        return (false, "offline");
    }
    #[cfg(feature = "enrichment")]
    {
        match ecosystem {
            Ecosystem::Npm => npm_exists(name, policy),
            Ecosystem::PyPI => pypi_exists(name, policy),
        }
    }
    #[cfg(not(feature = "enrichment"))]
    {
        let _ = (ecosystem, name, policy);
        (false, "offline")
    }
}

#[cfg(feature = "enrichment")]
fn client(policy: &Policy) -> Option<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(policy.network.registry_timeout_seconds))
        .user_agent(&policy.network.user_agent)
        .build()
        .ok()
}

#[cfg(feature = "enrichment")]
fn npm_exists(name: &str, policy: &Policy) -> (bool, &'static str) {
    let Some(client) = client(policy) else {
        return (false, "error");
    };
    let url = format!("https://registry.npmjs.org/{name}");

    let head_result = client.head(&url).send();
    let response = match head_result {
        Ok(resp) if resp.status() == reqwest::StatusCode::METHOD_NOT_ALLOWED => client.get(&url).send(),
        other => other,
    };

    match response {
        Ok(resp) if resp.status().is_success() => (true, "ok"),
        Ok(resp) if resp.status().as_u16() == 404 => (false, "404"),
        Ok(_) => (false, "error"),
        Err(e) if e.is_timeout() => (false, "timeout"),
        Err(_) => (false, "error"),
    }
}

#[cfg(feature = "enrichment")]
fn pypi_exists(name: &str, policy: &Policy) -> (bool, &'static str) {
    let Some(client) = client(policy) else {
        return (false, "error");
    };
    let url = format!("https://pypi.org/pypi/{name}/json");
    match client.get(&url).send() {
        Ok(resp) if resp.status().is_success() => (true, "ok"),
        Ok(resp) if resp.status().as_u16() == 404 => (false, "404"),
        Ok(_) => (false, "error"),
        Err(e) if e.is_timeout() => (false, "timeout"),
        Err(_) => (false, "error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_mode_always_returns_offline_reason() {
        std::env::set_var(crate::config::OFFLINE_ENV_VAR, "true");
        let (exists, reason) = exists_in_registry(Ecosystem::Npm, "requests", &Policy::default());
        assert!(!exists);
        assert_eq!(reason, "offline");
        std::env::remove_var(crate::config::OFFLINE_ENV_VAR);
    }
}
