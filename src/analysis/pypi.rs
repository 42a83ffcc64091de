//! PyPI content risk (§4.4): sdist-vs-wheel comparison and static scanning
//! of extracted source files.
//!
//! Every fallible step here uses `Result` internally — download, archive
//! extraction, UTF-8 decoding can all fail — but the public entry point
//! never propagates them. Any failure collapses to a neutral `(0.0, [])`,
//! consistent with the enrichment contract in `crate::error`.

use crate::error::Result;
use crate::model::{PackageCandidate, Policy};
use regex::Regex;
use std::io::Read;
use std::path::{Component, Path};
use std::sync::OnceLock;

struct Pattern {
    label: &'static str,
    regex: Regex,
}

fn catalogue() -> &'static [Pattern] {
    static CATALOGUE: OnceLock<Vec<Pattern>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        let specs: &[(&str, &str)] = &[
            ("exec(", r"\bexec\s*\("),
            ("eval(", r"\beval\s*\("),
            ("compile(", r"\bcompile\s*\("),
            ("__import__", r"__import__\s*\("),
            ("credential-bearing http call", r"requests\.(get|post)\([^)]*(token|auth|key)"),
            ("base64.b64decode", r"base64\.b64decode"),
            ("subprocess shell=True", r"subprocess\.[A-Za-z_]+\([^)]*shell\s*=\s*True"),
            ("os.system", r"os\.system\s*\("),
            ("sensitive path open", r#"open\s*\(\s*["'](/etc/|/root/|\.ssh/|\.aws/)"#),
            ("credential-shaped env read", r"os\.(environ|getenv)\([^)]*(TOKEN|SECRET|KEY|PASSWORD)"),
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

/// Download the latest sdist and wheel, compare their contents, and
/// static-scan extracted Python source for the dangerous-pattern
/// catalogue (§4.4). Disabled (returns neutral) when the `enrichment`
/// feature is off or `Policy.enrichment.content_scan` is false.
#[must_use]
pub fn content_risk_pypi(candidate: &PackageCandidate, policy: &Policy) -> (f64, Vec<String>) {
    if !policy.enrichment.content_scan {
        return (0.0, Vec::new());
    }
    match try_content_risk_pypi(candidate, policy) {
        Ok(result) => result,
        Err(_) => (0.0, Vec::new()),
    }
}

fn try_content_risk_pypi(candidate: &PackageCandidate, policy: &Policy) -> Result<(f64, Vec<String>)> {
    let Some(doc) = candidate.raw_metadata.as_ref().and_then(|m| m.pypi_json()) else {
        return Ok((0.0, Vec::new()));
    };
    let Some(urls) = doc.get("urls").and_then(|v| v.as_array()) else {
        return Ok((0.0, Vec::new()));
    };

    let sdist_url = urls
        .iter()
        .find(|u| u.get("packagetype").and_then(|p| p.as_str()) == Some("sdist"))
        .and_then(|u| u.get("url"))
        .and_then(|u| u.as_str());
    let wheel_url = urls
        .iter()
        .find(|u| u.get("packagetype").and_then(|p| p.as_str()) == Some("bdist_wheel"))
        .and_then(|u| u.get("url"))
        .and_then(|u| u.as_str());

    if sdist_url.is_none() && wheel_url.is_none() {
        return Ok((0.0, Vec::new()));
    }

    let tmp = tempfile::tempdir()?;
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(policy.network.enrichment_timeout_seconds))
        .user_agent(&policy.network.user_agent)
        .build()
        .map_err(|e| {
            crate::error::PhantomScanError::enrichment(
                "building content-scan HTTP client",
                crate::error::EnrichmentErrorKind::RequestFailed(e.to_string()),
            )
        })?;

    let sdist_files = match sdist_url {
        Some(url) => {
            let bytes = fetch(&client, url)?;
            let dir = tmp.path().join("sdist");
            extract_tar_gz(&bytes, &dir)?;
            list_files(&dir)
        }
        None => Vec::new(),
    };

    let wheel_files = match wheel_url {
        Some(url) => {
            let bytes = fetch(&client, url)?;
            let dir = tmp.path().join("wheel");
            extract_zip(&bytes, &dir)?;
            list_files(&dir)
        }
        None => Vec::new(),
    };

    let mut reasons = Vec::new();
    let mut hits = 0u32;
    let mut mismatch = false;

    let sdist_names: std::collections::HashSet<String> = sdist_files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    for wheel_file in &wheel_files {
        if let Some(name) = wheel_file.file_name().map(|n| n.to_string_lossy().to_string()) {
            if name.ends_with(".py") && !sdist_names.contains(&name) {
                mismatch = true;
                reasons.push(format!("wheel file '{name}' has no counterpart in the sdist"));
                break;
            }
        }
    }

    for file in sdist_files.iter().chain(wheel_files.iter()) {
        if file.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(file) else {
            continue;
        };
        let is_setup_py = file.file_name().and_then(|n| n.to_str()) == Some("setup.py");
        for pattern in catalogue() {
            if pattern.regex.is_match(&text) {
                hits += 1;
                let label = file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
                reasons.push(format!("{label} matches pattern '{}'", pattern.label));
            }
        }
        if is_setup_py && (text.contains("exec(") || text.contains("eval(")) {
            mismatch = true;
            reasons.push("setup.py executes dynamic code via exec()/eval()".to_string());
        }
    }

    let mut risk = (f64::from(hits) / 10.0).min(1.0);
    if mismatch {
        risk += 0.5;
    }

    Ok((risk.clamp(0.0, 1.0), reasons))
}

fn fetch(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().map_err(|e| {
        crate::error::PhantomScanError::enrichment(
            format!("downloading {url}"),
            crate::error::EnrichmentErrorKind::RequestFailed(e.to_string()),
        )
    })?;
    let bytes = response.bytes().map_err(|e| {
        crate::error::PhantomScanError::enrichment(
            format!("reading body of {url}"),
            crate::error::EnrichmentErrorKind::RequestFailed(e.to_string()),
        )
    })?;
    Ok(bytes.to_vec())
}

/// Reject any entry whose normalized path escapes `dest` — an absolute
/// path or a `..` component is a zip-slip / tar-slip attempt.
fn is_safe_relative_path(path: &Path) -> bool {
    !path.is_absolute() && !path.components().any(|c| matches!(c, Component::ParentDir))
}

fn extract_tar_gz(bytes: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    let decoder = flate2::read::GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if !is_safe_relative_path(&path) {
            continue;
        }
        let target = dest.join(&path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&target)?;
    }
    Ok(())
}

fn extract_zip(bytes: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| {
        crate::error::PhantomScanError::enrichment(
            "opening wheel archive",
            crate::error::EnrichmentErrorKind::InvalidResponse(e.to_string()),
        )
    })?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| {
            crate::error::PhantomScanError::enrichment(
                "reading wheel entry",
                crate::error::EnrichmentErrorKind::InvalidResponse(e.to_string()),
            )
        })?;
        let Some(name) = file.enclosed_name() else {
            continue;
        };
        if !is_safe_relative_path(&name) {
            continue;
        }
        let target = dest.join(&name);
        if file.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        std::fs::write(&target, contents)?;
    }
    Ok(())
}

fn list_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_relative_path_rejects_traversal_and_absolute() {
        assert!(is_safe_relative_path(Path::new("pkg/__init__.py")));
        assert!(!is_safe_relative_path(Path::new("../../etc/passwd")));
        assert!(!is_safe_relative_path(Path::new("/etc/passwd")));
    }

    #[test]
    fn disabled_toggle_short_circuits_to_neutral() {
        let mut policy = Policy::default();
        policy.enrichment.content_scan = false;
        let candidate = PackageCandidate::new(
            crate::model::Ecosystem::PyPI,
            "anything",
            "1.0.0",
            chrono::Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        );
        assert_eq!(content_risk_pypi(&candidate, &policy), (0.0, Vec::new()));
    }

    #[test]
    fn candidate_without_raw_metadata_is_neutral() {
        let policy = Policy::default();
        let candidate = PackageCandidate::new(
            crate::model::Ecosystem::PyPI,
            "anything",
            "1.0.0",
            chrono::Utc::now(),
            None,
            None,
            1,
            false,
            None,
            None,
        );
        assert_eq!(content_risk_pypi(&candidate, &policy), (0.0, Vec::new()));
    }
}
