//! String-similarity primitives backing the name-suspicion signal and the
//! `SuggestAlternatives` operation.
//!
//! The reference implementation leans on `rapidfuzz`: `fuzz.ratio` for
//! scoring how close a candidate name sits to a canonical package, and the
//! pickier `fuzz.WRatio` for suggesting look-alike corrections. `strsim`
//! doesn't ship either directly (see DESIGN.md):
//!
//! - `fuzz.ratio` is Indel-based: `2 * lcs_len(a, b) / (len(a) + len(b))`.
//!   `strsim::normalized_levenshtein` allows substitutions, which scores a
//!   single transposition (e.g. `reqeusts` vs `requests`) as two edits
//!   instead of one and can push a flagship typosquat below the fuzzy
//!   threshold entirely. `strsim` has no Indel ratio, so it's computed
//!   directly here from the longest common subsequence length.
//! - `fuzz.WRatio` -> `strsim::jaro_winkler` scaled to 0-100, since
//!   Jaro-Winkler's prefix weighting best matches WRatio's tolerance for
//!   partial/reordered tokens among short package names.

use strsim::jaro_winkler;

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity ratio (0-100) used by the name-suspicion signal (§4.3) to
/// compare a candidate name against one canonical name. Indel-based (insert
/// and delete only, no substitution), matching `rapidfuzz.fuzz.ratio`.
#[must_use]
pub fn name_suspicion_ratio(name: &str, canonical: &str) -> f64 {
    let a: Vec<char> = name.to_lowercase().chars().collect();
    let b: Vec<char> = canonical.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (2.0 * lcs_len(&a, &b) as f64 / total as f64) * 100.0
}

/// Similarity ratio (0-100) used by `SuggestAlternatives` (§6) to rank
/// canonical names as likely corrections for a given candidate name.
#[must_use]
pub fn alternatives_ratio(name: &str, canonical: &str) -> f64 {
    jaro_winkler(&name.to_lowercase(), &canonical.to_lowercase()) * 100.0
}

/// The best (name, ratio) match against `canonical_names`, if any scores at
/// or above `threshold`. Used by the name-suspicion signal.
#[must_use]
pub fn best_name_suspicion_match(
    name: &str,
    canonical_names: &[String],
    threshold: f64,
) -> Option<(String, f64)> {
    canonical_names
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(name))
        .map(|c| (c.clone(), name_suspicion_ratio(name, c)))
        .filter(|(_, ratio)| *ratio >= threshold)
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Top-5 canonical names above the WRatio-style threshold (default 92),
/// sorted by ratio descending, excluding the exact name itself — the
/// `SuggestAlternatives` operation's core ranking (§6).
#[must_use]
pub fn suggest_alternatives(
    name: &str,
    canonical_names: &[String],
    threshold: f64,
) -> Vec<(String, f64)> {
    let mut matches: Vec<(String, f64)> = canonical_names
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(name))
        .map(|c| (c.clone(), alternatives_ratio(name, c)))
        .filter(|(_, ratio)| *ratio >= threshold)
        .collect();
    matches.sort_by(|(name_a, a), (name_b, b)| {
        b.partial_cmp(a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| name_a.cmp(name_b))
    });
    matches.truncate(5);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_100() {
        assert!((name_suspicion_ratio("requests", "requests") - 100.0).abs() < 1e-9);
        assert!((alternatives_ratio("requests", "requests") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn close_misspelling_scores_high() {
        let ratio = name_suspicion_ratio("requestz", "requests");
        assert!(ratio > 80.0, "expected high ratio, got {ratio}");
    }

    #[test]
    fn a_single_transposition_scores_above_the_default_fuzzy_threshold() {
        // "reqeusts" is "requests" with one adjacent pair swapped. Indel
        // distance counts this as one edit, not two substitutions.
        let ratio = name_suspicion_ratio("reqeusts", "requests");
        assert!(ratio > 85.0, "expected ratio above 85, got {ratio}");
    }

    #[test]
    fn unrelated_names_score_low() {
        let ratio = name_suspicion_ratio("requests", "kubernetes");
        assert!(ratio < 40.0, "expected low ratio, got {ratio}");
    }

    #[test]
    fn best_match_excludes_exact_name() {
        let canonical = vec!["requests".to_string()];
        assert_eq!(
            best_name_suspicion_match("requests", &canonical, 50.0),
            None
        );
    }

    #[test]
    fn best_match_finds_closest_candidate() {
        let canonical = vec!["flask".to_string(), "requests".to_string()];
        let (name, ratio) = best_name_suspicion_match("requestz", &canonical, 50.0).unwrap();
        assert_eq!(name, "requests");
        assert!(ratio > 80.0);
    }

    #[test]
    fn suggest_alternatives_ranks_and_truncates() {
        let canonical = vec![
            "requests".to_string(),
            "request".to_string(),
            "flask".to_string(),
        ];
        let suggestions = suggest_alternatives("requestz", &canonical, 80.0);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 5);
        assert!(suggestions.iter().all(|(name, _)| name != "requestz"));
    }
}
