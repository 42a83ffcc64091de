//! Property tests for the §8 scoring invariants: every subscore and the
//! weighted total stay in `[0, 1]` for arbitrary candidate metadata, and
//! scoring the same candidate twice is deterministic.

use chrono::Utc;
use phantomscan::model::{Corpus, Ecosystem, PackageCandidate, Policy};
use phantomscan::scoring::score_metadata_signals;
use proptest::prelude::*;

fn arbitrary_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,40}"
}

fn arbitrary_candidate(
    ecosystem: Ecosystem,
    name: String,
    days_old: i64,
    maintainers_count: u32,
    has_install_scripts: bool,
    homepage: Option<String>,
    repository: Option<String>,
    description: Option<String>,
) -> PackageCandidate {
    let created_at = Utc::now() - chrono::Duration::days(days_old);
    PackageCandidate::new(
        ecosystem,
        name,
        "0.0.1",
        created_at,
        homepage,
        repository,
        maintainers_count,
        has_install_scripts,
        description,
        None,
    )
}

proptest! {
    #[test]
    fn every_subscore_stays_within_the_unit_range(
        name in arbitrary_name(),
        days_old in 0i64..3650,
        maintainers_count in 0u32..50,
        has_install_scripts in any::<bool>(),
        has_homepage in any::<bool>(),
        has_repository in any::<bool>(),
        has_description in any::<bool>(),
    ) {
        let policy = Policy::default();
        let corpus = Corpus::empty();
        let candidate = arbitrary_candidate(
            Ecosystem::PyPI,
            name,
            days_old,
            maintainers_count,
            has_install_scripts,
            has_homepage.then(|| "https://example.com".to_string()),
            has_repository.then(|| "https://github.com/example/example".to_string()),
            has_description.then(|| "a package".to_string()),
        );
        let breakdown = score_metadata_signals(&candidate, &policy, &corpus, Utc::now());

        for (label, value) in breakdown.subscores() {
            prop_assert!((0.0..=1.0).contains(&value), "{label} out of range: {value}");
        }
    }

    #[test]
    fn scoring_the_same_candidate_twice_is_deterministic(
        name in arbitrary_name(),
        days_old in 0i64..3650,
        maintainers_count in 0u32..50,
        has_install_scripts in any::<bool>(),
    ) {
        let policy = Policy::default();
        let corpus = Corpus::empty();
        let candidate = arbitrary_candidate(
            Ecosystem::Npm, name, days_old, maintainers_count, has_install_scripts, None, None, None,
        );
        let now = Utc::now();

        let first = score_metadata_signals(&candidate, &policy, &corpus, now);
        let second = score_metadata_signals(&candidate, &policy, &corpus, now);
        prop_assert_eq!(first.subscores(), second.subscores());
    }

    #[test]
    fn newness_is_monotonically_non_increasing_with_age(
        younger_days in 0i64..30,
        older_extra_days in 1i64..365,
    ) {
        let policy = Policy::default();
        let corpus = Corpus::empty();
        let older_days = younger_days + older_extra_days;

        let younger = arbitrary_candidate(
            Ecosystem::PyPI, "sample-package".to_string(), younger_days, 1, false, None, None, None,
        );
        let older = arbitrary_candidate(
            Ecosystem::PyPI, "sample-package".to_string(), older_days, 1, false, None, None, None,
        );
        let now = Utc::now();

        let younger_breakdown = score_metadata_signals(&younger, &policy, &corpus, now);
        let older_breakdown = score_metadata_signals(&older, &policy, &corpus, now);
        prop_assert!(younger_breakdown.newness >= older_breakdown.newness);
    }
}
