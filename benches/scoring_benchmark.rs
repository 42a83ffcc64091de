//! Benchmarks for the metadata signal bank and the fuzzy-matching loop it
//! leans on for name suspicion and alternative suggestion.

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use phantomscan::matching::suggest_alternatives;
use phantomscan::model::{Corpus, Ecosystem, PackageCandidate, Policy};
use phantomscan::scoring::score_metadata_signals;
use std::hint::black_box;

fn candidate(name: &str) -> PackageCandidate {
    PackageCandidate::new(
        Ecosystem::PyPI,
        name,
        "0.1.0",
        Utc::now(),
        None,
        None,
        1,
        false,
        Some("a small utility package".to_string()),
        None,
    )
}

fn benchmark_score_metadata_signals(c: &mut Criterion) {
    let policy = Policy::default();
    let corpus = Corpus::empty();
    let candidate = candidate("reqeusts");
    let now = Utc::now();

    c.bench_function("score_metadata_signals_single_candidate", |b| {
        b.iter(|| {
            let breakdown =
                score_metadata_signals(black_box(&candidate), black_box(&policy), black_box(&corpus), now);
            black_box(breakdown);
        })
    });
}

fn benchmark_suggest_alternatives(c: &mut Criterion) {
    let canonical: Vec<String> = (0..500).map(|i| format!("package-{i}")).collect();

    c.bench_function("suggest_alternatives_against_500_canonical_names", |b| {
        b.iter(|| {
            let matches = suggest_alternatives(black_box("package-42x"), black_box(&canonical), black_box(80.0));
            black_box(matches);
        })
    });
}

criterion_group!(
    benches,
    benchmark_score_metadata_signals,
    benchmark_suggest_alternatives,
);
criterion_main!(benches);
