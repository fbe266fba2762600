//! Performance benchmarks for the market intelligence pipeline.
//!
//! This benchmark suite covers the deterministic hot paths:
//! - Salary text parsing across common formats
//! - Aggregation of increasingly large observation sets
//! - The full fallback synthesis
//! - A `/analyze` request through the router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use market_intel::api::{AppState, create_router};
use market_intel::calculation::{aggregate, parse_salary, synthesize, to_annual};
use market_intel::config::{AnalysisConfig, SalaryPolicy};
use market_intel::models::{MarketQuery, NormalizedObservation, RawPosting, RawProfile};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const SAMPLE_SALARIES: [&str; 6] = [
    "$120k-$150k",
    "€6,100–€7,900/month",
    "£40 - £55 per hour",
    "85k",
    "USD 95,000 to 110,000 per year",
    "competitive salary",
];

fn sample_postings(count: usize) -> Vec<RawPosting> {
    (0..count)
        .map(|i| RawPosting {
            title: "Backend Engineer".to_string(),
            company_name: format!("Company {}", i % 12),
            location: if i % 4 == 0 { "Remote" } else { "Berlin" }.to_string(),
            salary: SAMPLE_SALARIES[i % SAMPLE_SALARIES.len()].to_string(),
            applications_count: Some((i as u32 * 7) % 200),
        })
        .collect()
}

fn sample_profiles(count: usize) -> Vec<RawProfile> {
    (0..count)
        .map(|i| RawProfile {
            headline: "Backend Engineer".to_string(),
            location: "Berlin".to_string(),
            current_company: (i % 3 != 0).then(|| format!("Employer {}", i % 5)),
            skills: vec!["Rust".to_string(), format!("Skill {}", i % 9)],
        })
        .collect()
}

fn sample_observations(count: usize) -> Vec<NormalizedObservation> {
    (0..count)
        .filter_map(|i| parse_salary(&format!("€{}k-€{}k", 50 + i % 70, 70 + i % 90)))
        .map(|o| to_annual(&o))
        .collect()
}

/// Benchmark: Parsing each sample salary format.
fn bench_parse_salary(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_salary");
    for text in SAMPLE_SALARIES {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| black_box(parse_salary(black_box(text))))
        });
    }
    group.finish();
}

/// Benchmark: Aggregating observation sets of growing size.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for size in [10usize, 100, 1000] {
        let observations = sample_observations(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &observations, |b, obs| {
            b.iter(|| black_box(aggregate(black_box(obs))))
        });
    }
    group.finish();
}

/// Benchmark: Full deterministic synthesis at the default collection limits.
fn bench_synthesize(c: &mut Criterion) {
    let query = MarketQuery::new("Backend Engineer", "Berlin");
    let postings = sample_postings(50);
    let profiles = sample_profiles(50);
    let policy = SalaryPolicy::default();

    c.bench_function("synthesize_50_50", |b| {
        b.iter(|| black_box(synthesize(&query, &postings, &profiles, &policy)))
    });
}

/// Benchmark: One `/analyze` request through the router.
fn bench_analyze_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(AnalysisConfig::default()));
    let body = serde_json::to_string(&serde_json::json!({
        "query": {"role_title": "Backend Engineer", "location": "Berlin"},
        "postings": sample_postings(50),
        "profiles": sample_profiles(50),
    }))
    .unwrap();

    c.bench_function("analyze_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/analyze")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_parse_salary,
    bench_aggregate,
    bench_synthesize,
    bench_analyze_request
);
criterion_main!(benches);
