//! Property tests for the pure pipeline components.

use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

use market_intel::calculation::{
    aggregate, build_snapshot, external_confidence_ceiling, fallback_confidence, parse_salary,
    percentile_index, synthesize, to_annual,
};
use market_intel::config::SalaryPolicy;
use market_intel::models::{MarketQuery, RawPosting, RawProfile};

const COMPANIES: [&str; 4] = ["Acme", "Globex", "Initech", "acme"];
const SALARIES: [&str; 5] = ["$120k-$150k", "€6,100–€7,900/month", "£40/hr", "", "competitive"];
const LOCATIONS: [&str; 3] = ["Berlin", "Remote", "London, UK"];

fn postings_strategy() -> impl Strategy<Value = Vec<RawPosting>> {
    prop::collection::vec(
        (0usize..4, 0usize..5, 0usize..3, proptest::option::of(0u32..500)),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(c, s, l, applicants)| RawPosting {
                title: "Backend Engineer".to_string(),
                company_name: COMPANIES[c].to_string(),
                location: LOCATIONS[l].to_string(),
                salary: SALARIES[s].to_string(),
                applications_count: applicants,
            })
            .collect()
    })
}

fn profiles_strategy() -> impl Strategy<Value = Vec<RawProfile>> {
    let skills = prop::collection::vec("[A-Za-z]{1,6}", 0..4);
    prop::collection::vec((0usize..3, any::<bool>(), skills), 0..20).prop_map(|rows| {
        rows.into_iter()
            .map(|(l, employed, skills)| RawProfile {
                headline: "Engineer".to_string(),
                location: LOCATIONS[l].to_string(),
                current_company: employed.then(|| "Acme".to_string()),
                skills,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn parser_is_total_and_deterministic(text in ".*") {
        let first = parse_salary(&text);
        let second = parse_salary(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parsed_ranges_are_positive_and_ordered(text in "[$€£]?[0-9]{1,7}(k)?( ?(-|to) ?[$€£]?[0-9]{1,7}(k)?)?(/month|/hr| per year)?") {
        if let Some(obs) = parse_salary(&text) {
            prop_assert!(obs.min_amount > Decimal::ZERO);
            prop_assert!(obs.min_amount <= obs.max_amount);
        }
    }

    #[test]
    fn whitespace_is_never_a_salary(text in "[ \t\n]*") {
        prop_assert!(parse_salary(&text).is_none());
    }

    #[test]
    fn k_notation_matches_expanded_figures(a in 1u32..999, extra in 0u32..500) {
        let b = (a + extra).min(999);
        let short = parse_salary(&format!("{}k-{}k", a, b)).unwrap();
        let long = parse_salary(&format!("{}-{}", a * 1000, b * 1000)).unwrap();
        prop_assert_eq!(short.min_amount, long.min_amount);
        prop_assert_eq!(short.max_amount, long.max_amount);
        prop_assert_eq!(short.min_amount, Decimal::from(a * 1000));
    }

    #[test]
    fn percentile_index_law(len in 1usize..500, pct in 0u32..=100) {
        let p = Decimal::new(i64::from(pct), 2);
        let expected = ((len as u64 * u64::from(pct)).div_ceil(100)).saturating_sub(1) as usize;
        let index = percentile_index(len, p);
        prop_assert!(index < len);
        prop_assert_eq!(index, expected.min(len - 1));
    }

    #[test]
    fn aggregated_base_range_is_ordered(amounts in prop::collection::vec((1u32..400, 0u32..100), 1..30)) {
        let observations: Vec<_> = amounts
            .iter()
            .filter_map(|(low, spread)| parse_salary(&format!("€{}k-€{}k", low, low + spread)))
            .map(|o| to_annual(&o))
            .collect();
        let summary = aggregate(&observations).unwrap();
        prop_assert!(summary.base_min <= summary.base_max);
        prop_assert!(summary.total_comp_min <= summary.total_comp_max);
        prop_assert_eq!(summary.sample_size, observations.len());
    }

    #[test]
    fn more_candidates_never_tighten(jobs in 0u32..200, low in 0u32..5000, extra in 0u32..5000) {
        let before = build_snapshot(jobs, Some(low)).tightness;
        let after = build_snapshot(jobs, Some(low + extra)).tightness;
        prop_assert!(before <= after);
    }

    #[test]
    fn confidence_is_bounded_and_monotonic(n in 0u32..10_000, estimated in any::<bool>()) {
        let fallback = fallback_confidence(n, estimated);
        let external = external_confidence_ceiling(n, estimated);
        prop_assert!((0.0..=1.0).contains(&fallback));
        prop_assert!((0.0..=1.0).contains(&external));
        prop_assert!(fallback_confidence(n + 1, estimated) >= fallback);
        prop_assert!(external <= fallback_confidence(n + 1, estimated));
    }

    #[test]
    fn fallback_synthesis_is_deterministic_and_valid(
        postings in postings_strategy(),
        profiles in profiles_strategy(),
    ) {
        let query = MarketQuery::new("Backend Engineer", "Berlin");
        let policy = SalaryPolicy::default();
        let first = synthesize(&query, &postings, &profiles, &policy);
        let second = synthesize(&query, &postings, &profiles, &policy);

        prop_assert_eq!(first.is_none(), postings.is_empty() && profiles.is_empty());
        if let (Some(a), Some(b)) = (first, second) {
            prop_assert!(a.validate().is_ok());
            prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        }
    }
}
