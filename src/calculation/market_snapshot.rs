//! Supply/demand snapshot calculation.
//!
//! Candidate collection is the least reliable collaborator, so the builder
//! has two classification paths: a ratio path when real candidate counts
//! exist, and a job-count-only path that estimates candidates instead of
//! failing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{DemandBasis, MarketSnapshot, Tightness};

/// Below this many candidates per job the market is tight.
pub const TIGHT_RATIO_THRESHOLD: i64 = 5;

/// Above this many candidates per job the market is loose.
pub const LOOSE_RATIO_THRESHOLD: i64 = 20;

/// Without candidate data, more open jobs than this means a tight market.
pub const TIGHT_JOB_COUNT_THRESHOLD: u32 = 40;

/// Without candidate data, fewer open jobs than this means a loose market.
pub const LOOSE_JOB_COUNT_THRESHOLD: u32 = 20;

/// Candidates assumed per open job when no candidate data exists.
pub const ESTIMATED_CANDIDATES_PER_JOB: u32 = 10;

/// Builds a supply/demand snapshot.
///
/// # Arguments
///
/// * `open_jobs` - Open postings found
/// * `available_candidates` - Candidates found, or `None` when the candidate
///   collaborator produced nothing
///
/// # Examples
///
/// ```
/// use market_intel::calculation::build_snapshot;
/// use market_intel::models::{DemandBasis, Tightness};
///
/// let measured = build_snapshot(10, Some(30));
/// assert_eq!(measured.tightness, Tightness::Tight);
/// assert_eq!(measured.ratio_label, "3:1");
///
/// let estimated = build_snapshot(45, None);
/// assert_eq!(estimated.basis, DemandBasis::JobCountOnly);
/// assert_eq!(estimated.available_candidates, 450);
/// assert!(estimated.candidates_estimated);
/// assert_eq!(estimated.tightness, Tightness::Tight);
/// ```
pub fn build_snapshot(open_jobs: u32, available_candidates: Option<u32>) -> MarketSnapshot {
    let (candidates, basis) = match available_candidates {
        Some(count) => (count, DemandBasis::ProfileCount),
        None => (
            open_jobs.saturating_mul(ESTIMATED_CANDIDATES_PER_JOB),
            DemandBasis::JobCountOnly,
        ),
    };

    let ratio = Decimal::from(candidates) / Decimal::from(open_jobs.max(1));
    let tightness = match basis {
        DemandBasis::ProfileCount => classify_by_ratio(ratio),
        DemandBasis::JobCountOnly => classify_by_job_count(open_jobs),
    };
    let ratio = ratio.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    MarketSnapshot {
        open_jobs,
        available_candidates: candidates,
        ratio,
        ratio_label: format!("{}:1", ratio.normalize()),
        tightness,
        basis,
        candidates_estimated: basis == DemandBasis::JobCountOnly,
    }
}

/// Classifies tightness from a measured candidates-per-job ratio.
pub fn classify_by_ratio(ratio: Decimal) -> Tightness {
    if ratio < Decimal::from(TIGHT_RATIO_THRESHOLD) {
        Tightness::Tight
    } else if ratio > Decimal::from(LOOSE_RATIO_THRESHOLD) {
        Tightness::Loose
    } else {
        Tightness::Balanced
    }
}

/// Classifies tightness from the number of open jobs alone.
pub fn classify_by_job_count(open_jobs: u32) -> Tightness {
    if open_jobs > TIGHT_JOB_COUNT_THRESHOLD {
        Tightness::Tight
    } else if open_jobs < LOOSE_JOB_COUNT_THRESHOLD {
        Tightness::Loose
    } else {
        Tightness::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_ratio_below_five_is_tight() {
        let snapshot = build_snapshot(10, Some(49));
        assert_eq!(snapshot.tightness, Tightness::Tight);
        assert_eq!(snapshot.ratio, dec("4.9"));
        assert_eq!(snapshot.ratio_label, "4.9:1");
    }

    #[test]
    fn test_ratio_boundaries_are_balanced() {
        assert_eq!(build_snapshot(10, Some(50)).tightness, Tightness::Balanced);
        assert_eq!(build_snapshot(10, Some(200)).tightness, Tightness::Balanced);
    }

    #[test]
    fn test_ratio_above_twenty_is_loose() {
        let snapshot = build_snapshot(10, Some(201));
        assert_eq!(snapshot.tightness, Tightness::Loose);
        assert_eq!(snapshot.basis, DemandBasis::ProfileCount);
        assert!(!snapshot.candidates_estimated);
    }

    #[test]
    fn test_zero_jobs_divides_by_one() {
        let snapshot = build_snapshot(0, Some(12));
        assert_eq!(snapshot.ratio, dec("12"));
        assert_eq!(snapshot.ratio_label, "12:1");
    }

    #[test]
    fn test_classification_uses_unrounded_ratio() {
        // 4.96 rounds to 5.0 for display but is still below the threshold.
        let snapshot = build_snapshot(25, Some(124));
        assert_eq!(snapshot.tightness, Tightness::Tight);
        assert_eq!(snapshot.ratio_label, "5:1");
    }

    #[test]
    fn test_job_count_only_thresholds() {
        assert_eq!(build_snapshot(41, None).tightness, Tightness::Tight);
        assert_eq!(build_snapshot(40, None).tightness, Tightness::Balanced);
        assert_eq!(build_snapshot(20, None).tightness, Tightness::Balanced);
        assert_eq!(build_snapshot(19, None).tightness, Tightness::Loose);
        assert_eq!(build_snapshot(0, None).tightness, Tightness::Loose);
    }

    #[test]
    fn test_job_count_only_estimates_candidates() {
        let snapshot = build_snapshot(3, None);
        assert_eq!(snapshot.available_candidates, 30);
        assert_eq!(snapshot.ratio_label, "10:1");
        assert!(snapshot.candidates_estimated);
        assert_eq!(snapshot.basis, DemandBasis::JobCountOnly);
    }

    #[test]
    fn test_more_candidates_never_tightens_the_market() {
        let mut previous = build_snapshot(12, Some(0)).tightness;
        for candidates in 1..400 {
            let current = build_snapshot(12, Some(candidates)).tightness;
            assert!(current >= previous, "{:?} -> {:?} at {}", previous, current, candidates);
            previous = current;
        }
    }
}
