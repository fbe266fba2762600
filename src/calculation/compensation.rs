//! Compensation aggregation.
//!
//! This module turns a set of annualized observations for one role/location
//! into a [`CompensationSummary`]. The percentile convention (ceil, no
//! interpolation) is part of the contract: changing it changes published
//! numbers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::SalaryPolicy;
use crate::models::{CompensationSummary, Currency, NormalizedObservation, RawPosting};

use super::{parse_salary_in, to_annual};

/// Percentile used for `base_min`.
pub fn base_min_percentile() -> Decimal {
    Decimal::new(25, 2)
}

/// Percentile used for `base_max`.
pub fn base_max_percentile() -> Decimal {
    Decimal::new(75, 2)
}

/// Returns the index of percentile `p` in a sorted array of length `len`.
///
/// The index is `max(0, ceil(len × p) − 1)`, additionally clamped to the last
/// element so that `p = 1` stays in bounds.
///
/// # Examples
///
/// ```
/// use market_intel::calculation::percentile_index;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percentile_index(1, Decimal::new(75, 2)), 0);
/// assert_eq!(percentile_index(4, Decimal::new(25, 2)), 0);
/// assert_eq!(percentile_index(4, Decimal::new(75, 2)), 2);
/// ```
pub fn percentile_index(len: usize, p: Decimal) -> usize {
    if len == 0 {
        return 0;
    }
    let rank = (Decimal::from(len as u64) * p).ceil().to_u64().unwrap_or(0);
    (rank.saturating_sub(1) as usize).min(len - 1)
}

/// Returns percentile `p` of `values`, or `None` when there are no values.
pub fn percentile(values: &[Decimal], p: Decimal) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted.get(percentile_index(sorted.len(), p)).copied()
}

/// Aggregates observations with the default policy.
pub fn aggregate(observations: &[NormalizedObservation]) -> Option<CompensationSummary> {
    aggregate_with(observations, &SalaryPolicy::default())
}

/// Aggregates observations into a compensation summary.
///
/// # Returns
///
/// `None` when `observations` is empty. Callers render "data not
/// available"; there is no zero-valued summary.
///
/// # Examples
///
/// ```
/// use market_intel::calculation::{aggregate, parse_salary, to_annual};
/// use rust_decimal::Decimal;
///
/// let observations: Vec<_> = ["$120k-$150k", "$130k-$160k"]
///     .iter()
///     .filter_map(|s| parse_salary(s))
///     .map(|o| to_annual(&o))
///     .collect();
///
/// let summary = aggregate(&observations).unwrap();
/// assert_eq!(summary.base_min, Decimal::from(120_000));
/// assert_eq!(summary.base_max, Decimal::from(160_000));
/// assert_eq!(summary.total_comp_min, Decimal::from(132_000));
/// assert_eq!(summary.total_comp_max, Decimal::from(184_000));
///
/// assert!(aggregate(&[]).is_none());
/// ```
pub fn aggregate_with(
    observations: &[NormalizedObservation],
    policy: &SalaryPolicy,
) -> Option<CompensationSummary> {
    if observations.is_empty() {
        return None;
    }

    let minimums: Vec<Decimal> = observations.iter().map(|o| o.annual_min).collect();
    let maximums: Vec<Decimal> = observations.iter().map(|o| o.annual_max).collect();

    let base_min = percentile(&minimums, base_min_percentile())?;
    let base_max = percentile(&maximums, base_max_percentile())?;

    Some(CompensationSummary {
        currency: dominant_currency(observations),
        base_min,
        base_max,
        total_comp_min: round_whole(base_min * policy.total_comp_min_uplift),
        total_comp_max: round_whole(base_max * policy.total_comp_max_uplift),
        sample_size: observations.len(),
        published_ranges: observations
            .iter()
            .take(policy.published_range_limit)
            .map(|o| o.raw_text.clone())
            .collect(),
    })
}

/// Parses, annualizes and aggregates the salary text of a set of postings.
///
/// Each posting's own location is the currency hint for its salary text.
/// Postings without a parseable salary are skipped.
pub fn summarize_salaries(
    postings: &[RawPosting],
    policy: &SalaryPolicy,
) -> Option<CompensationSummary> {
    let observations: Vec<NormalizedObservation> = postings
        .iter()
        .filter_map(|p| parse_salary_in(&p.salary, Some(&p.location), policy))
        .map(|o| to_annual(&o))
        .collect();

    aggregate_with(&observations, policy)
}

/// Most frequent currency; ties go to the one seen first.
fn dominant_currency(observations: &[NormalizedObservation]) -> Currency {
    let mut counts: Vec<(Currency, usize)> = Vec::new();
    for obs in observations {
        match counts.iter_mut().find(|(c, _)| *c == obs.currency) {
            Some((_, n)) => *n += 1,
            None => counts.push((obs.currency, 1)),
        }
    }

    // max_by_key keeps the last maximum, so scan in reverse to prefer the earliest.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, n)| *n)
        .map(|(c, _)| c)
        .unwrap_or_default()
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
