//! Calculation logic for the market intelligence pipeline.
//!
//! This module contains the pure, synchronous building blocks of an
//! analysis: salary text parsing, period normalization, percentile
//! aggregation, supply/demand snapshots, confidence scoring and the
//! deterministic synthesis that combines them.

mod compensation;
mod confidence;
mod insights;
mod market_snapshot;
mod period_normalizer;
mod salary_parser;

pub use compensation::{
    aggregate, aggregate_with, base_max_percentile, base_min_percentile, percentile,
    percentile_index, summarize_salaries,
};
pub use confidence::{
    CONFIDENCE_HALF_SAMPLE, ESTIMATED_CANDIDATES_PENALTY, EXTERNAL_CONFIDENCE_BONUS,
    FALLBACK_CONFIDENCE_CEILING, HIGH_QUALITY_MIN_POSTINGS, MEDIUM_QUALITY_MIN_POSTINGS,
    confidence_for, data_quality, external_confidence_ceiling, fallback_confidence,
};
pub use insights::{
    HIGH_COMPETITION_APPLICANTS, HIGH_COMPETITION_COMPANIES, MODERATE_COMPETITION_APPLICANTS,
    MODERATE_COMPETITION_COMPANIES, THIN_SAMPLE_POSTINGS, TOP_COMPETITOR_LIMIT, TOP_LOCATION_LIMIT,
    TOP_SKILL_LIMIT, remote_opportunity_share, synthesize,
};
pub use market_snapshot::{
    ESTIMATED_CANDIDATES_PER_JOB, LOOSE_JOB_COUNT_THRESHOLD, LOOSE_RATIO_THRESHOLD,
    TIGHT_JOB_COUNT_THRESHOLD, TIGHT_RATIO_THRESHOLD, build_snapshot, classify_by_job_count,
    classify_by_ratio,
};
pub use period_normalizer::{HOURS_PER_YEAR, MONTHS_PER_YEAR, annualization_factor, to_annual};
pub use salary_parser::{
    K_NOTATION_MULTIPLIER, currency_for_location, parse_salary, parse_salary_in,
};
