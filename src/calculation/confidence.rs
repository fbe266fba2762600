//! Confidence and data-quality scoring.
//!
//! Both analysis paths score themselves here so that their claims stay
//! comparable: confidence grows with sample size on each path, and the
//! external path never claims more than the fallback would for any larger
//! sample.

use crate::models::{AnalysisSource, DataQuality};

/// Asymptotic confidence of the fallback path.
pub const FALLBACK_CONFIDENCE_CEILING: f64 = 0.9;

/// Sample size at which fallback confidence reaches half its ceiling.
pub const CONFIDENCE_HALF_SAMPLE: f64 = 10.0;

/// Multiplier applied when candidate figures are estimated.
pub const ESTIMATED_CANDIDATES_PENALTY: f64 = 0.8;

/// Bonus the external path may claim over the fallback at the same sample size.
pub const EXTERNAL_CONFIDENCE_BONUS: f64 = 0.1;

/// Postings needed for `High` data quality.
pub const HIGH_QUALITY_MIN_POSTINGS: u32 = 20;

/// Postings needed for `Medium` data quality without measured candidates.
pub const MEDIUM_QUALITY_MIN_POSTINGS: u32 = 5;

/// Confidence of the deterministic fallback for `sample_size` records.
pub fn fallback_confidence(sample_size: u32, candidates_estimated: bool) -> f64 {
    let n = f64::from(sample_size);
    let base = FALLBACK_CONFIDENCE_CEILING * n / (n + CONFIDENCE_HALF_SAMPLE);
    let score = if candidates_estimated {
        base * ESTIMATED_CANDIDATES_PENALTY
    } else {
        base
    };
    round_score(score)
}

/// The most confidence the external path may claim for `sample_size` records.
///
/// Capped at the fallback's confidence for one more record, which keeps the
/// external claim below the fallback's for every larger sample.
pub fn external_confidence_ceiling(sample_size: u32, candidates_estimated: bool) -> f64 {
    let same = fallback_confidence(sample_size, candidates_estimated);
    let next = fallback_confidence(sample_size.saturating_add(1), candidates_estimated);
    round_score((same + EXTERNAL_CONFIDENCE_BONUS).min(next).min(1.0))
}

/// Confidence for a result produced by `source`.
///
/// Depends only on the collected sample, never on a producer's own claim.
pub fn confidence_for(source: AnalysisSource, sample_size: u32, candidates_estimated: bool) -> f64 {
    match source {
        AnalysisSource::DeterministicFallback => {
            fallback_confidence(sample_size, candidates_estimated)
        }
        AnalysisSource::BoundedService => {
            external_confidence_ceiling(sample_size, candidates_estimated)
        }
    }
}

/// Qualitative data quality of the collected records.
///
/// Estimated candidate figures cap the label at `Medium`.
pub fn data_quality(postings: u32, profiles: u32, candidates_estimated: bool) -> DataQuality {
    let measured_candidates = profiles > 0 && !candidates_estimated;
    let quality = if postings >= HIGH_QUALITY_MIN_POSTINGS && measured_candidates {
        DataQuality::High
    } else if postings >= MEDIUM_QUALITY_MIN_POSTINGS || measured_candidates {
        DataQuality::Medium
    } else {
        DataQuality::Low
    };

    if candidates_estimated {
        quality.min(DataQuality::Medium)
    } else {
        quality
    }
}

// Three decimals keep serialized output stable and readable.
fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
