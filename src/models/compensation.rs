//! Compensation summary model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Percentile-based compensation ranges for one role/location query.
///
/// Only ever built from at least one observation. An empty observation set is
/// represented by the absence of a summary, never by a zeroed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationSummary {
    /// The dominant currency of the contributing observations.
    pub currency: Currency,
    /// 25th percentile of the annualized minimums.
    pub base_min: Decimal,
    /// 75th percentile of the annualized maximums.
    pub base_max: Decimal,
    /// `base_min` with the bonus/equity uplift applied, rounded to whole units.
    pub total_comp_min: Decimal,
    /// `base_max` with the bonus/equity uplift applied, rounded to whole units.
    pub total_comp_max: Decimal,
    /// Number of observations that contributed.
    pub sample_size: usize,
    /// Raw published strings kept for display, in observation order.
    pub published_ranges: Vec<String>,
}

impl CompensationSummary {
    /// Formats the base range for display, e.g. `"$120000 - $160000"`.
    pub fn base_range_label(&self) -> String {
        format!(
            "{}{} - {}{}",
            self.currency.symbol(),
            self.base_min.normalize(),
            self.currency.symbol(),
            self.base_max.normalize()
        )
    }
}
