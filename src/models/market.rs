//! Supply/demand snapshot model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How competitive a labor market is for the hiring side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tightness {
    /// Candidates are scarce relative to open roles.
    Tight,
    /// Neither side dominates.
    Balanced,
    /// Candidates are plentiful relative to open roles.
    Loose,
}

impl Tightness {
    /// Returns the lowercase label used in narrative text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tightness::Tight => "tight",
            Tightness::Balanced => "balanced",
            Tightness::Loose => "loose",
        }
    }
}

/// Which figures the tightness classification was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandBasis {
    /// Classified on the measured candidates-per-job ratio.
    ProfileCount,
    /// No candidate data; classified on the number of open jobs alone.
    JobCountOnly,
}

/// Supply/demand view for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Open postings found.
    pub open_jobs: u32,
    /// Candidates found, or the estimate when `candidates_estimated` is set.
    pub available_candidates: u32,
    /// Candidates per open job, one decimal place.
    pub ratio: Decimal,
    /// The ratio rendered as `"N:1"`.
    pub ratio_label: String,
    /// The classified market tightness.
    pub tightness: Tightness,
    /// The figures the classification was based on.
    pub basis: DemandBasis,
    /// True when `available_candidates` is an estimate rather than a measurement.
    pub candidates_estimated: bool,
}
