//! The analysis seam shared by both producers.

use async_trait::async_trait;

use crate::calculation::synthesize;
use crate::config::SalaryPolicy;
use crate::error::{IntelResult, NoDataAvailable};
use crate::models::{AnalysisResult, AnalysisSource, MarketQuery, RawPosting, RawProfile};

/// Everything collected for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedData {
    /// The original search criteria.
    pub query: MarketQuery,
    /// Postings, in collection order.
    pub postings: Vec<RawPosting>,
    /// Profiles, in collection order.
    pub profiles: Vec<RawProfile>,
}

impl CollectedData {
    /// True when neither collaborator produced a record.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty() && self.profiles.is_empty()
    }

    /// Postings plus profiles.
    pub fn sample_size(&self) -> usize {
        self.postings.len() + self.profiles.len()
    }
}

/// Turns collected data into an [`AnalysisResult`].
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Which producer this is, stamped into result metadata.
    fn source(&self) -> AnalysisSource;

    /// Analyzes the collected data.
    async fn analyze(&self, data: &CollectedData) -> IntelResult<AnalysisResult>;
}

/// The deterministic local producer.
#[derive(Debug, Clone, Default)]
pub struct FallbackAnalyzer {
    policy: SalaryPolicy,
}

impl FallbackAnalyzer {
    /// Creates a fallback analyzer using `policy` for salary handling.
    pub fn new(policy: SalaryPolicy) -> Self {
        Self { policy }
    }

    /// Synthesizes without going through the async seam.
    pub fn analyze_now(&self, data: &CollectedData) -> IntelResult<AnalysisResult> {
        synthesize(&data.query, &data.postings, &data.profiles, &self.policy)
            .ok_or_else(|| NoDataAvailable::for_query(&data.query).into())
    }
}

#[async_trait]
impl Analyzer for FallbackAnalyzer {
    fn source(&self) -> AnalysisSource {
        AnalysisSource::DeterministicFallback
    }

    async fn analyze(&self, data: &CollectedData) -> IntelResult<AnalysisResult> {
        self.analyze_now(data)
    }
}
