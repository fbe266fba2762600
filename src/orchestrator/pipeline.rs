//! The bounded analysis orchestrator.
//!
//! One call to [`AnalysisOrchestrator::analyze`] walks a small state machine:
//!
//! ```text
//! Collecting -> Delegating -> AwaitingExternal -> Completed
//!                          \                  \-> FallingBack -> Completed
//!                           \-> FallingBack ------------------> Completed
//!                            \-> Failed
//! ```
//!
//! Nothing is delegated when both collections come back empty. A result from
//! the external service keeps its wording and qualitative judgements, but
//! every figure in it is recomputed from the collected records.
//!
//! Collection failures, external failures and timeouts are all recovered
//! here. The only thing a caller can receive besides a result is
//! [`NoDataAvailable`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::calculation::confidence_for;
use crate::config::{AnalysisConfig, DEFAULT_EXTERNAL_TIMEOUT_SECS};
use crate::error::{IntelError, IntelResult, NoDataAvailable};
use crate::models::{AnalysisMetadata, AnalysisResult, AnalysisSource, MarketQuery};

use super::analyzer::{Analyzer, CollectedData, FallbackAnalyzer};
use super::collectors::{PostingsCollector, ProfilesCollector};
use super::external_service::BoundedServiceAnalyzer;

enum Step {
    Collecting,
    Delegating(CollectedData),
    AwaitingExternal(Arc<dyn Analyzer>, CollectedData),
    FallingBack(CollectedData),
    Completed(AnalysisResult),
    Failed(NoDataAvailable),
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Collecting => "collecting",
            Step::Delegating(_) => "delegating",
            Step::AwaitingExternal(..) => "awaiting_external",
            Step::FallingBack(_) => "falling_back",
            Step::Completed(_) => "completed",
            Step::Failed(_) => "failed",
        }
    }
}

/// Top-level entry point of the pipeline.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use market_intel::config::AnalysisConfig;
/// use market_intel::models::{AnalysisSource, MarketQuery, RawPosting};
/// use market_intel::orchestrator::{AnalysisOrchestrator, StaticPostings, StaticProfiles};
///
/// # #[tokio::main]
/// # async fn main() {
/// let postings = vec![RawPosting {
///     title: "Backend Engineer".to_string(),
///     company_name: "Acme".to_string(),
///     salary: "€70k-€90k".to_string(),
///     ..RawPosting::default()
/// }];
/// let orchestrator = AnalysisOrchestrator::new(
///     AnalysisConfig::default(),
///     Arc::new(StaticPostings::new(postings)),
///     Arc::new(StaticProfiles::default()),
/// );
///
/// let query = MarketQuery::new("Backend Engineer", "Berlin");
/// let result = orchestrator.analyze(&query).await.unwrap();
/// assert_eq!(result.metadata.source, AnalysisSource::DeterministicFallback);
/// # }
/// ```
pub struct AnalysisOrchestrator {
    config: AnalysisConfig,
    postings: Arc<dyn PostingsCollector>,
    profiles: Arc<dyn ProfilesCollector>,
    external: Option<Arc<dyn Analyzer>>,
    fallback: FallbackAnalyzer,
}

impl AnalysisOrchestrator {
    /// Creates an orchestrator that runs the deterministic path only.
    pub fn new(
        config: AnalysisConfig,
        postings: Arc<dyn PostingsCollector>,
        profiles: Arc<dyn ProfilesCollector>,
    ) -> Self {
        let fallback = FallbackAnalyzer::new(config.policy.clone());
        Self {
            config,
            postings,
            profiles,
            external: None,
            fallback,
        }
    }

    /// Creates an orchestrator and attaches the bounded service when the
    /// configuration names one.
    pub fn from_config(
        config: AnalysisConfig,
        postings: Arc<dyn PostingsCollector>,
        profiles: Arc<dyn ProfilesCollector>,
    ) -> IntelResult<Self> {
        let service = config.external_service.clone();
        let orchestrator = Self::new(config, postings, profiles);
        match service {
            Some(service) => {
                let analyzer = BoundedServiceAnalyzer::new(service)?;
                Ok(orchestrator.with_external(Arc::new(analyzer)))
            }
            None => Ok(orchestrator),
        }
    }

    /// Attaches an external analyzer tried before the fallback.
    pub fn with_external(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.external = Some(analyzer);
        self
    }

    /// True when an external analyzer is attached.
    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Runs one analysis.
    ///
    /// # Returns
    ///
    /// The analysis, or [`NoDataAvailable`] when nothing was collected and no
    /// producer could build a result.
    pub async fn analyze(&self, query: &MarketQuery) -> Result<AnalysisResult, NoDataAvailable> {
        let mut step = Step::Collecting;
        loop {
            debug!(state = step.name(), role = %query.role_title, "Analysis state");
            step = match step {
                Step::Collecting => Step::Delegating(self.collect(query).await),
                Step::Delegating(data) if data.is_empty() => {
                    Step::Failed(NoDataAvailable::for_query(query))
                }
                Step::Delegating(data) => match &self.external {
                    Some(external) => Step::AwaitingExternal(Arc::clone(external), data),
                    None => Step::FallingBack(data),
                },
                Step::AwaitingExternal(external, data) => {
                    let reply = self.run_external(external.as_ref(), &data).await;
                    match reply.and_then(|result| {
                        let measured = self.fallback.analyze_now(&data)?;
                        Ok(restamp(result, measured, external.source()))
                    }) {
                        Ok(result) => Step::Completed(result),
                        Err(e) => {
                            warn!(
                                error = %e,
                                "External analysis failed; using deterministic fallback"
                            );
                            Step::FallingBack(data)
                        }
                    }
                }
                Step::FallingBack(data) => match self.fallback.analyze_now(&data) {
                    Ok(result) => Step::Completed(result),
                    Err(IntelError::NoDataAvailable(e)) => Step::Failed(e),
                    Err(e) => Step::Failed(NoDataAvailable::new(e.to_string())),
                },
                Step::Completed(result) => {
                    info!(
                        source = ?result.metadata.source,
                        confidence = result.metadata.confidence,
                        sample_size = result
                            .metadata
                            .postings_analyzed
                            .saturating_add(result.metadata.profiles_analyzed),
                        data_quality = ?result.metadata.data_quality,
                        "Analysis completed"
                    );
                    return Ok(result);
                }
                Step::Failed(e) => {
                    warn!(
                        role = %query.role_title,
                        location = %query.location,
                        "No data to analyze"
                    );
                    return Err(e);
                }
            };
        }
    }

    async fn collect(&self, query: &MarketQuery) -> CollectedData {
        let limits = &self.config.collection;
        let timeout = limits.timeout();

        let postings = bounded(
            "postings",
            timeout,
            limits.max_postings,
            self.postings.collect_postings(
                &query.role_title,
                &query.location,
                query.experience_level,
                limits.max_postings,
            ),
        );
        let profiles = bounded(
            "profiles",
            timeout,
            limits.max_profiles,
            self.profiles
                .collect_profiles(query.profile_search(), &query.location, limits.max_profiles),
        );
        let (postings, profiles) = tokio::join!(postings, profiles);

        CollectedData {
            query: query.clone(),
            postings,
            profiles,
        }
    }

    async fn run_external(
        &self,
        external: &dyn Analyzer,
        data: &CollectedData,
    ) -> IntelResult<AnalysisResult> {
        let limit = self.external_timeout();
        match tokio::time::timeout(limit, external.analyze(data)).await {
            Ok(result) => result,
            Err(_) => Err(IntelError::ExternalService {
                message: format!("no response within {}s", limit.as_secs()),
            }),
        }
    }

    fn external_timeout(&self) -> Duration {
        self.config
            .external_service
            .as_ref()
            .map(|s| s.timeout())
            .unwrap_or(Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS))
    }
}

/// Awaits one collaborator under its own timeout.
///
/// Errors and timeouts become an empty list.
async fn bounded<T>(
    collaborator: &'static str,
    limit: Duration,
    max_items: usize,
    call: impl Future<Output = IntelResult<Vec<T>>>,
) -> Vec<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(mut records)) => {
            records.truncate(max_items);
            debug!(collaborator, count = records.len(), "Collection finished");
            records
        }
        Ok(Err(e)) => {
            warn!(collaborator, error = %e, "Collection failed; continuing without it");
            Vec::new()
        }
        Err(_) => {
            warn!(
                collaborator,
                timeout_secs = limit.as_secs(),
                "Collection timed out; continuing without it"
            );
            Vec::new()
        }
    }
}

/// Replaces every figure in a producer's result with the one measured from
/// the collected records.
///
/// `measured` is the fallback synthesis over the same data. The producer keeps
/// its descriptions, qualitative levels, hiring estimate and narrative.
fn restamp(
    mut result: AnalysisResult,
    measured: AnalysisResult,
    source: AnalysisSource,
) -> AnalysisResult {
    result.compensation = measured.compensation;
    result.supply_demand.snapshot = measured.supply_demand.snapshot;
    result.skill_landscape = measured.skill_landscape;
    result.geographic_spread = measured.geographic_spread;

    let talent = &mut result.talent_availability;
    talent.total_candidates = measured.talent_availability.total_candidates;
    talent.currently_employed = measured.talent_availability.currently_employed;

    let competition = &mut result.competition;
    competition.hiring_companies = measured.competition.hiring_companies;
    competition.top_competitors = measured.competition.top_competitors;
    competition.average_applicants = measured.competition.average_applicants;

    let metadata = measured.metadata;
    result.metadata = AnalysisMetadata {
        source,
        confidence: confidence_for(
            source,
            metadata.postings_analyzed.saturating_add(metadata.profiles_analyzed),
            metadata.candidates_estimated,
        ),
        ..metadata
    };
    result
}
