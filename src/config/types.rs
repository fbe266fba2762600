//! Configuration types for the analysis pipeline.
//!
//! File-level structures are deserialized from `analysis.yaml`; the runtime
//! [`AnalysisConfig`] is what the orchestrator is constructed with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for each collection collaborator call, in seconds.
pub const DEFAULT_COLLECTION_TIMEOUT_SECS: u64 = 60;

/// Default timeout for the bounded analysis service, in seconds.
pub const DEFAULT_EXTERNAL_TIMEOUT_SECS: u64 = 300;

/// Default number of postings and profiles summarized into the external payload.
pub const DEFAULT_SUMMARY_LIMIT: usize = 20;

/// Policy constants used by the salary parser and compensation aggregator.
///
/// Changing a default changes every published total-compensation figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryPolicy {
    /// A `k`-suffixed figure is scaled by 1,000 only below this value.
    pub k_notation_threshold: Decimal,
    /// Multiplier from `base_min` to `total_comp_min`.
    pub total_comp_min_uplift: Decimal,
    /// Multiplier from `base_max` to `total_comp_max`.
    pub total_comp_max_uplift: Decimal,
    /// Maximum raw salary strings kept in a summary.
    pub published_range_limit: usize,
}

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            k_notation_threshold: Decimal::from(1000),
            total_comp_min_uplift: Decimal::new(110, 2),
            total_comp_max_uplift: Decimal::new(115, 2),
            published_range_limit: 5,
        }
    }
}

/// Limits for the two collection collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Timeout applied independently to each collaborator call.
    pub timeout_secs: u64,
    /// Maximum postings requested.
    pub max_postings: usize,
    /// Maximum profiles requested.
    pub max_profiles: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_COLLECTION_TIMEOUT_SECS,
            max_postings: 50,
            max_profiles: 50,
        }
    }
}

impl CollectionConfig {
    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The `external_service` section as written in `analysis.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalServiceFile {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub endpoint: String,
    /// The model name to request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    #[serde(default = "default_external_timeout")]
    pub timeout_secs: u64,
    /// How many postings and profiles to summarize into the payload.
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
}

fn default_external_timeout() -> u64 {
    DEFAULT_EXTERNAL_TIMEOUT_SECS
}

fn default_summary_limit() -> usize {
    DEFAULT_SUMMARY_LIMIT
}

/// Structure of `analysis.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisFile {
    /// Collection limits.
    #[serde(default)]
    pub collection: CollectionConfig,
    /// The bounded analysis service, if one is used.
    #[serde(default)]
    pub external_service: Option<ExternalServiceFile>,
    /// Parser and aggregator policy.
    #[serde(default)]
    pub policy: SalaryPolicy,
}

/// Resolved settings for the bounded analysis service.
#[derive(Clone, PartialEq, Eq)]
pub struct ExternalServiceConfig {
    /// Base URL of an OpenAI-compatible API.
    pub endpoint: String,
    /// The model name to request.
    pub model: String,
    /// Bearer credential.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// How many postings and profiles to summarize into the payload.
    pub summary_limit: usize,
}

impl ExternalServiceConfig {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for ExternalServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("summary_limit", &self.summary_limit)
            .finish()
    }
}

/// Everything the orchestrator needs, passed in explicitly at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Collection limits.
    pub collection: CollectionConfig,
    /// The bounded analysis service; `None` runs the deterministic path only.
    pub external_service: Option<ExternalServiceConfig>,
    /// Parser and aggregator policy.
    pub policy: SalaryPolicy,
}

impl AnalysisConfig {
    /// Sets the bounded analysis service.
    pub fn with_external_service(mut self, service: ExternalServiceConfig) -> Self {
        self.external_service = Some(service);
        self
    }

    /// Sets the collection limits.
    pub fn with_collection(mut self, collection: CollectionConfig) -> Self {
        self.collection = collection;
        self
    }
}
