//! Application state for the market intelligence API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::error::IntelResult;
use crate::orchestrator::{Analyzer, BoundedServiceAnalyzer};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the loaded analysis configuration and the external analyzer.
#[derive(Clone)]
pub struct AppState {
    /// The loaded analysis configuration.
    config: Arc<AnalysisConfig>,
    /// The bounded analysis service, when one is configured.
    external: Option<Arc<dyn Analyzer>>,
}

impl AppState {
    /// Creates a state that serves the deterministic path only.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config: Arc::new(config),
            external: None,
        }
    }

    /// Creates a state, building the bounded service client when the
    /// configuration names one.
    pub fn from_config(config: AnalysisConfig) -> IntelResult<Self> {
        let external = match &config.external_service {
            Some(service) => {
                let analyzer: Arc<dyn Analyzer> =
                    Arc::new(BoundedServiceAnalyzer::new(service.clone())?);
                Some(analyzer)
            }
            None => None,
        };
        Ok(Self {
            config: Arc::new(config),
            external,
        })
    }

    /// Replaces the external analyzer.
    pub fn with_external(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.external = Some(analyzer);
        self
    }

    /// Returns the analysis configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Returns the external analyzer, if any.
    pub fn external(&self) -> Option<&Arc<dyn Analyzer>> {
        self.external.as_ref()
    }
}
