//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the analysis
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use reqwest::Url;
use tracing::warn;

use crate::error::{IntelError, IntelResult};

use super::types::{AnalysisConfig, AnalysisFile, ExternalServiceConfig, ExternalServiceFile};

/// Loads the analysis configuration.
///
/// The configuration directory holds a single `analysis.yaml`:
/// ```text
/// config/market_intel/
/// └── analysis.yaml   # collection limits, external service, policy
/// ```
///
/// The external service credential is read from the environment variable
/// named by `external_service.api_key_env`. This is the only place the
/// pipeline reads the environment; everything downstream receives the
/// resolved [`AnalysisConfig`].
///
/// # Example
///
/// ```no_run
/// use market_intel::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/market_intel").unwrap();
/// println!("External service: {}", loader.config().external_service.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AnalysisConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `analysis.yaml` is missing
    /// - the file contains invalid YAML
    /// - the external service endpoint is not a URL
    ///
    /// A configured external service whose API key variable is unset is
    /// disabled with a warning rather than failing the load.
    pub fn load<P: AsRef<Path>>(path: P) -> IntelResult<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Loads configuration, resolving environment variables through `env`.
    pub fn load_with_env<P, F>(path: P, env: F) -> IntelResult<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let analysis_path = path.as_ref().join("analysis.yaml");
        let file = Self::load_yaml::<AnalysisFile>(&analysis_path)?;
        Self::from_file(file, env)
    }

    /// Resolves a parsed file into the runtime configuration.
    pub fn from_file<F>(file: AnalysisFile, env: F) -> IntelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if file.collection.timeout_secs == 0 {
            return Err(IntelError::InvalidConfig {
                field: "collection.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let external_service = match file.external_service {
            Some(service) => Self::resolve_service(service, &env)?,
            None => None,
        };

        Ok(Self {
            config: AnalysisConfig {
                collection: file.collection,
                external_service,
                policy: file.policy,
            },
        })
    }

    fn resolve_service<F>(
        service: ExternalServiceFile,
        env: &F,
    ) -> IntelResult<Option<ExternalServiceConfig>>
    where
        F: Fn(&str) -> Option<String>,
    {
        Url::parse(&service.endpoint).map_err(|e| IntelError::InvalidConfig {
            field: "external_service.endpoint".to_string(),
            message: e.to_string(),
        })?;
        if service.timeout_secs == 0 {
            return Err(IntelError::InvalidConfig {
                field: "external_service.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let Some(api_key) = env(&service.api_key_env).filter(|key| !key.trim().is_empty()) else {
            warn!(
                api_key_env = %service.api_key_env,
                "API key variable not set, bounded analysis disabled"
            );
            return Ok(None);
        };

        Ok(Some(ExternalServiceConfig {
            endpoint: service.endpoint.trim_end_matches('/').to_string(),
            model: service.model,
            api_key,
            timeout_secs: service.timeout_secs,
            summary_limit: service.summary_limit,
        }))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> IntelResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| IntelError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| IntelError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Consumes the loader, returning the resolved configuration.
    pub fn into_config(self) -> AnalysisConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/market_intel"
    }

    fn with_key(name: &str) -> Option<String> {
        (name == "MARKET_INTEL_API_KEY").then(|| "sk-test".to_string())
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load_with_env(config_path(), with_key);
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.collection.timeout_secs, 60);
        assert_eq!(config.collection.max_postings, 50);
        assert_eq!(config.policy.total_comp_min_uplift, Decimal::new(110, 2));

        let service = config.external_service.expect("service should be enabled");
        assert_eq!(service.endpoint, "https://api.openai.com/v1");
        assert_eq!(service.api_key, "sk-test");
        assert_eq!(service.timeout_secs, 300);
    }

    #[test]
    fn test_missing_api_key_disables_external_service() {
        let loader = ConfigLoader::load_with_env(config_path(), |_| None).unwrap();
        assert!(loader.config().external_service.is_none());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(IntelError::ConfigNotFound { path }) => {
                assert!(path.contains("analysis.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let file: AnalysisFile = serde_yaml::from_str(
            "external_service:\n  endpoint: not a url\n  model: m\n  api_key_env: K\n",
        )
        .unwrap();

        let result = ConfigLoader::from_file(file, |_| Some("key".to_string()));
        match result {
            Err(IntelError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "external_service.endpoint");
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_zero_collection_timeout_is_rejected() {
        let file: AnalysisFile =
            serde_yaml::from_str("collection:\n  timeout_secs: 0\n").unwrap();
        assert!(matches!(
            ConfigLoader::from_file(file, |_| None),
            Err(IntelError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_external_timeout_is_rejected() {
        let file: AnalysisFile = serde_yaml::from_str(
            "external_service:\n  endpoint: https://llm.example.com/v1\n  model: m\n  api_key_env: K\n  timeout_secs: 0\n",
        )
        .unwrap();

        match ConfigLoader::from_file(file, |_| Some("key".to_string())) {
            Err(IntelError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "external_service.timeout_secs");
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed_from_endpoint() {
        let file: AnalysisFile = serde_yaml::from_str(
            "external_service:\n  endpoint: https://llm.example.com/v1/\n  model: m\n  api_key_env: K\n",
        )
        .unwrap();

        let config = ConfigLoader::from_file(file, |_| Some("key".to_string()))
            .unwrap()
            .into_config();
        assert_eq!(
            config.external_service.unwrap().endpoint,
            "https://llm.example.com/v1"
        );
    }
}
