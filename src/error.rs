//! Error types for the market intelligence pipeline.
//!
//! Almost every failure inside the pipeline is recovered locally: a salary
//! string without numbers is simply `None`, a failed collaborator becomes an
//! empty list, and a failed external analysis triggers the deterministic
//! fallback. [`NoDataAvailable`] is the only error that reaches callers of
//! the orchestrator.

use thiserror::Error;

use crate::models::MarketQuery;

/// The caller-visible "nothing to analyze" signal.
///
/// Returned by the orchestrator when neither collection produced any record
/// and no analysis could be synthesized. Retrying with different criteria is
/// a caller concern.
///
/// # Example
///
/// ```
/// use market_intel::error::NoDataAvailable;
///
/// let err = NoDataAvailable::new("no postings or profiles for 'Welder' in 'Oslo'");
/// assert!(err.to_string().starts_with("Insufficient data"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Insufficient data, try different criteria: {message}")]
pub struct NoDataAvailable {
    /// Human-readable explanation of what was searched.
    pub message: String,
}

impl NoDataAvailable {
    /// Creates a new no-data signal with the given explanation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The no-data signal for a query whose collections came back empty.
    pub fn for_query(query: &MarketQuery) -> Self {
        Self::new(format!(
            "no postings or profiles for '{}' in '{}'",
            query.role_title, query.location
        ))
    }
}

/// The main error type for the market intelligence pipeline.
#[derive(Debug, Error)]
pub enum IntelError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was present but unusable.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A collection collaborator errored.
    #[error("Collection from {collaborator} failed: {message}")]
    CollectionFailed {
        /// Which collaborator failed ("postings" or "profiles").
        collaborator: String,
        /// A description of the failure.
        message: String,
    },

    /// The bounded analysis service could not be reached or returned an error status.
    #[error("External analysis service error: {message}")]
    ExternalService {
        /// A description of the failure.
        message: String,
    },

    /// The bounded analysis service answered with something that is not a valid result.
    #[error("Invalid external analysis response: {message}")]
    InvalidExternalResponse {
        /// What made the response unusable.
        message: String,
    },

    /// Nothing to analyze.
    #[error(transparent)]
    NoDataAvailable(#[from] NoDataAvailable),
}

/// A type alias for Results that return IntelError.
pub type IntelResult<T> = Result<T, IntelError>;

impl From<reqwest::Error> for IntelError {
    fn from(error: reqwest::Error) -> Self {
        IntelError::ExternalService {
            message: error.to_string(),
        }
    }
}
