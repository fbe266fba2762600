//! Request types for the market intelligence API.
//!
//! This module defines the JSON request structures for the `/analyze` and
//! `/compensation` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{MarketQuery, RawPosting, RawProfile};

/// Request body for the `/analyze` endpoint.
///
/// The caller supplies the records it already collected; the API does not
/// scrape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// The search criteria.
    pub query: MarketQuery,
    /// Collected job postings.
    #[serde(default)]
    pub postings: Vec<RawPosting>,
    /// Collected candidate profiles.
    #[serde(default)]
    pub profiles: Vec<RawProfile>,
}

impl AnalyzeRequest {
    /// Returns a description of the first invalid field, if any.
    pub fn validate(&self) -> Option<String> {
        if self.query.role_title.trim().is_empty() {
            return Some("query.role_title must not be empty".to_string());
        }
        if self.query.location.trim().is_empty() {
            return Some("query.location must not be empty".to_string());
        }
        None
    }
}

/// Request body for the `/compensation` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationRequest {
    /// Free-text salary strings, one per posting.
    pub salaries: Vec<String>,
    /// Location used to infer the currency of bare amounts.
    #[serde(default)]
    pub location: Option<String>,
}
