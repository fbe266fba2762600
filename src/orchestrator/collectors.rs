//! Collection collaborator seams.
//!
//! Scraping and search live outside this crate. The orchestrator only sees
//! these two traits; anything that can produce raw postings or profiles can
//! plug in.

use async_trait::async_trait;

use crate::error::IntelResult;
use crate::models::{ExperienceLevel, RawPosting, RawProfile};

/// Produces job postings for a role and location.
#[async_trait]
pub trait PostingsCollector: Send + Sync {
    /// Collects at most `max_items` postings.
    async fn collect_postings(
        &self,
        role_title: &str,
        location: &str,
        experience_level: ExperienceLevel,
        max_items: usize,
    ) -> IntelResult<Vec<RawPosting>>;
}

/// Produces candidate profiles for a search and location.
#[async_trait]
pub trait ProfilesCollector: Send + Sync {
    /// Collects at most `max_items` profiles.
    async fn collect_profiles(
        &self,
        search_query: &str,
        location: &str,
        max_items: usize,
    ) -> IntelResult<Vec<RawProfile>>;
}

/// Serves postings the caller already holds.
#[derive(Debug, Clone, Default)]
pub struct StaticPostings {
    postings: Vec<RawPosting>,
}

impl StaticPostings {
    /// Wraps a fixed set of postings.
    pub fn new(postings: Vec<RawPosting>) -> Self {
        Self { postings }
    }
}

#[async_trait]
impl PostingsCollector for StaticPostings {
    async fn collect_postings(
        &self,
        _role_title: &str,
        _location: &str,
        _experience_level: ExperienceLevel,
        max_items: usize,
    ) -> IntelResult<Vec<RawPosting>> {
        Ok(self.postings.iter().take(max_items).cloned().collect())
    }
}

/// Serves profiles the caller already holds.
#[derive(Debug, Clone, Default)]
pub struct StaticProfiles {
    profiles: Vec<RawProfile>,
}

impl StaticProfiles {
    /// Wraps a fixed set of profiles.
    pub fn new(profiles: Vec<RawProfile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfilesCollector for StaticProfiles {
    async fn collect_profiles(
        &self,
        _search_query: &str,
        _location: &str,
        max_items: usize,
    ) -> IntelResult<Vec<RawProfile>> {
        Ok(self.profiles.iter().take(max_items).cloned().collect())
    }
}
