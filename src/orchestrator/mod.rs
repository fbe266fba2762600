//! Bounded analysis orchestration.
//!
//! This module is the only part of the crate that knows about concurrency
//! and the external analysis service. It collects records through the
//! collaborator traits, tries the bounded service when one is attached, and
//! falls back to [`crate::calculation::synthesize`] otherwise.

mod analyzer;
mod collectors;
mod external_service;
mod pipeline;

pub use analyzer::{Analyzer, CollectedData, FallbackAnalyzer};
pub use collectors::{PostingsCollector, ProfilesCollector, StaticPostings, StaticProfiles};
pub use external_service::{
    AnalysisPayload, BoundedServiceAnalyzer, PAYLOAD_SKILLS_PER_PROFILE, PostingSummary,
    ProfileSummary, parse_analysis,
};
pub use pipeline::AnalysisOrchestrator;
