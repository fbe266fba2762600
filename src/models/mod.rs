//! Core data models for the market intelligence pipeline.
//!
//! This module contains all the domain models used throughout the pipeline.

mod analysis_result;
mod compensation;
mod market;
mod records;
mod salary;

pub use analysis_result::{
    AnalysisMetadata, AnalysisResult, AnalysisSource, AvailabilityLevel, Competition,
    CompetitionLevel, Competitor, DataQuality, GeographicSpread, HiringPace, HiringVelocity,
    LocationCount, SkillFrequency, SkillLandscape, SupplyDemand, TalentAvailability,
};
pub use compensation::CompensationSummary;
pub use market::{DemandBasis, MarketSnapshot, Tightness};
pub use records::{ExperienceLevel, MarketQuery, QueryFocus, RawPosting, RawProfile};
pub use salary::{Currency, NormalizedObservation, SalaryObservation, SalaryPeriod};
