//! Analysis result models.
//!
//! [`AnalysisResult`] is the fixed-shape record returned by the orchestrator.
//! Both the bounded external service and the deterministic fallback produce
//! exactly this structure, so callers never need to know which path ran.
//! Every collection inside it is an ordered `Vec`; two identical analyses
//! serialize to identical bytes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CompensationSummary, MarketSnapshot};
use crate::error::{IntelError, IntelResult};

/// Qualitative label for how much the underlying figures can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    /// Thin or mostly estimated data.
    Low,
    /// Usable data with gaps or estimates.
    Medium,
    /// Measured data with a healthy sample.
    High,
}

/// Which producer built the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// The bounded external analysis service.
    BoundedService,
    /// The deterministic local algorithm.
    DeterministicFallback,
}

/// Qualitative availability of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityLevel {
    /// Few candidates relative to demand.
    Scarce,
    /// A workable pool.
    Moderate,
    /// A large pool.
    Abundant,
}

/// How hard other employers are competing for the same people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    /// Little competing demand.
    Low,
    /// Some competing demand.
    Moderate,
    /// Strong competing demand.
    High,
}

/// Expected speed of a hiring process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiringPace {
    /// Roles fill quickly.
    Fast,
    /// Typical time to fill.
    Moderate,
    /// Roles take long to fill.
    Slow,
}

/// Talent availability section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentAvailability {
    /// Candidate profiles found (or estimated).
    pub total_candidates: u32,
    /// Profiles listing a current employer (passive candidates).
    pub currently_employed: u32,
    /// Qualitative availability.
    pub level: AvailabilityLevel,
    /// One-sentence summary.
    pub description: String,
}

/// Supply/demand section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDemand {
    /// The computed snapshot.
    pub snapshot: MarketSnapshot,
    /// One-sentence summary.
    pub description: String,
}

/// A company competing for the same talent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// The company name as published.
    pub company: String,
    /// Open roles found for this company.
    pub open_roles: u32,
}

/// Competition section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Distinct companies hiring for the role.
    pub hiring_companies: u32,
    /// The most active companies, most postings first.
    pub top_competitors: Vec<Competitor>,
    /// Mean applicants per posting, when any posting reported it.
    pub average_applicants: Option<Decimal>,
    /// Qualitative competition.
    pub level: CompetitionLevel,
    /// One-sentence summary.
    pub description: String,
}

/// Hiring velocity section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringVelocity {
    /// Rough days-to-fill estimate.
    pub estimated_days_to_fill: u32,
    /// Qualitative pace.
    pub pace: HiringPace,
    /// One-sentence summary.
    pub description: String,
}

/// A skill and how many profiles list it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    /// The skill as first published.
    pub skill: String,
    /// Profiles listing it.
    pub count: u32,
}

/// Skill landscape section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLandscape {
    /// Most common skills, most frequent first.
    pub top_skills: Vec<SkillFrequency>,
    /// Profiles that listed at least one skill.
    pub profiles_with_skills: u32,
}

/// A location and how many records mention it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    /// The location as first published.
    pub location: String,
    /// Postings and profiles in it.
    pub count: u32,
}

/// Geographic spread section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicSpread {
    /// Most common locations, most frequent first.
    pub top_locations: Vec<LocationCount>,
    /// Share of located records that are remote, between 0 and 1.
    pub remote_share: Decimal,
}

/// Provenance and trust metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Quality of the underlying data.
    pub data_quality: DataQuality,
    /// Confidence in the analysis, between 0 and 1.
    pub confidence: f64,
    /// Which producer built the result.
    pub source: AnalysisSource,
    /// Postings the analysis was based on.
    pub postings_analyzed: u32,
    /// Profiles the analysis was based on.
    pub profiles_analyzed: u32,
    /// Salary observations behind the compensation section.
    pub salary_sample_size: u32,
    /// True when candidate figures are estimated from job counts.
    pub candidates_estimated: bool,
}

/// The orchestrator's final output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Talent availability.
    pub talent_availability: TalentAvailability,
    /// Supply and demand.
    pub supply_demand: SupplyDemand,
    /// Competing employers.
    pub competition: Competition,
    /// Hiring velocity.
    pub hiring_velocity: HiringVelocity,
    /// Skill landscape.
    pub skill_landscape: SkillLandscape,
    /// Geographic spread.
    pub geographic_spread: GeographicSpread,
    /// Compensation ranges; absent when no posting published a parseable salary.
    pub compensation: Option<CompensationSummary>,
    /// Narrative insights.
    pub insights: Vec<String>,
    /// Risks for the hiring plan.
    pub red_flags: Vec<String>,
    /// Levers the hiring plan can use.
    pub opportunities: Vec<String>,
    /// Provenance and trust metadata.
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Checks the numeric invariants a deserialized result must satisfy.
    ///
    /// Serde already guarantees the shape; this rejects values no producer
    /// may emit, such as a confidence outside `[0, 1]` or an inverted
    /// compensation range.
    pub fn validate(&self) -> IntelResult<()> {
        let invalid = |message: &str| {
            Err(IntelError::InvalidExternalResponse {
                message: message.to_string(),
            })
        };

        let confidence = self.metadata.confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return invalid("confidence must be between 0 and 1");
        }

        let snapshot = &self.supply_demand.snapshot;
        if snapshot.ratio < Decimal::ZERO {
            return invalid("supply/demand ratio must not be negative");
        }
        if !snapshot.ratio_label.ends_with(":1") {
            return invalid("supply/demand ratio label must have the form N:1");
        }

        if let Some(comp) = &self.compensation {
            if comp.sample_size == 0 {
                return invalid("compensation present with zero sample size");
            }
            if comp.base_min <= Decimal::ZERO || comp.base_min > comp.base_max {
                return invalid("compensation base range must be positive and ordered");
            }
            if comp.total_comp_min > comp.total_comp_max {
                return invalid("total compensation range must be ordered");
            }
        }

        let remote = self.geographic_spread.remote_share;
        if remote < Decimal::ZERO || remote > Decimal::ONE {
            return invalid("remote share must be between 0 and 1");
        }

        Ok(())
    }
}
