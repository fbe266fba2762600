//! Deterministic market synthesis.
//!
//! Builds a complete [`AnalysisResult`] from collected postings and profiles
//! using only the local calculations. This is the fallback path: it must
//! always produce the same output for the same input, so every tally is
//! keyed through a `BTreeMap` and every ranking breaks ties by name.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::SalaryPolicy;
use crate::models::{
    AnalysisMetadata, AnalysisResult, AnalysisSource, AvailabilityLevel, Competition,
    CompetitionLevel, Competitor, CompensationSummary, ExperienceLevel, GeographicSpread,
    HiringPace, HiringVelocity, LocationCount, MarketQuery, MarketSnapshot, QueryFocus,
    RawPosting, RawProfile, SkillFrequency, SkillLandscape, SupplyDemand, TalentAvailability,
    Tightness,
};

use super::{build_snapshot, confidence_for, data_quality, summarize_salaries};

/// Competitors listed in the competition section.
pub const TOP_COMPETITOR_LIMIT: usize = 5;

/// Skills listed in the skill landscape.
pub const TOP_SKILL_LIMIT: usize = 10;

/// Locations listed in the geographic spread.
pub const TOP_LOCATION_LIMIT: usize = 5;

/// Mean applicants per posting at or above which competition is high.
pub const HIGH_COMPETITION_APPLICANTS: i64 = 100;

/// Mean applicants per posting at or above which competition is moderate.
pub const MODERATE_COMPETITION_APPLICANTS: i64 = 25;

/// Distinct hiring companies at or above which competition is high.
pub const HIGH_COMPETITION_COMPANIES: u32 = 10;

/// Distinct hiring companies at or above which competition is moderate.
pub const MODERATE_COMPETITION_COMPANIES: u32 = 3;

/// Posting count below which the sample is flagged as thin.
pub const THIN_SAMPLE_POSTINGS: u32 = 5;

/// Remote share above which remote hiring is suggested.
pub fn remote_opportunity_share() -> Decimal {
    Decimal::new(30, 2)
}

const REMOTE_MARKER: &str = "remote";

/// Synthesizes an analysis from collected records.
///
/// # Arguments
///
/// * `query` - The original search criteria
/// * `postings` - Postings, in collection order
/// * `profiles` - Profiles, in collection order
/// * `policy` - Salary parsing and aggregation policy
///
/// # Returns
///
/// `None` when there are neither postings nor profiles to analyze.
///
/// # Examples
///
/// ```
/// use market_intel::calculation::synthesize;
/// use market_intel::config::SalaryPolicy;
/// use market_intel::models::{AnalysisSource, MarketQuery, RawPosting, Tightness};
///
/// let posting = |salary: &str| RawPosting {
///     title: "Backend Engineer".to_string(),
///     company_name: "Acme".to_string(),
///     location: "Berlin".to_string(),
///     salary: salary.to_string(),
///     applications_count: None,
/// };
/// let postings = vec![posting("$120k-$150k"), posting("$130k-$160k"), posting("")];
/// let query = MarketQuery::new("Backend Engineer", "Berlin");
///
/// let result = synthesize(&query, &postings, &[], &SalaryPolicy::default()).unwrap();
/// assert_eq!(result.supply_demand.snapshot.tightness, Tightness::Loose);
/// assert_eq!(result.compensation.unwrap().sample_size, 2);
/// assert_eq!(result.metadata.source, AnalysisSource::DeterministicFallback);
///
/// assert!(synthesize(&query, &[], &[], &SalaryPolicy::default()).is_none());
/// ```
pub fn synthesize(
    query: &MarketQuery,
    postings: &[RawPosting],
    profiles: &[RawProfile],
    policy: &SalaryPolicy,
) -> Option<AnalysisResult> {
    if postings.is_empty() && profiles.is_empty() {
        return None;
    }

    let open_jobs = count(postings.len());
    let profile_count = count(profiles.len());
    let measured_candidates = (!profiles.is_empty()).then_some(profile_count);
    let snapshot = build_snapshot(open_jobs, measured_candidates);

    let compensation = summarize_salaries(postings, policy);
    let talent_availability = talent_availability(profiles, &snapshot);
    let competition = competition(postings);
    let hiring_velocity = hiring_velocity(&snapshot, query.experience_level);
    let skill_landscape = skill_landscape(profiles);
    let geographic_spread = geographic_spread(postings, profiles);
    let supply_demand = SupplyDemand {
        description: supply_demand_description(query, &snapshot),
        snapshot,
    };

    let narrative = Narrative::build(
        query,
        &supply_demand.snapshot,
        &competition,
        &talent_availability,
        &skill_landscape,
        &geographic_spread,
        compensation.as_ref(),
    );

    let candidates_estimated = supply_demand.snapshot.candidates_estimated;
    let metadata = AnalysisMetadata {
        data_quality: data_quality(open_jobs, profile_count, candidates_estimated),
        confidence: confidence_for(
            AnalysisSource::DeterministicFallback,
            open_jobs.saturating_add(profile_count),
            candidates_estimated,
        ),
        source: AnalysisSource::DeterministicFallback,
        postings_analyzed: open_jobs,
        profiles_analyzed: profile_count,
        salary_sample_size: compensation.as_ref().map_or(0, |c| count(c.sample_size)),
        candidates_estimated,
    };

    Some(AnalysisResult {
        talent_availability,
        supply_demand,
        competition,
        hiring_velocity,
        skill_landscape,
        geographic_spread,
        compensation,
        insights: narrative.insights,
        red_flags: narrative.red_flags,
        opportunities: narrative.opportunities,
        metadata,
    })
}

fn talent_availability(profiles: &[RawProfile], snapshot: &MarketSnapshot) -> TalentAvailability {
    let currently_employed = count(
        profiles
            .iter()
            .filter(|p| p.current_company.as_deref().is_some_and(|c| !c.trim().is_empty()))
            .count(),
    );
    let level = match snapshot.tightness {
        Tightness::Tight => AvailabilityLevel::Scarce,
        Tightness::Balanced => AvailabilityLevel::Moderate,
        Tightness::Loose => AvailabilityLevel::Abundant,
    };

    let description = if snapshot.candidates_estimated {
        format!(
            "No candidate profiles were found; roughly {} candidates are estimated from {} open roles.",
            snapshot.available_candidates, snapshot.open_jobs
        )
    } else {
        format!(
            "{} candidate profiles found, {} of them currently employed.",
            snapshot.available_candidates, currently_employed
        )
    };

    TalentAvailability {
        total_candidates: snapshot.available_candidates,
        currently_employed,
        level,
        description,
    }
}

fn competition(postings: &[RawPosting]) -> Competition {
    let companies = tally(postings.iter().map(|p| p.company_name.as_str()));
    let hiring_companies = count(companies.len());

    let reported: Vec<u32> = postings.iter().filter_map(|p| p.applications_count).collect();
    let average_applicants = if reported.is_empty() {
        None
    } else {
        let total: Decimal = reported.iter().map(|&n| Decimal::from(n)).sum();
        Some(
            (total / Decimal::from(reported.len() as u64))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        )
    };

    let level = competition_level(hiring_companies, average_applicants);
    let description = match average_applicants {
        Some(avg) => format!(
            "{} companies are hiring for this role, averaging {} applicants per posting.",
            hiring_companies,
            avg.normalize()
        ),
        None => format!("{} companies are hiring for this role.", hiring_companies),
    };

    Competition {
        hiring_companies,
        top_competitors: companies
            .into_iter()
            .take(TOP_COMPETITOR_LIMIT)
            .map(|(company, open_roles)| Competitor { company, open_roles })
            .collect(),
        average_applicants,
        level,
        description,
    }
}

fn competition_level(
    hiring_companies: u32,
    average_applicants: Option<Decimal>,
) -> CompetitionLevel {
    let applicants = average_applicants.unwrap_or(Decimal::ZERO);
    if hiring_companies >= HIGH_COMPETITION_COMPANIES
        || applicants >= Decimal::from(HIGH_COMPETITION_APPLICANTS)
    {
        CompetitionLevel::High
    } else if hiring_companies >= MODERATE_COMPETITION_COMPANIES
        || applicants >= Decimal::from(MODERATE_COMPETITION_APPLICANTS)
    {
        CompetitionLevel::Moderate
    } else {
        CompetitionLevel::Low
    }
}

fn hiring_velocity(snapshot: &MarketSnapshot, level: ExperienceLevel) -> HiringVelocity {
    let (base_days, pace): (u32, HiringPace) = match snapshot.tightness {
        Tightness::Tight => (60, HiringPace::Slow),
        Tightness::Balanced => (40, HiringPace::Moderate),
        Tightness::Loose => (25, HiringPace::Fast),
    };
    let seniority_days: i32 = match level {
        ExperienceLevel::Entry => -5,
        ExperienceLevel::Mid => 0,
        ExperienceLevel::Senior => 5,
        ExperienceLevel::Lead => 10,
        ExperienceLevel::Executive => 20,
    };
    let estimated_days_to_fill = base_days.saturating_add_signed(seniority_days);

    HiringVelocity {
        estimated_days_to_fill,
        pace,
        description: format!(
            "A {} {} market suggests about {} days to fill.",
            snapshot.tightness.as_str(),
            level.as_str(),
            estimated_days_to_fill
        ),
    }
}

fn skill_landscape(profiles: &[RawProfile]) -> SkillLandscape {
    // A skill counts once per profile, however often it is listed.
    let per_profile: Vec<String> = profiles
        .iter()
        .flat_map(|p| {
            let mut seen: Vec<String> = Vec::new();
            for skill in &p.skills {
                let skill = skill.trim();
                if !skill.is_empty() && !seen.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                    seen.push(skill.to_string());
                }
            }
            seen
        })
        .collect();

    SkillLandscape {
        top_skills: tally(per_profile.iter().map(String::as_str))
            .into_iter()
            .take(TOP_SKILL_LIMIT)
            .map(|(skill, count)| SkillFrequency { skill, count })
            .collect(),
        profiles_with_skills: count(
            profiles
                .iter()
                .filter(|p| p.skills.iter().any(|s| !s.trim().is_empty()))
                .count(),
        ),
    }
}

fn geographic_spread(postings: &[RawPosting], profiles: &[RawProfile]) -> GeographicSpread {
    let locations: Vec<&str> = postings
        .iter()
        .map(|p| p.location.as_str())
        .chain(profiles.iter().map(|p| p.location.as_str()))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let remote = locations
        .iter()
        .filter(|l| l.to_lowercase().contains(REMOTE_MARKER))
        .count();
    let remote_share = if locations.is_empty() {
        Decimal::ZERO
    } else {
        (Decimal::from(remote as u64) / Decimal::from(locations.len() as u64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    GeographicSpread {
        top_locations: tally(locations.into_iter())
            .into_iter()
            .take(TOP_LOCATION_LIMIT)
            .map(|(location, count)| LocationCount { location, count })
            .collect(),
        remote_share,
    }
}

fn supply_demand_description(query: &MarketQuery, snapshot: &MarketSnapshot) -> String {
    let basis = if snapshot.candidates_estimated {
        " (candidates estimated from job count)"
    } else {
        ""
    };
    format!(
        "The {} market in {} is {} at {} candidates per open role{}.",
        query.role_title,
        query.location,
        snapshot.tightness.as_str(),
        snapshot.ratio_label,
        basis
    )
}

/// Narrative lists, assembled in a fixed order.
struct Narrative {
    insights: Vec<String>,
    red_flags: Vec<String>,
    opportunities: Vec<String>,
}

impl Narrative {
    fn build(
        query: &MarketQuery,
        snapshot: &MarketSnapshot,
        competition: &Competition,
        talent: &TalentAvailability,
        skills: &SkillLandscape,
        geography: &GeographicSpread,
        compensation: Option<&CompensationSummary>,
    ) -> Self {
        let market_line = format!(
            "{} open roles against {} candidates: a {} market.",
            snapshot.open_jobs,
            snapshot.available_candidates,
            snapshot.tightness.as_str()
        );
        let pay_line = match compensation {
            Some(comp) => format!(
                "Published base pay runs {} across {} postings; total compensation about {}{} - {}{}.",
                comp.base_range_label(),
                comp.sample_size,
                comp.currency.symbol(),
                comp.total_comp_min.normalize(),
                comp.currency.symbol(),
                comp.total_comp_max.normalize()
            ),
            None => "Compensation data not available: no posting published a salary.".to_string(),
        };
        let competition_line = match competition.top_competitors.first() {
            Some(top) => format!(
                "{} is the most active employer with {} open roles.",
                top.company, top.open_roles
            ),
            None => "No competing employers were identified.".to_string(),
        };

        let mut insights = match query.focus {
            QueryFocus::Compensation => vec![pay_line, market_line, competition_line],
            QueryFocus::Market => vec![market_line, competition_line, pay_line],
        };
        if let Some(top) = skills.top_skills.first() {
            insights.push(format!(
                "{} is the most common skill, listed by {} profiles.",
                top.skill, top.count
            ));
        }

        let mut red_flags = Vec::new();
        if snapshot.tightness == Tightness::Tight {
            red_flags.push(format!(
                "Only {} candidates per open role; expect a long search.",
                snapshot.ratio_label
            ));
        }
        if competition.level == CompetitionLevel::High {
            red_flags.push("Strong competing demand from other employers.".to_string());
        }
        if compensation.is_none() {
            red_flags.push("No salary benchmarks available for this search.".to_string());
        }
        if snapshot.candidates_estimated {
            red_flags.push("Candidate supply is estimated, not measured.".to_string());
        }
        if snapshot.open_jobs < THIN_SAMPLE_POSTINGS {
            red_flags.push(format!(
                "Only {} postings found; figures rest on a thin sample.",
                snapshot.open_jobs
            ));
        }

        let mut opportunities = Vec::new();
        if snapshot.tightness == Tightness::Loose {
            opportunities.push("A deep candidate pool allows a selective process.".to_string());
        }
        if competition.level == CompetitionLevel::Low {
            opportunities
                .push("Few competing employers; offers face little counter-bidding.".to_string());
        }
        if talent.currently_employed > 0 {
            opportunities.push(format!(
                "{} passive candidates are currently employed and open to outreach.",
                talent.currently_employed
            ));
        }
        if geography.remote_share > remote_opportunity_share() {
            opportunities.push("Remote hiring is common here and widens the pool.".to_string());
        }
        if let Some(comp) = compensation {
            if query.focus == QueryFocus::Compensation {
                opportunities.push(format!(
                    "An offer above {}{} sits in the top quartile of published pay.",
                    comp.currency.symbol(),
                    comp.base_max.normalize()
                ));
            }
        }

        Self {
            insights,
            red_flags,
            opportunities,
        }
    }
}

/// Counts case-insensitively, keeping the first-seen spelling.
///
/// Sorted by count descending, then by lowercase name.
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, u32)> {
    let mut counts: BTreeMap<String, (String, u32)> = BTreeMap::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        counts
            .entry(value.to_lowercase())
            .and_modify(|(_, n)| *n += 1)
            .or_insert_with(|| (value.to_string(), 1));
    }

    // BTreeMap iteration is already ordered by key; the stable sort keeps it for ties.
    let mut ranked: Vec<(String, u32)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
