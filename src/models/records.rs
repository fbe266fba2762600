//! Query and raw record models.
//!
//! Raw records arrive from external collection collaborators with whatever
//! formatting the source site used. Only the fields the pipeline consumes are
//! modelled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Seniority filter passed to the postings collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Entry level / graduate.
    Entry,
    /// Mid level.
    #[default]
    Mid,
    /// Senior individual contributor.
    Senior,
    /// Lead / principal.
    Lead,
    /// Director and above.
    Executive,
}

impl ExperienceLevel {
    /// Returns the label used in collaborator calls and narrative text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
        }
    }
}

/// What the caller mainly wants to know about the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFocus {
    /// Pay ranges lead the narrative.
    Compensation,
    /// Supply/demand and competition lead the narrative.
    #[default]
    Market,
}

/// The original search criteria for one analysis.
///
/// # Example
///
/// ```
/// use market_intel::models::{ExperienceLevel, MarketQuery};
///
/// let query = MarketQuery::new("Backend Engineer", "Berlin")
///     .with_experience_level(ExperienceLevel::Senior);
/// assert_eq!(query.profile_search(), "Backend Engineer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuery {
    /// The role being hired for.
    pub role_title: String,
    /// The target location.
    pub location: String,
    /// The seniority being hired for.
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Which part of the analysis leads the narrative.
    #[serde(default)]
    pub focus: QueryFocus,
    /// Free-text profile search; the role title is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl MarketQuery {
    /// Creates a query with default experience level and focus.
    pub fn new(role_title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            role_title: role_title.into(),
            location: location.into(),
            experience_level: ExperienceLevel::default(),
            focus: QueryFocus::default(),
            search_query: None,
        }
    }

    /// Sets the experience level.
    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = level;
        self
    }

    /// Sets the focus.
    pub fn with_focus(mut self, focus: QueryFocus) -> Self {
        self.focus = focus;
        self
    }

    /// Sets an explicit profile search query.
    pub fn with_search_query(mut self, search: impl Into<String>) -> Self {
        self.search_query = Some(search.into());
        self
    }

    /// Returns the text used to search for candidate profiles.
    pub fn profile_search(&self) -> &str {
        self.search_query
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.role_title)
    }
}

/// A job posting as delivered by the postings collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawPosting {
    /// The posting title.
    #[serde(default)]
    pub title: String,
    /// The hiring company.
    #[serde(default, alias = "companyName")]
    pub company_name: String,
    /// The posting location.
    #[serde(default)]
    pub location: String,
    /// Free-text compensation, often empty.
    #[serde(default)]
    pub salary: String,
    /// Number of applicants, when the source exposes it.
    #[serde(default, alias = "applicationsCount")]
    pub applications_count: Option<u32>,
}

/// A candidate profile as delivered by the profiles collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawProfile {
    /// The profile headline.
    #[serde(default)]
    pub headline: String,
    /// The profile location.
    #[serde(default)]
    pub location: String,
    /// The current employer, when listed.
    #[serde(default, alias = "currentCompany")]
    pub current_company: Option<String>,
    /// Listed skills.
    #[serde(default)]
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_posting_with_camel_case_source_fields() {
        let json = r#"{
            "title": "Backend Engineer",
            "companyName": "Acme",
            "location": "Berlin",
            "salary": "€70k",
            "applicationsCount": 42,
            "description": "ignored"
        }"#;

        let posting: RawPosting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.company_name, "Acme");
        assert_eq!(posting.applications_count, Some(42));
    }

    #[test]
    fn test_deserialize_sparse_posting() {
        let posting: RawPosting = serde_json::from_str(r#"{"title": "Backend Engineer"}"#).unwrap();
        assert_eq!(posting.salary, "");
        assert_eq!(posting.applications_count, None);
    }

    #[test]
    fn test_deserialize_profile_without_skills() {
        let profile: RawProfile =
            serde_json::from_str(r#"{"headline": "SRE", "location": "Paris"}"#).unwrap();
        assert!(profile.skills.is_empty());
        assert_eq!(profile.current_company, None);
    }

    #[test]
    fn test_query_defaults() {
        let query: MarketQuery =
            serde_json::from_str(r#"{"role_title": "Data Analyst", "location": "Lyon"}"#).unwrap();
        assert_eq!(query.experience_level, ExperienceLevel::Mid);
        assert_eq!(query.focus, QueryFocus::Market);
        assert_eq!(query.profile_search(), "Data Analyst");
    }

    #[test]
    fn test_blank_search_query_falls_back_to_role() {
        let query = MarketQuery::new("Data Analyst", "Lyon").with_search_query("  ");
        assert_eq!(query.profile_search(), "Data Analyst");
    }
}
