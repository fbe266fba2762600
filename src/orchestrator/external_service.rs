//! Bounded external analysis over an OpenAI-compatible chat API.
//!
//! The service only ever sees a summary of the collected records, capped at
//! `summary_limit` postings and profiles, together with an instruction that
//! forbids using knowledge beyond that data. Its reply must be a JSON
//! [`AnalysisResult`]; anything else is an error and the orchestrator falls
//! back to the deterministic path.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::ExternalServiceConfig;
use crate::error::{IntelError, IntelResult};
use crate::models::{AnalysisResult, AnalysisSource, RawPosting, RawProfile};

use super::analyzer::{Analyzer, CollectedData};

/// Skills listed per profile in the summarized payload.
pub const PAYLOAD_SKILLS_PER_PROFILE: usize = 5;

const SYSTEM_PROMPT: &str = r#"You are a labor market analyst. Analyze ONLY the job postings and candidate profiles supplied by the user. Do not use any knowledge, statistics or salary figures that are not present in the supplied data. If the data does not support a figure, say so in the description and keep numbers to what can be counted.

Respond with a single JSON object and nothing else, with exactly these keys:
- talent_availability: {total_candidates: int, currently_employed: int, level: "scarce"|"moderate"|"abundant", description: string}
- supply_demand: {snapshot: {open_jobs: int, available_candidates: int, ratio: string decimal, ratio_label: "N:1", tightness: "tight"|"balanced"|"loose", basis: "profile_count"|"job_count_only", candidates_estimated: bool}, description: string}
- competition: {hiring_companies: int, top_competitors: [{company: string, open_roles: int}], average_applicants: string decimal or null, level: "low"|"moderate"|"high", description: string}
- hiring_velocity: {estimated_days_to_fill: int, pace: "fast"|"moderate"|"slow", description: string}
- skill_landscape: {top_skills: [{skill: string, count: int}], profiles_with_skills: int}
- geographic_spread: {top_locations: [{location: string, count: int}], remote_share: string decimal between 0 and 1}
- compensation: null, or {currency: "USD"|"EUR"|"GBP", base_min: string decimal, base_max: string decimal, total_comp_min: string decimal, total_comp_max: string decimal, sample_size: int, published_ranges: [string]}
- insights: [string], red_flags: [string], opportunities: [string]
- metadata: {data_quality: "low"|"medium"|"high", confidence: number between 0 and 1, source: "bounded_service", postings_analyzed: int, profiles_analyzed: int, salary_sample_size: int, candidates_estimated: bool}"#;

/// Summary of one posting as sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingSummary {
    /// The posting title.
    pub title: String,
    /// The hiring company.
    pub company: String,
    /// The posting location.
    pub location: String,
    /// Published salary text, as found.
    pub salary: String,
    /// Applicants, when reported.
    pub applicants: Option<u32>,
}

/// Summary of one profile as sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    /// The profile headline.
    pub headline: String,
    /// The profile location.
    pub location: String,
    /// Whether a current employer is listed.
    pub currently_employed: bool,
    /// The first few listed skills.
    pub top_skills: Vec<String>,
}

/// The bounded payload for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisPayload {
    /// The role being hired for.
    pub role_title: String,
    /// The target location.
    pub location: String,
    /// The seniority being hired for.
    pub experience_level: String,
    /// Postings collected in total, including those not summarized.
    pub total_postings: usize,
    /// Profiles collected in total, including those not summarized.
    pub total_profiles: usize,
    /// The first `summary_limit` postings.
    pub postings: Vec<PostingSummary>,
    /// The first `summary_limit` profiles.
    pub profiles: Vec<ProfileSummary>,
}

impl AnalysisPayload {
    /// Summarizes collected data, keeping at most `limit` records of each kind.
    pub fn summarize(data: &CollectedData, limit: usize) -> Self {
        Self {
            role_title: data.query.role_title.clone(),
            location: data.query.location.clone(),
            experience_level: data.query.experience_level.as_str().to_string(),
            total_postings: data.postings.len(),
            total_profiles: data.profiles.len(),
            postings: data.postings.iter().take(limit).map(summarize_posting).collect(),
            profiles: data.profiles.iter().take(limit).map(summarize_profile).collect(),
        }
    }
}

fn summarize_posting(posting: &RawPosting) -> PostingSummary {
    PostingSummary {
        title: posting.title.clone(),
        company: posting.company_name.clone(),
        location: posting.location.clone(),
        salary: posting.salary.clone(),
        applicants: posting.applications_count,
    }
}

fn summarize_profile(profile: &RawProfile) -> ProfileSummary {
    ProfileSummary {
        headline: profile.headline.clone(),
        location: profile.location.clone(),
        currently_employed: profile
            .current_company
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty()),
        top_skills: profile
            .skills
            .iter()
            .take(PAYLOAD_SKILLS_PER_PROFILE)
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Analyzer backed by a hosted language model.
pub struct BoundedServiceAnalyzer {
    client: Client,
    config: ExternalServiceConfig,
}

impl BoundedServiceAnalyzer {
    /// Builds an analyzer whose HTTP client carries the configured timeout.
    pub fn new(config: ExternalServiceConfig) -> IntelResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_request(&self, data: &CollectedData) -> IntelResult<ChatRequest> {
        let payload = AnalysisPayload::summarize(data, self.config.summary_limit);
        let content = serde_json::to_string(&payload).map_err(|e| IntelError::ExternalService {
            message: format!("failed to encode payload: {}", e),
        })?;

        Ok(ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.0,
        })
    }
}

#[async_trait]
impl Analyzer for BoundedServiceAnalyzer {
    fn source(&self) -> AnalysisSource {
        AnalysisSource::BoundedService
    }

    async fn analyze(&self, data: &CollectedData) -> IntelResult<AnalysisResult> {
        let request = self.build_request(data)?;
        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            postings = data.postings.len(),
            profiles = data.profiles.len(),
            "Sending bounded analysis request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Bounded analysis service returned an error status");
            return Err(IntelError::ExternalService {
                message: format!("status {}: {}", status, body),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            IntelError::InvalidExternalResponse {
                message: format!("unreadable completion envelope: {}", e),
            }
        })?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| IntelError::InvalidExternalResponse {
                message: "completion contained no choices".to_string(),
            })?;

        parse_analysis(&content)
    }
}

/// Parses and validates the service's message content.
///
/// The JSON may be wrapped in a fenced code block.
pub fn parse_analysis(content: &str) -> IntelResult<AnalysisResult> {
    let json = strip_code_fence(content);
    let result: AnalysisResult =
        serde_json::from_str(json).map_err(|e| IntelError::InvalidExternalResponse {
            message: format!("analysis does not match the expected shape: {}", e),
        })?;
    result.validate()?;
    Ok(result)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::synthesize;
    use crate::config::SalaryPolicy;
    use crate::models::MarketQuery;

    fn collected(postings: usize, profiles: usize) -> CollectedData {
        CollectedData {
            query: MarketQuery::new("Data Engineer", "London"),
            postings: (0..postings)
                .map(|i| RawPosting {
                    title: format!("Data Engineer {}", i),
                    company_name: "Acme".to_string(),
                    location: "London".to_string(),
                    salary: "£70k".to_string(),
                    applications_count: Some(10),
                })
                .collect(),
            profiles: (0..profiles)
                .map(|_| RawProfile {
                    headline: "Data Engineer".to_string(),
                    location: "London".to_string(),
                    current_company: Some("Initech".to_string()),
                    skills: (0..8).map(|s| format!("skill{}", s)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_payload_is_bounded() {
        let payload = AnalysisPayload::summarize(&collected(30, 25), 20);
        assert_eq!(payload.postings.len(), 20);
        assert_eq!(payload.profiles.len(), 20);
        assert_eq!(payload.total_postings, 30);
        assert_eq!(payload.total_profiles, 25);
        assert_eq!(payload.profiles[0].top_skills.len(), PAYLOAD_SKILLS_PER_PROFILE);
        assert!(payload.profiles[0].currently_employed);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_parse_analysis_accepts_valid_fenced_json() {
        let data = collected(3, 2);
        let policy = SalaryPolicy::default();
        let mut result =
            synthesize(&data.query, &data.postings, &data.profiles, &policy).unwrap();
        result.metadata.confidence = 0.5;
        let fenced = format!("```json\n{}\n```", serde_json::to_string(&result).unwrap());

        assert_eq!(parse_analysis(&fenced).unwrap(), result);
    }

    #[test]
    fn test_parse_analysis_rejects_malformed_json() {
        let err = parse_analysis("the market looks healthy").unwrap_err();
        assert!(matches!(err, IntelError::InvalidExternalResponse { .. }));
    }

    #[test]
    fn test_parse_analysis_rejects_out_of_range_confidence() {
        let data = collected(3, 0);
        let policy = SalaryPolicy::default();
        let mut result =
            synthesize(&data.query, &data.postings, &data.profiles, &policy).unwrap();
        result.metadata.confidence = 1.5;

        let err = parse_analysis(&serde_json::to_string(&result).unwrap()).unwrap_err();
        assert!(matches!(err, IntelError::InvalidExternalResponse { .. }));
    }

    #[test]
    fn test_completions_url_joins_endpoint() {
        let analyzer = BoundedServiceAnalyzer::new(ExternalServiceConfig {
            endpoint: "http://localhost:9999/v1/".to_string(),
            model: "test".to_string(),
            api_key: "secret".to_string(),
            timeout_secs: 5,
            summary_limit: 20,
        })
        .unwrap();
        assert_eq!(analyzer.completions_url(), "http://localhost:9999/v1/chat/completions");
    }
}
