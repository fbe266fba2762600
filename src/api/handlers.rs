//! HTTP request handlers for the market intelligence API.
//!
//! This module contains the handler functions for all API endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate_with, parse_salary_in, to_annual};
use crate::models::NormalizedObservation;
use crate::orchestrator::{AnalysisOrchestrator, StaticPostings, StaticProfiles};

use super::request::{AnalyzeRequest, CompensationRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/compensation", post(compensation_handler))
        .with_state(state)
}

/// Handler for POST /analyze.
///
/// Runs the orchestrator over the records supplied in the request.
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing analysis request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection_error(correlation_id, rejection)),
    };
    if let Some(message) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %message, "Invalid analysis request");
        return bad_request(ApiError::validation_error(message));
    }

    let postings_count = request.postings.len();
    let profiles_count = request.profiles.len();
    let mut orchestrator = AnalysisOrchestrator::new(
        state.config().clone(),
        Arc::new(StaticPostings::new(request.postings)),
        Arc::new(StaticProfiles::new(request.profiles)),
    );
    if let Some(external) = state.external() {
        orchestrator = orchestrator.with_external(Arc::clone(external));
    }

    let start_time = Instant::now();
    match orchestrator.analyze(&request.query).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                postings = postings_count,
                profiles = profiles_count,
                source = ?result.metadata.source,
                confidence = result.metadata.confidence,
                duration_ms = start_time.elapsed().as_millis(),
                "Analysis request completed"
            );
            json_response(StatusCode::OK, &result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                duration_ms = start_time.elapsed().as_millis(),
                "Analysis request had no data"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /compensation.
///
/// Parses, annualizes and aggregates the supplied salary strings.
async fn compensation_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compensation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection_error(correlation_id, rejection)),
    };

    let policy = &state.config().policy;
    let location = request.location.as_deref();
    let observations: Vec<NormalizedObservation> = request
        .salaries
        .iter()
        .filter_map(|text| parse_salary_in(text, location, policy))
        .map(|obs| to_annual(&obs))
        .collect();

    match aggregate_with(&observations, policy) {
        Some(summary) => {
            info!(
                correlation_id = %correlation_id,
                submitted = request.salaries.len(),
                sample_size = summary.sample_size,
                "Compensation request completed"
            );
            json_response(StatusCode::OK, &summary)
        }
        None => {
            warn!(
                correlation_id = %correlation_id,
                submitted = request.salaries.len(),
                "No parseable salary in request"
            );
            error_response(ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::no_salary_signal(),
            })
        }
    }
}

fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn bad_request(error: ApiError) -> Response {
    error_response(ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    })
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, &error.error)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::models::{AnalysisResult, CompensationSummary};
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn router() -> Router {
        create_router(AppState::new(AnalysisConfig::default()))
    }

    async fn post_json(uri: &str, body: &str) -> Response {
        router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_analyze_returns_200_with_fallback_result() {
        let body = r#"{
            "query": {"role_title": "Backend Engineer", "location": "Berlin"},
            "postings": [
                {"title": "Backend Engineer", "companyName": "Acme", "location": "Berlin", "salary": "€70k-€90k"}
            ]
        }"#;
        let response = post_json("/analyze", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

        let result: AnalysisResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.metadata.postings_analyzed, 1);
        assert!(result.compensation.is_some());
    }

    #[tokio::test]
    async fn test_analyze_without_records_returns_422() {
        let body = r#"{"query": {"role_title": "Welder", "location": "Oslo"}}"#;
        let response = post_json("/analyze", body).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "NO_DATA_AVAILABLE");
    }

    #[tokio::test]
    async fn test_analyze_malformed_json_returns_400() {
        let response = post_json("/analyze", "{invalid json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_analyze_missing_query_returns_validation_error() {
        let response = post_json("/analyze", r#"{"postings": []}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_blank_location_returns_validation_error() {
        let body = r#"{"query": {"role_title": "Welder", "location": " "}}"#;
        let response = post_json("/analyze", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compensation_uses_location_for_bare_amounts() {
        let body = r#"{"salaries": ["85k", "95k", "competitive"], "location": "London, UK"}"#;
        let response = post_json("/compensation", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let summary: CompensationSummary =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(summary.sample_size, 2);
        assert_eq!(summary.currency, crate::models::Currency::Gbp);
        assert_eq!(summary.base_min, Decimal::from(85_000));
    }

    #[tokio::test]
    async fn test_compensation_without_signal_returns_422() {
        let response = post_json("/compensation", r#"{"salaries": ["DOE", ""]}"#).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "NO_SALARY_SIGNAL");
    }
}
