//! Response types for the market intelligence API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{IntelError, NoDataAvailable};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a "nothing to analyze" error response.
    pub fn no_data_available(message: impl Into<String>) -> Self {
        Self::with_details(
            "NO_DATA_AVAILABLE",
            message,
            "Try a broader role title or a different location",
        )
    }

    /// Creates a "no parseable salary" error response.
    pub fn no_salary_signal() -> Self {
        Self::with_details(
            "NO_SALARY_SIGNAL",
            "Compensation data not available",
            "None of the supplied salary strings contained a parseable amount",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<NoDataAvailable> for ApiErrorResponse {
    fn from(error: NoDataAvailable) -> Self {
        ApiErrorResponse {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: ApiError::no_data_available(error.to_string()),
        }
    }
}

impl From<IntelError> for ApiErrorResponse {
    fn from(error: IntelError) -> Self {
        match error {
            IntelError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            IntelError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            IntelError::InvalidConfig { field, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid configuration field '{}'", field),
                    message,
                ),
            },
            IntelError::CollectionFailed {
                collaborator,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "COLLECTION_FAILED",
                    format!("Collection from {} failed", collaborator),
                    message,
                ),
            },
            IntelError::ExternalService { message }
            | IntelError::InvalidExternalResponse { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "EXTERNAL_SERVICE_ERROR",
                    "External analysis service failed",
                    message,
                ),
            },
            IntelError::NoDataAvailable(inner) => inner.into(),
        }
    }
}
