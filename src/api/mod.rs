//! HTTP API module for the market intelligence pipeline.
//!
//! This module exposes the orchestrator and the compensation aggregator as
//! REST endpoints for the layer that renders analysis cards.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AnalyzeRequest, CompensationRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
