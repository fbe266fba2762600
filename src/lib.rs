//! Market and compensation intelligence for hiring decisions
//!
//! This crate turns raw job postings and candidate profiles into a structured
//! compensation and market-tightness analysis. A bounded external analysis
//! service is tried first when configured; a deterministic local synthesis is
//! always available as the fallback and produces the same result shape.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
