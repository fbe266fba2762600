//! Configuration loading and management for the analysis pipeline.
//!
//! This module loads the analysis configuration from YAML, covering the
//! collection limits, the optional bounded analysis service, and the
//! parser/aggregator policy constants.
//!
//! # Example
//!
//! ```no_run
//! use market_intel::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/market_intel").unwrap().into_config();
//! println!("Collection timeout: {:?}", config.collection.timeout());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnalysisConfig, AnalysisFile, CollectionConfig, DEFAULT_COLLECTION_TIMEOUT_SECS,
    DEFAULT_EXTERNAL_TIMEOUT_SECS, DEFAULT_SUMMARY_LIMIT, ExternalServiceConfig,
    ExternalServiceFile, SalaryPolicy,
};
