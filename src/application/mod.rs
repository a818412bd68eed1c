//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod backfill;
mod config;
mod recommend;
mod report;

pub use backfill::{BackfillService, BackfillSummary};
pub use config::ServiceConfig;
pub use recommend::{cohort_reference, fetch_features, RecommendationService};
pub use report::RecommendationReport;
