//! Domain layer: Core scoring types and logic.
//!
//! This module contains pure Rust types with no I/O. Everything here is a
//! deterministic function of its inputs: raw page content, persisted cohort
//! rows and trained parameters are always passed in explicitly.

mod cohort;
mod error;
mod extract;
mod features;
mod params;
mod recommendation;
mod score;
pub mod text;

pub use cohort::{
    build_reference, build_reference_detailed, CohortRow, Reference, DEFAULT_REFERENCE_QUANTILE,
};
pub use error::ScoringError;
pub use extract::{FeatureExtractor, DEFAULT_INNOVATION_WORDS};
pub use features::{FeatureName, FeatureVector, FEATURE_COUNT, PREDICTIVE_FEATURES};
pub use params::{
    CoefficientVector, ExportedParameters, StandardizedVector, Standardizer, StandardizerParams,
    TrainedParameters,
};
pub use recommendation::{assemble, suggest, Adjustment, Recommendation, Suggestion};
pub use score::{score, score_all, score_features, ScoreVector};
