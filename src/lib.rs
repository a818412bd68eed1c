//! # kickscore
//!
//! Feature extraction and scoring for crowdfunding campaign pages.
//!
//! This crate provides:
//! - Normalization of raw campaign HTML into text plus structural counts
//! - A fixed 19-feature "meta feature" vector per campaign
//! - Weighted scoring against trained standardizer + coefficient parameters
//! - A reference cohort of top performers to compare a candidate against
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Pure scoring types and logic (no I/O)
//! - `ports`: Trait definitions for the scraper, database and trainer
//! - `adapters`: Concrete implementations (SQLite, page cache, JSON params)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{FeatureName, FeatureVector, Recommendation, ScoringError};

/// Result type for kickscore operations
pub type Result<T> = std::result::Result<T, KickscoreError>;

/// Main error type for kickscore
#[derive(Debug, thiserror::Error)]
pub enum KickscoreError {
    #[error(transparent)]
    Scoring(#[from] domain::ScoringError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Parameter loading failed: {0}")]
    Parameters(#[from] adapters::ParameterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
