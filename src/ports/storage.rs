//! Storage port: Trait for persisted project rows.
//!
//! This trait abstracts the project database from the application logic.

use crate::domain::{CohortRow, FeatureVector};

/// Trait for the persistence collaborator.
pub trait ProjectStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or replace a project, keyed by its hyperlink.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_project(&self, row: &CohortRow) -> Result<(), Self::Error>;

    /// Load every project row.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_projects(&self) -> Result<Vec<CohortRow>, Self::Error>;

    /// Load one project by hyperlink.
    ///
    /// # Returns
    /// `None` if the project is not stored.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_project(&self, hyperlink: &str) -> Result<Option<CohortRow>, Self::Error>;

    /// Store extracted features for an existing project.
    ///
    /// # Errors
    /// Returns error if the project does not exist or the write fails.
    fn save_features(&self, hyperlink: &str, features: &FeatureVector)
        -> Result<(), Self::Error>;

    /// Hyperlinks of projects whose feature cells are all missing.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn projects_missing_features(&self) -> Result<Vec<String>, Self::Error>;

    /// Total number of stored projects.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count_projects(&self) -> Result<usize, Self::Error>;
}
