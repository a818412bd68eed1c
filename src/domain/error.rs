/// Error type for the scoring pipeline.
///
/// Division by zero inside ratios and averages is not an error; it resolves
/// to 0 where it occurs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Raw page content for a project could not be obtained or was empty.
    #[error("Input unavailable for {source_id}: {reason}")]
    InputUnavailable { source_id: String, reason: String },

    /// Standardizer or coefficient parameters do not cover the 19-feature set.
    #[error("Parameter mismatch: {0}")]
    ConfigMismatch(String),

    /// A requested feature name is not one of the fixed features.
    #[error("Unknown feature: {0}")]
    FeatureSubset(String),

    /// The reference cohort selection produced no rows.
    #[error("Reference cohort is empty: {0}")]
    EmptyCohort(String),

    #[error("Invalid quantile: {0} (expected a value in [0, 1])")]
    InvalidQuantile(f64),
}

impl ScoringError {
    pub(crate) fn unavailable(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputUnavailable {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }
}
