//! Parameter source port: Trait for loading trained model parameters.

use crate::domain::TrainedParameters;

/// Trait for the model-training collaborator's exported artifacts.
///
/// Parameters are loaded once and then passed explicitly to the services
/// that need them.
pub trait ParameterSource {
    /// Error type for loading.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the standardizer and coefficients.
    ///
    /// # Errors
    /// Returns error if the artifact is unreadable or does not cover the
    /// fixed feature set.
    fn load(&self) -> Result<TrainedParameters, Self::Error>;
}
