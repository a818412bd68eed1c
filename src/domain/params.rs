//! Trained model parameters.
//!
//! The standardizer and coefficients are fitted offline by the training
//! pipeline and arrive here as name-keyed maps. They are validated once at
//! load time against the fixed feature set and never refitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::features::{named_to_array, FeatureName, FeatureVector, FEATURE_COUNT};
use super::ScoringError;

/// Exported z-score scaler: one mean and one scale per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizerParams {
    pub mean: BTreeMap<String, f64>,
    pub scale: BTreeMap<String, f64>,
}

/// Fixed z-score transform over the feature space.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl Standardizer {
    /// Validate exported parameters.
    ///
    /// A scale of exactly 0 (a constant feature in the training data) is
    /// treated as 1 so the transform only centers that feature.
    ///
    /// # Errors
    /// Returns `ScoringError::ConfigMismatch` if either map does not cover
    /// exactly the 19 features, or holds a non-finite or negative scale.
    pub fn from_params(params: &StandardizerParams) -> Result<Self, ScoringError> {
        let mean = named_to_array(&params.mean, "standardizer mean")?;
        let mut scale = named_to_array(&params.scale, "standardizer scale")?;

        for name in FeatureName::ALL {
            let s = &mut scale[name.index()];
            if *s < 0.0 {
                return Err(ScoringError::ConfigMismatch(format!(
                    "standardizer scale for '{name}' is negative ({s})"
                )));
            }
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Ok(Self { mean, scale })
    }

    /// `(x - mean) / scale` for every feature.
    #[must_use]
    pub fn transform(&self, raw: &FeatureVector) -> StandardizedVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, x) in raw.as_array().iter().enumerate() {
            out[i] = (x - self.mean[i]) / self.scale[i];
        }
        StandardizedVector { values: out }
    }

    #[must_use]
    pub fn mean(&self, name: FeatureName) -> f64 {
        self.mean[name.index()]
    }

    #[must_use]
    pub fn scale(&self, name: FeatureName) -> f64 {
        self.scale[name.index()]
    }
}

/// A feature vector in z-score units.
///
/// Only [`Standardizer::transform`] produces one, so a vector cannot be
/// standardized twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardizedVector {
    values: [f64; FEATURE_COUNT],
}

impl StandardizedVector {
    #[must_use]
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// Multiply every value by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut values = self.values;
        for v in &mut values {
            *v *= factor;
        }
        Self { values }
    }
}

/// Trained linear-model weights, one per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientVector {
    weights: [f64; FEATURE_COUNT],
}

impl CoefficientVector {
    /// # Errors
    /// Returns `ScoringError::ConfigMismatch` unless `map` covers exactly the 19 features.
    pub fn from_named(map: &BTreeMap<String, f64>) -> Result<Self, ScoringError> {
        Ok(Self {
            weights: named_to_array(map, "coefficients")?,
        })
    }

    #[must_use]
    pub fn get(&self, name: FeatureName) -> f64 {
        self.weights[name.index()]
    }
}

impl Serialize for StandardizedVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_named(&self.values, serializer)
    }
}

impl Serialize for CoefficientVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_named(&self.weights, serializer)
    }
}

fn serialize_named<S: serde::Serializer>(
    values: &[f64; FEATURE_COUNT],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
    for name in FeatureName::ALL {
        map.serialize_entry(name.as_str(), &values[name.index()])?;
    }
    map.end()
}

/// Parameter blob exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedParameters {
    pub standardizer: StandardizerParams,
    pub coefficients: BTreeMap<String, f64>,
}

/// Validated standardizer + coefficients, ready to score projects.
#[derive(Debug, Clone)]
pub struct TrainedParameters {
    pub standardizer: Standardizer,
    pub coefficients: CoefficientVector,
    /// Short digest identifying the artifact these were loaded from.
    pub fingerprint: String,
}

impl TrainedParameters {
    /// Validate an exported parameter blob.
    ///
    /// # Errors
    /// Returns `ScoringError::ConfigMismatch` if any parameter set does not
    /// cover the fixed feature space.
    pub fn from_exported(
        exported: &ExportedParameters,
        fingerprint: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            standardizer: Standardizer::from_params(&exported.standardizer)?,
            coefficients: CoefficientVector::from_named(&exported.coefficients)?,
            fingerprint: fingerprint.into(),
        })
    }
}
