//! Weighted feature scores.
//!
//! A feature's score is its standardized value times its trained
//! coefficient. Positive scores mean the project leans on the feature in the
//! direction the model rewards.

use serde::Serialize;

use super::features::FeatureName;
use super::params::{CoefficientVector, StandardizedVector};
use super::ScoringError;

/// Per-feature scores, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreVector {
    entries: Vec<(FeatureName, f64)>,
}

impl ScoreVector {
    #[must_use]
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| *f == name)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all scores: the meta features' share of the linear predictor.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, s)| s).sum()
    }
}

/// Score the features named in `subset`.
///
/// All names are resolved before any arithmetic, so an unknown name yields
/// no partial output.
///
/// # Errors
/// Returns `ScoringError::FeatureSubset` if `subset` names an unknown feature.
pub fn score<S: AsRef<str>>(
    standardized: &StandardizedVector,
    coefficients: &CoefficientVector,
    subset: &[S],
) -> Result<ScoreVector, ScoringError> {
    let names = FeatureName::parse_all(subset)?;
    Ok(score_features(standardized, coefficients, &names))
}

/// Score an already-resolved list of features.
#[must_use]
pub fn score_features(
    standardized: &StandardizedVector,
    coefficients: &CoefficientVector,
    features: &[FeatureName],
) -> ScoreVector {
    ScoreVector {
        entries: features
            .iter()
            .map(|&f| (f, standardized.get(f) * coefficients.get(f)))
            .collect(),
    }
}

/// Score every feature in canonical order.
#[must_use]
pub fn score_all(
    standardized: &StandardizedVector,
    coefficients: &CoefficientVector,
) -> ScoreVector {
    score_features(standardized, coefficients, &FeatureName::ALL)
}

#[cfg(test)]
mod tests {
    use super::super::features::{FeatureVector, FEATURE_COUNT, PREDICTIVE_FEATURES};
    use super::super::params::tests::{uniform_map, unit_standardizer};
    use super::*;

    fn standardized(values: [f64; FEATURE_COUNT]) -> StandardizedVector {
        unit_standardizer().transform(&FeatureVector::from_array(values))
    }

    fn coefficients() -> CoefficientVector {
        let mut map = uniform_map(0.0);
        for (i, name) in FeatureName::ALL.iter().enumerate() {
            map.insert(name.as_str().to_string(), (i as f64) - 9.0);
        }
        CoefficientVector::from_named(&map).expect("Valid coefficients")
    }

    #[test]
    fn test_score_is_product() {
        let mut values = [0.0; FEATURE_COUNT];
        values[FeatureName::NumImages.index()] = 1.5;
        let z = standardized(values);
        let coef = coefficients();

        let scores = score(&z, &coef, &["num_images", "num_words"]).expect("Should score");
        assert_eq!(scores.len(), 2);
        assert_eq!(
            scores.get(FeatureName::NumImages),
            Some(1.5 * coef.get(FeatureName::NumImages))
        );
        assert_eq!(scores.get(FeatureName::NumWords), Some(0.0));
        assert_eq!(scores.get(FeatureName::NumGifs), None);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let z = standardized([1.0; FEATURE_COUNT]);
        let err = score(&z, &coefficients(), &["num_hrefs", "typo_feature"])
            .expect_err("Should reject");
        assert_eq!(err, ScoringError::FeatureSubset("typo_feature".into()));
    }

    #[test]
    fn test_score_is_linear_in_standardized_values() {
        let values: [f64; FEATURE_COUNT] = std::array::from_fn(|i| (i as f64) * 0.37 - 2.0);
        let z = standardized(values);
        let coef = coefficients();
        let subset: Vec<&str> = PREDICTIVE_FEATURES.iter().map(|f| f.as_str()).collect();

        let base = score(&z, &coef, &subset).expect("Should score");
        for c in [-3.0, 0.0, 0.5, 7.25] {
            let scaled = score(&z.scaled(c), &coef, &subset).expect("Should score");
            for ((f1, s1), (f2, s2)) in base.iter().zip(scaled.iter()) {
                assert_eq!(f1, f2);
                assert!((s2 - c * s1).abs() < 1e-9, "{f1}: {s2} != {c} * {s1}");
            }
        }
    }

    #[test]
    fn test_score_preserves_requested_order() {
        let z = standardized([1.0; FEATURE_COUNT]);
        let scores = score(&z, &coefficients(), &["percent_bolded", "num_sents"])
            .expect("Should score");
        let order: Vec<FeatureName> = scores.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![FeatureName::PercentBolded, FeatureName::NumSents]);
    }

    #[test]
    fn test_score_all_total() {
        let z = standardized([1.0; FEATURE_COUNT]);
        let all = score_all(&z, &coefficients());
        assert_eq!(all.len(), FEATURE_COUNT);
        let expected: f64 = (0..FEATURE_COUNT).map(|i| i as f64 - 9.0).sum();
        assert!((all.total() - expected).abs() < 1e-12);
    }
}
