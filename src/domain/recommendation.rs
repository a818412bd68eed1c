//! Candidate-vs-reference comparison rows and improvement suggestions.

use serde::Serialize;

use super::features::FeatureName;
use super::params::CoefficientVector;
use super::score::ScoreVector;
use super::ScoringError;

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub feature: FeatureName,
    pub label: &'static str,
    pub candidate_score: f64,
    pub reference_score: f64,
}

impl Recommendation {
    /// `reference_score - candidate_score`. Positive means the candidate trails.
    #[must_use]
    pub fn gap(&self) -> f64 {
        self.reference_score - self.candidate_score
    }
}

/// Pair candidate and reference scores in the caller's order.
///
/// Rows are not re-sorted by score.
///
/// # Errors
/// Returns `ScoringError::FeatureSubset` if a name is unknown or was not
/// scored in both vectors.
pub fn assemble<S: AsRef<str>>(
    candidate: &ScoreVector,
    reference: &ScoreVector,
    ordered_subset: &[S],
) -> Result<Vec<Recommendation>, ScoringError> {
    FeatureName::parse_all(ordered_subset)?
        .into_iter()
        .map(|feature| -> Result<Recommendation, ScoringError> {
            let missing = |side: &str| {
                ScoringError::FeatureSubset(format!("{feature} (not scored for {side})"))
            };
            Ok(Recommendation {
                feature,
                label: feature.label(),
                candidate_score: candidate.get(feature).ok_or_else(|| missing("candidate"))?,
                reference_score: reference.get(feature).ok_or_else(|| missing("reference"))?,
            })
        })
        .collect()
}

/// Which way a feature should move to close the gap to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Increase,
    Decrease,
}

/// A concrete improvement for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub feature: FeatureName,
    pub adjustment: Adjustment,
    pub gap: f64,
    pub message: String,
}

/// Suggestions for every row where the candidate trails the reference.
///
/// The coefficient sign decides the direction. Features with a zero
/// coefficient carry no signal and are skipped.
#[must_use]
pub fn suggest(rows: &[Recommendation], coefficients: &CoefficientVector) -> Vec<Suggestion> {
    rows.iter()
        .filter(|r| r.candidate_score < r.reference_score)
        .filter_map(|r| {
            let coef = coefficients.get(r.feature);
            let adjustment = if coef > 0.0 {
                Adjustment::Increase
            } else if coef < 0.0 {
                Adjustment::Decrease
            } else {
                return None;
            };
            Some(Suggestion {
                feature: r.feature,
                adjustment,
                gap: r.gap(),
                message: suggestion_message(r.feature, adjustment),
            })
        })
        .collect()
}

fn suggestion_message(feature: FeatureName, adjustment: Adjustment) -> String {
    let verb = match adjustment {
        Adjustment::Increase => "Use more",
        Adjustment::Decrease => "Use fewer",
    };
    let what = match feature {
        FeatureName::NumHrefs => "hyperlinks",
        FeatureName::NumImages => "images",
        FeatureName::NumInnovationWords => "innovation words",
        FeatureName::NumExclms => "exclamation marks",
        FeatureName::PercentBolded => {
            return match adjustment {
                Adjustment::Increase => "Bold more of the key text".to_string(),
                Adjustment::Decrease => "Bold less of the text".to_string(),
            };
        }
        FeatureName::NumWords => {
            return match adjustment {
                Adjustment::Increase => "Write a longer description".to_string(),
                Adjustment::Decrease => "Write a shorter description".to_string(),
            };
        }
        other => return format!("{verb} {}", other.label().to_lowercase()),
    };
    format!("{verb} {what}")
}

#[cfg(test)]
mod tests {
    use super::super::features::{FeatureVector, FEATURE_COUNT, PREDICTIVE_FEATURES};
    use super::super::params::tests::{uniform_map, unit_standardizer};
    use super::super::score::score_features;
    use super::*;

    fn scores(value: f64) -> ScoreVector {
        let z = unit_standardizer().transform(&FeatureVector::from_array([value; FEATURE_COUNT]));
        let coef = CoefficientVector::from_named(&uniform_map(1.0)).expect("Valid");
        score_features(&z, &coef, &PREDICTIVE_FEATURES)
    }

    #[test]
    fn test_assemble_preserves_caller_order() {
        let rows = assemble(&scores(1.0), &scores(2.0), &["num_words", "num_hrefs"])
            .expect("Should assemble");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].feature, FeatureName::NumWords);
        assert_eq!(rows[0].label, "Description length");
        assert_eq!(rows[1].label, "Hyperlinks");
        assert_eq!(rows[1].candidate_score, 1.0);
        assert_eq!(rows[1].reference_score, 2.0);
        assert_eq!(rows[1].gap(), 1.0);
    }

    #[test]
    fn test_assemble_rejects_unknown_or_unscored_names() {
        let err = assemble(&scores(1.0), &scores(2.0), &["typo_feature"]).expect_err("unknown");
        assert!(matches!(err, ScoringError::FeatureSubset(_)));

        // num_gifs is a valid feature but not part of the scored subset.
        let err = assemble(&scores(1.0), &scores(2.0), &["num_gifs"]).expect_err("unscored");
        assert!(matches!(err, ScoringError::FeatureSubset(ref m) if m.contains("num_gifs")));
    }

    #[test]
    fn test_suggest_only_for_trailing_features() {
        let rows = vec![
            Recommendation {
                feature: FeatureName::NumImages,
                label: FeatureName::NumImages.label(),
                candidate_score: -0.5,
                reference_score: 0.8,
            },
            Recommendation {
                feature: FeatureName::NumExclms,
                label: FeatureName::NumExclms.label(),
                candidate_score: -0.1,
                reference_score: 0.4,
            },
            Recommendation {
                feature: FeatureName::NumHrefs,
                label: FeatureName::NumHrefs.label(),
                candidate_score: 1.0,
                reference_score: 0.2,
            },
        ];
        let mut map = uniform_map(0.3);
        map.insert("num_exclms".into(), -0.2);
        let coef = CoefficientVector::from_named(&map).expect("Valid");

        let suggestions = suggest(&rows, &coef);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].adjustment, Adjustment::Increase);
        assert_eq!(suggestions[0].message, "Use more images");
        assert_eq!(suggestions[1].adjustment, Adjustment::Decrease);
        assert_eq!(suggestions[1].message, "Use fewer exclamation marks");
        assert!((suggestions[0].gap - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_zero_coefficient_gives_no_suggestion() {
        let rows = vec![Recommendation {
            feature: FeatureName::NumWords,
            label: FeatureName::NumWords.label(),
            candidate_score: 0.0,
            reference_score: 1.0,
        }];
        let coef = CoefficientVector::from_named(&uniform_map(0.0)).expect("Valid");
        assert!(suggest(&rows, &coef).is_empty());
    }
}
