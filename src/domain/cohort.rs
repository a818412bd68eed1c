//! Reference cohort aggregation.
//!
//! The reference vector is the mean feature vector of the top performers:
//! projects whose funding ratio (pledged / goal) is at or above a chosen
//! quantile of all eligible projects.

use serde::{Deserialize, Serialize};

use super::features::{FeatureName, FeatureVector, FEATURE_COUNT};
use super::ScoringError;

/// Default quantile cutoff (top 5%).
pub const DEFAULT_REFERENCE_QUANTILE: f64 = 0.95;

/// One persisted project as read from the project table.
///
/// Feature cells are `None` until features have been extracted; NaN is
/// treated the same as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    pub hyperlink: String,
    pub currency: String,
    pub pledged: Option<f64>,
    pub goal: Option<f64>,
    pub features: [Option<f64>; FEATURE_COUNT],
}

impl CohortRow {
    /// A project with funding data and no features yet.
    #[must_use]
    pub fn new(
        hyperlink: impl Into<String>,
        currency: impl Into<String>,
        pledged: Option<f64>,
        goal: Option<f64>,
    ) -> Self {
        Self {
            hyperlink: hyperlink.into(),
            currency: currency.into(),
            pledged,
            goal,
            features: [None; FEATURE_COUNT],
        }
    }

    /// Fill every feature cell from an extracted vector.
    #[must_use]
    pub fn with_features(mut self, features: &FeatureVector) -> Self {
        for (name, value) in features.iter() {
            self.features[name.index()] = Some(value);
        }
        self
    }

    #[must_use]
    pub fn with_feature(mut self, name: FeatureName, value: f64) -> Self {
        self.features[name.index()] = Some(value);
        self
    }

    #[must_use]
    pub fn feature(&self, name: FeatureName) -> Option<f64> {
        self.features[name.index()].filter(|v| !v.is_nan())
    }

    /// True if at least one feature cell is present.
    #[must_use]
    pub fn has_any_feature(&self) -> bool {
        FeatureName::ALL.iter().any(|&f| self.feature(f).is_some())
    }

    /// `pledged / goal`, or `None` when the goal is missing, zero, or the
    /// ratio is not finite.
    #[must_use]
    pub fn success_ratio(&self) -> Option<f64> {
        let pledged = self.pledged?;
        let goal = self.goal?;
        if goal == 0.0 {
            return None;
        }
        let ratio = pledged / goal;
        ratio.is_finite().then_some(ratio)
    }
}

/// A reference vector together with how it was selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub vector: FeatureVector,
    /// Success-ratio cutoff at the requested quantile.
    pub threshold: f64,
    /// Rows with a usable success ratio.
    pub eligible_rows: usize,
    /// Rows that passed the cutoff and had at least one feature.
    pub selected_rows: usize,
}

/// Mean feature vector of the top-performer cohort.
///
/// # Errors
/// See [`build_reference_detailed`].
pub fn build_reference(rows: &[CohortRow], quantile: f64) -> Result<FeatureVector, ScoringError> {
    build_reference_detailed(rows, quantile).map(|r| r.vector)
}

/// Like [`build_reference`], also reporting the cutoff and row counts.
///
/// Rows without a usable success ratio are excluded. The cutoff is the
/// linearly interpolated `quantile` of the eligible ratios, and rows at
/// exactly the cutoff are included. Selected rows with no features at all
/// are dropped; other missing cells count as 0.
///
/// # Errors
/// - `ScoringError::InvalidQuantile` if `quantile` is not within `[0, 1]`.
/// - `ScoringError::EmptyCohort` if no row survives selection.
pub fn build_reference_detailed(
    rows: &[CohortRow],
    quantile: f64,
) -> Result<Reference, ScoringError> {
    if !(0.0..=1.0).contains(&quantile) {
        return Err(ScoringError::InvalidQuantile(quantile));
    }

    let eligible: Vec<(&CohortRow, f64)> = rows
        .iter()
        .filter_map(|r| r.success_ratio().map(|ratio| (r, ratio)))
        .collect();
    if eligible.is_empty() {
        return Err(ScoringError::EmptyCohort(format!(
            "none of {} rows has a usable pledged/goal ratio",
            rows.len()
        )));
    }

    let mut ratios: Vec<f64> = eligible.iter().map(|(_, ratio)| *ratio).collect();
    ratios.sort_by(f64::total_cmp);
    let threshold = interpolated_quantile(&ratios, quantile);

    let selected: Vec<&CohortRow> = eligible
        .iter()
        .filter(|(_, ratio)| *ratio >= threshold)
        .map(|(row, _)| *row)
        .filter(|row| row.has_any_feature())
        .collect();
    if selected.is_empty() {
        return Err(ScoringError::EmptyCohort(format!(
            "no row at or above ratio {threshold} has extracted features"
        )));
    }

    let mut sums = [0.0; FEATURE_COUNT];
    for row in &selected {
        for name in FeatureName::ALL {
            sums[name.index()] += row.feature(name).unwrap_or(0.0);
        }
    }
    let n = selected.len() as f64;
    let means = sums.map(|s| s / n);

    Ok(Reference {
        vector: FeatureVector::from_array(means),
        threshold,
        eligible_rows: eligible.len(),
        selected_rows: selected.len(),
    })
}

/// Quantile of sorted, non-empty data by linear interpolation between the
/// closest ranks (position `q * (n - 1)`).
fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
