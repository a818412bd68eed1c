//! Recommendation report: the output of one candidate-vs-reference run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Recommendation, Suggestion};

/// Everything a presentation layer needs to chart or print a comparison.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub url: String,
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the parameter artifact used for scoring.
    pub parameters: String,
    pub reference_quantile: f64,
    /// Success-ratio cutoff for the reference cohort.
    pub threshold: f64,
    pub cohort_size: usize,
    pub candidate_total: f64,
    pub reference_total: f64,
    pub rows: Vec<Recommendation>,
    pub suggestions: Vec<Suggestion>,
}

impl fmt::Display for RecommendationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project:    {}", self.url)?;
        writeln!(
            f,
            "Reference:  top {:.0}% (ratio >= {:.2}, {} projects)",
            (1.0 - self.reference_quantile) * 100.0,
            self.threshold,
            self.cohort_size
        )?;
        writeln!(f, "Parameters: {}", self.parameters)?;
        writeln!(f)?;

        let width = self
            .rows
            .iter()
            .map(|r| r.label.len())
            .max()
            .unwrap_or(0)
            .max("Feature".len());
        writeln!(f, "{:<width$}  {:>10}  {:>10}", "Feature", "Project", "Top")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<width$}  {:>10.3}  {:>10.3}",
                row.label, row.candidate_score, row.reference_score
            )?;
        }
        writeln!(
            f,
            "{:<width$}  {:>10.3}  {:>10.3}",
            "Total", self.candidate_total, self.reference_total
        )?;

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Suggestions:")?;
            for s in &self.suggestions {
                writeln!(f, "  - {} (gap {:.3})", s.message, s.gap)?;
            }
        }
        Ok(())
    }
}
