//! Recommendation service: Orchestrates the scoring pipeline.
//!
//! This service coordinates:
//! - Fetching and extracting the candidate page
//! - Building the reference cohort from stored projects
//! - Standardizing and scoring both vectors
//! - Assembling the comparison rows and suggestions

use std::sync::Arc;

use chrono::Utc;

use crate::adapters::StorageError;
use crate::domain::{
    assemble, build_reference_detailed, score_all, score_features, suggest, FeatureExtractor,
    FeatureVector, Reference, ScoringError, TrainedParameters,
};
use crate::ports::{PageSource, ProjectStore};
use crate::KickscoreError;

use super::{RecommendationReport, ServiceConfig};

/// Service for scoring a candidate campaign against top performers.
///
/// Parameters and config are fixed at construction; the service holds no
/// other state between calls.
pub struct RecommendationService<P, S>
where
    P: PageSource,
    S: ProjectStore,
{
    pages: Arc<P>,
    store: Arc<S>,
    params: TrainedParameters,
    extractor: FeatureExtractor,
    config: ServiceConfig,
}

impl<P, S> RecommendationService<P, S>
where
    P: PageSource,
    S: ProjectStore,
    S::Error: Into<StorageError>,
{
    /// Create a new recommendation service.
    pub fn new(
        pages: Arc<P>,
        store: Arc<S>,
        params: TrainedParameters,
        config: ServiceConfig,
    ) -> Self {
        Self {
            pages,
            store,
            params,
            extractor: FeatureExtractor::default(),
            config,
        }
    }

    /// Fetch the page at `url` and extract its features.
    ///
    /// # Errors
    /// Returns `ScoringError::InputUnavailable` if the page cannot be
    /// obtained or is empty.
    pub fn fetch_features(&self, url: &str) -> Result<FeatureVector, KickscoreError> {
        fetch_features(self.pages.as_ref(), &self.extractor, url)
    }

    /// Build the reference cohort from stored projects.
    ///
    /// # Errors
    /// Returns error if storage fails or no project survives selection.
    pub fn reference(&self) -> Result<Reference, KickscoreError> {
        cohort_reference(self.store.as_ref(), &self.config)
    }

    /// Run the full pipeline for one candidate project.
    ///
    /// # Errors
    /// Returns error if the page is unavailable, storage fails, or the
    /// reference cohort is empty.
    pub fn recommend(&self, url: &str) -> Result<RecommendationReport, KickscoreError> {
        tracing::info!("Scoring {} with parameters {}", url, self.params.fingerprint);

        let candidate = self.fetch_features(url)?;
        let reference = self.reference()?;

        let subset = &self.config.feature_subset;
        let standardizer = &self.params.standardizer;
        let coefficients = &self.params.coefficients;

        let candidate_z = standardizer.transform(&candidate);
        let reference_z = standardizer.transform(&reference.vector);
        let candidate_scores = score_features(&candidate_z, coefficients, subset);
        let reference_scores = score_features(&reference_z, coefficients, subset);

        let names: Vec<&str> = subset.iter().map(|f| f.as_str()).collect();
        let rows = assemble(&candidate_scores, &reference_scores, &names)?;
        let suggestions = suggest(&rows, coefficients);

        tracing::info!(
            "Scored {} features for {} ({} suggestions)",
            rows.len(),
            url,
            suggestions.len()
        );

        Ok(RecommendationReport {
            url: url.to_string(),
            generated_at: Utc::now(),
            parameters: self.params.fingerprint.clone(),
            reference_quantile: self.config.reference_quantile,
            threshold: reference.threshold,
            cohort_size: reference.selected_rows,
            candidate_total: score_all(&candidate_z, coefficients).total(),
            reference_total: score_all(&reference_z, coefficients).total(),
            rows,
            suggestions,
        })
    }
}

/// Fetch a page and extract its features, attributing failures to `url`.
///
/// # Errors
/// Returns `ScoringError::InputUnavailable` if the page cannot be
/// obtained or is empty.
pub fn fetch_features<P>(
    pages: &P,
    extractor: &FeatureExtractor,
    url: &str,
) -> Result<FeatureVector, KickscoreError>
where
    P: PageSource + ?Sized,
{
    let html = pages
        .fetch(url)
        .map_err(|e| ScoringError::unavailable(url, e.to_string()))?;

    let features = extractor.extract(&html).map_err(|e| match e {
        ScoringError::InputUnavailable { reason, .. } => ScoringError::unavailable(url, reason),
        other => other,
    })?;

    tracing::debug!("Extracted features for {}", url);
    Ok(features)
}

/// Build the reference cohort from stored projects, honoring the
/// currency filter and quantile in `config`.
///
/// # Errors
/// Returns error if storage fails or no project survives selection.
pub fn cohort_reference<S>(store: &S, config: &ServiceConfig) -> Result<Reference, KickscoreError>
where
    S: ProjectStore + ?Sized,
    S::Error: Into<StorageError>,
{
    let rows: Vec<_> = store
        .load_projects()
        .map_err(|e| KickscoreError::Storage(e.into()))?
        .into_iter()
        .filter(|row| config.accepts_currency(&row.currency))
        .collect();

    let reference = build_reference_detailed(&rows, config.reference_quantile)?;
    tracing::info!(
        "Reference cohort: {} of {} eligible projects at ratio >= {:.3}",
        reference.selected_rows,
        reference.eligible_rows,
        reference.threshold
    );
    Ok(reference)
}
