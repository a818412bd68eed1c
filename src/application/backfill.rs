//! Backfill service: Fills in features for stored projects.
//!
//! The scraper stores funding data first and pages later, so rows arrive
//! with empty feature cells. Backfill extracts and persists them without
//! needing trained parameters.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::domain::{FeatureExtractor, ScoringError};
use crate::ports::{PageSource, ProjectStore};
use crate::KickscoreError;

use super::recommend::fetch_features;

/// Outcome of a feature backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Projects whose features were extracted and stored.
    pub extracted: usize,
    /// Projects skipped because their page could not be obtained.
    pub unavailable: usize,
}

/// Service for extracting features of stored projects.
pub struct BackfillService<P, S>
where
    P: PageSource,
    S: ProjectStore,
{
    pages: Arc<P>,
    store: Arc<S>,
    extractor: FeatureExtractor,
}

impl<P, S> BackfillService<P, S>
where
    P: PageSource,
    S: ProjectStore,
    S::Error: Into<StorageError>,
{
    pub fn new(pages: Arc<P>, store: Arc<S>) -> Self {
        Self {
            pages,
            store,
            extractor: FeatureExtractor::default(),
        }
    }

    /// Extract and store features for every project that has none.
    ///
    /// Unavailable pages are logged and counted; any other failure stops
    /// the run.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn run(&self) -> Result<BackfillSummary, KickscoreError> {
        let pending = self
            .store
            .projects_missing_features()
            .map_err(|e| KickscoreError::Storage(e.into()))?;
        tracing::info!("Backfilling features for {} projects", pending.len());

        let mut summary = BackfillSummary::default();
        for link in &pending {
            match fetch_features(self.pages.as_ref(), &self.extractor, link) {
                Ok(features) => {
                    self.store
                        .save_features(link, &features)
                        .map_err(|e| KickscoreError::Storage(e.into()))?;
                    summary.extracted += 1;
                }
                Err(KickscoreError::Scoring(ScoringError::InputUnavailable { reason, .. })) => {
                    tracing::warn!("Skipping {}: {}", link, reason);
                    summary.unavailable += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Backfill complete: {} extracted, {} unavailable",
            summary.extracted,
            summary.unavailable
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::adapters::SqliteProjectStore;
    use crate::application::recommend::tests::MapPages;
    use crate::domain::{CohortRow, FeatureName};

    fn store_with(links: &[&str]) -> Arc<SqliteProjectStore> {
        let store = SqliteProjectStore::in_memory().expect("Should create db");
        for link in links {
            store
                .save_project(&CohortRow::new(*link, "USD", Some(1.0), Some(1.0)))
                .expect("Should save");
        }
        Arc::new(store)
    }

    #[test]
    fn test_backfill_extracts_and_counts_unavailable() {
        let store = store_with(&["https://ks.example/a", "https://ks.example/b"]);
        store
            .save_project(
                &CohortRow::new("https://ks.example/c", "USD", Some(1.0), Some(1.0))
                    .with_feature(FeatureName::NumWords, 3.0),
            )
            .expect("Should save");

        let pages = MapPages(HashMap::from([(
            "https://ks.example/a".to_string(),
            "<p>Hello world. Great stuff!</p>".to_string(),
        )]));
        let service = BackfillService::new(Arc::new(pages), Arc::clone(&store));

        let summary = service.run().expect("Should backfill");
        assert_eq!(summary, BackfillSummary { extracted: 1, unavailable: 1 });

        let a = store
            .load_project("https://ks.example/a")
            .expect("Should load")
            .expect("Should exist");
        assert_eq!(a.feature(FeatureName::NumWords), Some(4.0));
        assert_eq!(a.feature(FeatureName::NumParagraphs), Some(1.0));
        assert_eq!(
            store.projects_missing_features().expect("Should list"),
            vec!["https://ks.example/b".to_string()]
        );
    }

    #[test]
    fn test_backfill_is_idempotent() {
        let store = store_with(&["https://ks.example/a"]);
        let pages = MapPages(HashMap::from([(
            "https://ks.example/a".to_string(),
            "Just text.".to_string(),
        )]));
        let service = BackfillService::new(Arc::new(pages), Arc::clone(&store));

        assert_eq!(service.run().expect("first").extracted, 1);
        assert_eq!(service.run().expect("second"), BackfillSummary::default());
    }

    #[test]
    fn test_whitespace_page_is_unavailable() {
        let store = store_with(&["https://ks.example/blank"]);
        let pages = MapPages(HashMap::from([(
            "https://ks.example/blank".to_string(),
            " \n ".to_string(),
        )]));
        let service = BackfillService::new(Arc::new(pages), store);
        assert_eq!(service.run().expect("Should run").unavailable, 1);
    }
}
