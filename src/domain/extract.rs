//! Meta-feature extraction.
//!
//! Computes the 19 fixed features from a campaign page. Every ratio and
//! average with a zero denominator is 0.

use std::collections::HashSet;

use super::features::{FeatureName, FeatureVector, FEATURE_COUNT};
use super::text::{self, NormalizedText};
use super::ScoringError;

/// Words that signal novelty in a pitch. Matched case-insensitively.
pub const DEFAULT_INNOVATION_WORDS: [&str; 14] = [
    "revolutionary",
    "breakthrough",
    "beautiful",
    "magical",
    "gorgeous",
    "amazing",
    "incredible",
    "awesome",
    "innovative",
    "innovation",
    "unique",
    "groundbreaking",
    "cutting-edge",
    "first-ever",
];

/// Extracts a [`FeatureVector`] from raw campaign HTML or text.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    innovation_words: HashSet<String>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::with_innovation_words(DEFAULT_INNOVATION_WORDS)
    }
}

impl FeatureExtractor {
    /// Use a custom innovation keyword list.
    #[must_use]
    pub fn with_innovation_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            innovation_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Extract features from raw page content.
    ///
    /// # Errors
    /// Returns `ScoringError::InputUnavailable` if `raw` is empty or whitespace-only.
    pub fn extract(&self, raw: &str) -> Result<FeatureVector, ScoringError> {
        if raw.trim().is_empty() {
            return Err(ScoringError::unavailable("page", "page content is empty"));
        }
        Ok(self.extract_normalized(&text::normalize(raw)))
    }

    /// Compute features from already-normalized text.
    #[must_use]
    pub fn extract_normalized(&self, doc: &NormalizedText) -> FeatureVector {
        let s = &doc.structure;

        let num_sents = doc.sentences.len() as f64;
        let num_words = doc.words.len() as f64;
        let num_all_caps = doc.words.iter().filter(|w| is_all_caps(w)).count() as f64;
        let num_exclms = doc.plain.matches('!').count() as f64;
        let num_innovation = doc
            .words
            .iter()
            .filter(|w| self.is_innovation_word(w))
            .count() as f64;
        let num_paragraphs = s.paragraphs as f64;

        let mut v = [0.0; FEATURE_COUNT];
        let mut set = |name: FeatureName, value: f64| v[name.index()] = value;

        set(FeatureName::NumSents, num_sents);
        set(FeatureName::NumWords, num_words);
        set(FeatureName::NumAllCaps, num_all_caps);
        set(FeatureName::PercentAllCaps, ratio(num_all_caps, num_words));
        set(FeatureName::NumExclms, num_exclms);
        set(FeatureName::PercentExclms, ratio(num_exclms, num_sents));
        set(FeatureName::NumInnovationWords, num_innovation);
        set(
            FeatureName::PercentInnovationWords,
            ratio(num_innovation, num_words),
        );
        set(FeatureName::AvgWordsPerSent, ratio(num_words, num_sents));
        set(FeatureName::NumParagraphs, num_paragraphs);
        set(
            FeatureName::AvgSentsPerParagraph,
            ratio(num_sents, num_paragraphs),
        );
        set(
            FeatureName::AvgWordsPerParagraph,
            ratio(num_words, num_paragraphs),
        );
        set(FeatureName::NumImages, s.images as f64);
        set(FeatureName::NumVideos, s.videos as f64);
        set(FeatureName::NumYoutubes, s.youtubes as f64);
        set(FeatureName::NumGifs, s.gifs as f64);
        set(FeatureName::NumHrefs, s.hrefs as f64);
        set(FeatureName::NumBolded, s.bolded_spans as f64);
        set(
            FeatureName::PercentBolded,
            ratio(s.bolded_chars as f64, doc.total_chars as f64).min(1.0),
        );

        FeatureVector::from_array(v)
    }

    fn is_innovation_word(&self, word: &str) -> bool {
        self.innovation_words.contains(&word.to_lowercase())
    }
}

/// `num / den`, or 0 when the denominator is 0.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Every alphabetic character is uppercase and there is at least one.
fn is_all_caps(token: &str) -> bool {
    let mut has_alpha = false;
    for c in token.chars().filter(|c| c.is_alphabetic()) {
        if !c.is_uppercase() {
            return false;
        }
        has_alpha = true;
    }
    has_alpha
}
