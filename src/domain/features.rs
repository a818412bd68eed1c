//! The fixed meta-feature space.
//!
//! Every campaign is summarized by the same 19 features, in the same order.
//! `FeatureName` is the closed set of those features and `FeatureVector`
//! holds one value per feature.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ScoringError;

/// Number of meta features.
pub const FEATURE_COUNT: usize = 19;

/// One of the 19 meta features extracted from a campaign description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureName {
    NumSents,
    NumWords,
    NumAllCaps,
    PercentAllCaps,
    NumExclms,
    PercentExclms,
    NumInnovationWords,
    PercentInnovationWords,
    AvgWordsPerSent,
    NumParagraphs,
    AvgSentsPerParagraph,
    AvgWordsPerParagraph,
    NumImages,
    NumVideos,
    NumYoutubes,
    NumGifs,
    NumHrefs,
    NumBolded,
    PercentBolded,
}

impl FeatureName {
    /// All features in canonical order.
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        Self::NumSents,
        Self::NumWords,
        Self::NumAllCaps,
        Self::PercentAllCaps,
        Self::NumExclms,
        Self::PercentExclms,
        Self::NumInnovationWords,
        Self::PercentInnovationWords,
        Self::AvgWordsPerSent,
        Self::NumParagraphs,
        Self::AvgSentsPerParagraph,
        Self::AvgWordsPerParagraph,
        Self::NumImages,
        Self::NumVideos,
        Self::NumYoutubes,
        Self::NumGifs,
        Self::NumHrefs,
        Self::NumBolded,
        Self::PercentBolded,
    ];

    /// Position in the canonical order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column / serialized name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumSents => "num_sents",
            Self::NumWords => "num_words",
            Self::NumAllCaps => "num_all_caps",
            Self::PercentAllCaps => "percent_all_caps",
            Self::NumExclms => "num_exclms",
            Self::PercentExclms => "percent_exclms",
            Self::NumInnovationWords => "num_innovation_words",
            Self::PercentInnovationWords => "percent_innovation_words",
            Self::AvgWordsPerSent => "avg_words_per_sent",
            Self::NumParagraphs => "num_paragraphs",
            Self::AvgSentsPerParagraph => "avg_sents_per_paragraph",
            Self::AvgWordsPerParagraph => "avg_words_per_paragraph",
            Self::NumImages => "num_images",
            Self::NumVideos => "num_videos",
            Self::NumYoutubes => "num_youtubes",
            Self::NumGifs => "num_gifs",
            Self::NumHrefs => "num_hrefs",
            Self::NumBolded => "num_bolded",
            Self::PercentBolded => "percent_bolded",
        }
    }

    /// Human-readable label used in recommendation tables.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NumSents => "Sentences",
            Self::NumWords => "Description length",
            Self::NumAllCaps => "All-caps words",
            Self::PercentAllCaps => "All-caps share",
            Self::NumExclms => "Exclamation marks",
            Self::PercentExclms => "Exclamations per sentence",
            Self::NumInnovationWords => "Innovation words",
            Self::PercentInnovationWords => "Innovation word share",
            Self::AvgWordsPerSent => "Words per sentence",
            Self::NumParagraphs => "Paragraphs",
            Self::AvgSentsPerParagraph => "Sentences per paragraph",
            Self::AvgWordsPerParagraph => "Words per paragraph",
            Self::NumImages => "Images",
            Self::NumVideos => "Videos",
            Self::NumYoutubes => "YouTube embeds",
            Self::NumGifs => "GIFs",
            Self::NumHrefs => "Hyperlinks",
            Self::NumBolded => "Bolded spans",
            Self::PercentBolded => "Bolded text",
        }
    }

    /// Resolve a list of caller-supplied names, failing on the first unknown one.
    ///
    /// # Errors
    /// Returns `ScoringError::FeatureSubset` if any name is not a known feature.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<FeatureName>, ScoringError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ScoringError::FeatureSubset(s.to_string()))
    }
}

impl Serialize for FeatureName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeatureName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The features surfaced to end users, in presentation order.
pub const PREDICTIVE_FEATURES: [FeatureName; 6] = [
    FeatureName::NumHrefs,
    FeatureName::NumImages,
    FeatureName::NumInnovationWords,
    FeatureName::NumExclms,
    FeatureName::PercentBolded,
    FeatureName::NumWords,
];

/// One value per meta feature.
///
/// All 19 entries are always present. Created by the extractor or the
/// reference aggregator and not mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from values in canonical order.
    #[must_use]
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Build from a name-keyed map that must cover exactly the 19 features.
    ///
    /// # Errors
    /// Returns `ScoringError::ConfigMismatch` on missing, unknown or non-finite entries.
    pub fn from_named(map: &BTreeMap<String, f64>) -> Result<Self, ScoringError> {
        Ok(Self {
            values: named_to_array(map, "feature vector")?,
        })
    }

    #[must_use]
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// Values in canonical order.
    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// `(name, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.iter().map(|&f| (f, self.values[f.index()]))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Self::from_named(&map).map_err(D::Error::custom)
    }
}

/// Convert a name-keyed parameter map into canonical order.
///
/// Used for every externally supplied parameter set (means, scales,
/// coefficients, serialized vectors).
pub(crate) fn named_to_array(
    map: &BTreeMap<String, f64>,
    what: &str,
) -> Result<[f64; FEATURE_COUNT], ScoringError> {
    if let Some(unknown) = map.keys().find(|k| k.parse::<FeatureName>().is_err()) {
        return Err(ScoringError::ConfigMismatch(format!(
            "{what} contains unknown feature '{unknown}'"
        )));
    }

    let mut out = [0.0; FEATURE_COUNT];
    let mut missing = Vec::new();
    for name in FeatureName::ALL {
        match map.get(name.as_str()) {
            Some(v) if v.is_finite() => out[name.index()] = *v,
            Some(v) => {
                return Err(ScoringError::ConfigMismatch(format!(
                    "{what} has non-finite value {v} for '{name}'"
                )));
            }
            None => missing.push(name.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(ScoringError::ConfigMismatch(format!(
            "{what} covers {} of {FEATURE_COUNT} features; missing: {}",
            FEATURE_COUNT - missing.len(),
            missing.join(", ")
        )));
    }

    Ok(out)
}
