//! JSON parameter adapter: Implementation of ParameterSource.
//!
//! The training pipeline exports a single JSON document:
//!
//! ```json
//! {
//!   "standardizer": { "mean": { "num_words": 512.3, ... }, "scale": { ... } },
//!   "coefficients": { "num_words": 0.41, ... }
//! }
//! ```
//!
//! Every one of the 19 features must appear in each map.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::domain::{ExportedParameters, ScoringError, TrainedParameters};
use crate::ports::ParameterSource;

/// Error type for parameter loading.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("Cannot read parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed parameter file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ScoringError),
}

/// Trained parameters stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonParameterFile {
    path: PathBuf,
}

impl JsonParameterFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse and validate parameters from an in-memory document.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or does not cover all features.
    pub fn parse(bytes: &[u8]) -> Result<TrainedParameters, ParameterError> {
        let exported: ExportedParameters = serde_json::from_slice(bytes)?;
        Ok(TrainedParameters::from_exported(
            &exported,
            compute_fingerprint(bytes),
        )?)
    }
}

impl ParameterSource for JsonParameterFile {
    type Error = ParameterError;

    fn load(&self) -> Result<TrainedParameters, Self::Error> {
        let bytes = std::fs::read(&self.path).map_err(|source| ParameterError::Io {
            path: self.path.clone(),
            source,
        })?;
        let params = Self::parse(&bytes)?;
        tracing::info!(
            "Loaded model parameters from {} (fingerprint {})",
            self.path.display(),
            params.fingerprint
        );
        Ok(params)
    }
}

/// First 8 bytes of the SHA-256 digest, hex encoded.
fn compute_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::FeatureName;
    use serde_json::{json, Map, Value};

    /// Parameter document with the given uniform mean, scale and coefficient.
    pub(crate) fn uniform_document(mean: f64, scale: f64, coef: f64) -> Value {
        let map = |v: f64| -> Map<String, Value> {
            FeatureName::ALL
                .iter()
                .map(|f| (f.as_str().to_string(), json!(v)))
                .collect()
        };
        json!({
            "standardizer": { "mean": map(mean), "scale": map(scale) },
            "coefficients": map(coef),
        })
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.json");
        let doc = uniform_document(1.0, 2.0, 0.5);
        std::fs::write(&path, doc.to_string()).expect("write");

        let params = JsonParameterFile::new(&path).load().expect("Should load");
        assert_eq!(params.fingerprint.len(), 16);
        assert_eq!(params.standardizer.mean(FeatureName::NumWords), 1.0);
        assert_eq!(params.standardizer.scale(FeatureName::NumWords), 2.0);
        assert_eq!(params.coefficients.get(FeatureName::NumHrefs), 0.5);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = uniform_document(0.0, 1.0, 1.0).to_string();
        let b = uniform_document(0.0, 1.0, 2.0).to_string();
        let pa = JsonParameterFile::parse(a.as_bytes()).expect("a");
        let pa2 = JsonParameterFile::parse(a.as_bytes()).expect("a again");
        let pb = JsonParameterFile::parse(b.as_bytes()).expect("b");
        assert_eq!(pa.fingerprint, pa2.fingerprint);
        assert_ne!(pa.fingerprint, pb.fingerprint);
    }

    #[test]
    fn test_missing_feature_rejected() {
        let mut doc = uniform_document(0.0, 1.0, 1.0);
        doc["coefficients"]
            .as_object_mut()
            .expect("object")
            .remove("num_gifs");
        let err = JsonParameterFile::parse(doc.to_string().as_bytes()).expect_err("Should fail");
        assert!(matches!(err, ParameterError::Invalid(ScoringError::ConfigMismatch(_))));
    }

    #[test]
    fn test_malformed_and_missing_file() {
        assert!(matches!(
            JsonParameterFile::parse(b"{not json"),
            Err(ParameterError::Parse(_))
        ));
        let err = JsonParameterFile::new("/nonexistent/params.json")
            .load()
            .expect_err("Should fail");
        assert!(matches!(err, ParameterError::Io { .. }));
    }
}
