//! Service configuration.

use crate::domain::{FeatureName, DEFAULT_REFERENCE_QUANTILE, PREDICTIVE_FEATURES};

const QUANTILE_ENV: &str = "KICKSCORE_REFERENCE_QUANTILE";
const CURRENCY_ENV: &str = "KICKSCORE_CURRENCY";

/// Knobs for building the reference cohort and the comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Success-ratio quantile for the top-performer cutoff.
    pub reference_quantile: f64,

    /// Only compare against projects in this currency (case-insensitive).
    pub currency: Option<String>,

    /// Features shown in the comparison, in presentation order.
    pub feature_subset: Vec<FeatureName>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            reference_quantile: DEFAULT_REFERENCE_QUANTILE,
            currency: None,
            feature_subset: PREDICTIVE_FEATURES.to_vec(),
        }
    }
}

impl ServiceConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - `KICKSCORE_REFERENCE_QUANTILE`: float in `[0, 1]`
    /// - `KICKSCORE_CURRENCY`: currency code, e.g. `USD`
    ///
    /// Invalid values are ignored.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup(QUANTILE_ENV) {
            match v.trim().parse::<f64>() {
                Ok(q) if (0.0..=1.0).contains(&q) => cfg.reference_quantile = q,
                _ => tracing::warn!("Ignoring invalid {}={:?}", QUANTILE_ENV, v),
            }
        }

        if let Some(v) = lookup(CURRENCY_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.currency = Some(v.to_uppercase());
            }
        }

        cfg
    }

    /// Whether a stored project's currency passes the filter.
    #[must_use]
    pub fn accepts_currency(&self, currency: &str) -> bool {
        self.currency
            .as_deref()
            .map_or(true, |wanted| wanted.eq_ignore_ascii_case(currency.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ServiceConfig::default());
        assert_eq!(cfg.reference_quantile, 0.95);
        assert_eq!(cfg.feature_subset.len(), 6);
        assert!(cfg.accepts_currency("anything"));
    }

    #[test]
    fn test_env_overrides() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            (QUANTILE_ENV, " 0.8 "),
            (CURRENCY_ENV, "usd"),
        ]));
        assert_eq!(cfg.reference_quantile, 0.8);
        assert_eq!(cfg.currency.as_deref(), Some("USD"));
        assert!(cfg.accepts_currency("Usd"));
        assert!(!cfg.accepts_currency("EUR"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            (QUANTILE_ENV, "1.7"),
            (CURRENCY_ENV, "   "),
        ]));
        assert_eq!(cfg.reference_quantile, DEFAULT_REFERENCE_QUANTILE);
        assert_eq!(cfg.currency, None);

        let cfg = ServiceConfig::from_lookup(lookup(&[(QUANTILE_ENV, "high")]));
        assert_eq!(cfg.reference_quantile, DEFAULT_REFERENCE_QUANTILE);
    }
}
