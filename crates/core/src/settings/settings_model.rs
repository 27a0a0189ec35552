//! Engine settings: scoring weights and snapshot policy.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_AMENITY_COVERAGE_WEIGHT, DEFAULT_CAPACITY_FIT_WEIGHT, DEFAULT_CATEGORY_MATCH_WEIGHT,
    DEFAULT_FAMILY_MATCH_CREDIT, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_SUBCATEGORIES_PER_CATEGORY,
    WEIGHT_SUM_TOLERANCE,
};
use crate::errors::{Error, Result};

/// Weights of the soft score.
///
/// The three subscore weights must be non-negative and sum to 1.0 so that the
/// final score stays in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchWeights {
    pub category_match: f64,
    pub amenity_coverage: f64,
    pub capacity_fit: f64,
    /// Category subscore given to a same-family, different-specialization hit.
    pub family_match_credit: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            category_match: DEFAULT_CATEGORY_MATCH_WEIGHT,
            amenity_coverage: DEFAULT_AMENITY_COVERAGE_WEIGHT,
            capacity_fit: DEFAULT_CAPACITY_FIT_WEIGHT,
            family_match_credit: DEFAULT_FAMILY_MATCH_CREDIT,
        }
    }
}

impl MatchWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("categoryMatch", self.category_match),
            ("amenityCoverage", self.amenity_coverage),
            ("capacityFit", self.capacity_fit),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfigValue(format!(
                    "weight '{}' must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let sum = self.category_match + self.amenity_coverage + self.capacity_fit;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidConfigValue(format!(
                "match weights must sum to 1.0, got {}",
                sum
            )));
        }

        if !(0.0..=1.0).contains(&self.family_match_credit) {
            return Err(Error::InvalidConfigValue(format!(
                "familyMatchCredit must be within [0, 1], got {}",
                self.family_match_credit
            )));
        }

        Ok(())
    }
}

/// Structural policy applied when a snapshot is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotPolicy {
    /// Exact number of subcategories every category must declare.
    /// `None` disables the check.
    pub subcategories_per_category: Option<usize>,
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self {
            subcategories_per_category: Some(DEFAULT_SUBCATEGORIES_PER_CATEGORY),
        }
    }
}

impl SnapshotPolicy {
    /// A policy that accepts any number of subcategories per category.
    pub fn unrestricted() -> Self {
        Self {
            subcategories_per_category: None,
        }
    }
}

/// All tunables of the engine, loadable from a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub match_weights: MatchWeights,
    pub snapshot_policy: SnapshotPolicy,
    /// Candidate pools at least this large are scored on the worker pool.
    pub parallel_threshold: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            match_weights: MatchWeights::default(),
            snapshot_policy: SnapshotPolicy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        self.match_weights.validate()?;
        if self.snapshot_policy.subcategories_per_category == Some(0) {
            return Err(Error::InvalidConfigValue(
                "subcategoriesPerCategory must be at least 1".to_string(),
            ));
        }
        if self.parallel_threshold == 0 {
            return Err(Error::InvalidConfigValue(
                "parallelThreshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates settings from a JSON string. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfigValue(format!("invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.match_weights.category_match, 0.45);
        assert_eq!(settings.match_weights.family_match_credit, 0.6);
        assert_eq!(settings.snapshot_policy.subcategories_per_category, Some(3));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = MatchWeights {
            category_match: 0.5,
            amenity_coverage: 0.5,
            capacity_fit: 0.5,
            ..MatchWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = MatchWeights {
            category_match: 1.2,
            amenity_coverage: -0.2,
            capacity_fit: 0.0,
            ..MatchWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_family_credit_bounds() {
        let weights = MatchWeights {
            family_match_credit: 1.5,
            ..MatchWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = EngineSettings::from_json_str(
            r#"{"matchWeights": {"categoryMatch": 0.5, "amenityCoverage": 0.3, "capacityFit": 0.2}}"#,
        )
        .unwrap();
        assert_eq!(settings.match_weights.category_match, 0.5);
        assert_eq!(settings.match_weights.family_match_credit, 0.6);
        assert_eq!(settings.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_disabled_subcategory_policy() {
        let settings =
            EngineSettings::from_json_str(r#"{"snapshotPolicy": {"subcategoriesPerCategory": null}}"#)
                .unwrap();
        assert_eq!(settings.snapshot_policy, SnapshotPolicy::unrestricted());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"parallelThreshold": 16}}"#).unwrap();
        let settings = EngineSettings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.parallel_threshold, 16);

        let missing = EngineSettings::from_json_file("/nonexistent/venuemap.json");
        assert!(matches!(missing, Err(Error::ConfigIO(_))));
    }
}
