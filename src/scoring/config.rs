use serde::{Deserialize, Serialize};

use crate::constants::{MIN_RATINGS_PER_NOTE, MIN_RATINGS_PER_RATER};
use crate::filter::MinRatingCounts;

/// Scoring configuration.
///
/// Thresholds the scorer applies before aggregating ratings. Unset fields
/// fall back to the built-in defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   min_ratings_per_note: 5
///   min_ratings_per_rater: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Notes with fewer ratings are dropped (default: 5)
    #[serde(default)]
    pub min_ratings_per_note: Option<usize>,

    /// Raters with fewer ratings are dropped (default: 10)
    #[serde(default)]
    pub min_ratings_per_rater: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_ratings_per_note: Some(MIN_RATINGS_PER_NOTE),
            min_ratings_per_rater: Some(MIN_RATINGS_PER_RATER),
        }
    }
}

impl ScoringConfig {
    pub fn min_rating_counts(&self) -> MinRatingCounts {
        MinRatingCounts {
            per_note: self.min_ratings_per_note.unwrap_or(MIN_RATINGS_PER_NOTE),
            per_rater: self.min_ratings_per_rater.unwrap_or(MIN_RATINGS_PER_RATER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.min_ratings_per_note, Some(5));
        assert_eq!(config.min_ratings_per_rater, Some(10));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
min_ratings_per_note: 3
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.min_ratings_per_note, Some(3));
        assert!(config.min_ratings_per_rater.is_none());

        let counts = config.min_rating_counts();
        assert_eq!(counts.per_note, 3);
        assert_eq!(counts.per_rater, 10);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "min_ratings: 3\n";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
