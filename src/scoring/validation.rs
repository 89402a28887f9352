use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.min_ratings_per_note == Some(0) {
        errors.push("scoring.min_ratings_per_note: must be at least 1".to_string());
    }

    if config.min_ratings_per_rater == Some(0) {
        errors.push("scoring.min_ratings_per_rater: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
