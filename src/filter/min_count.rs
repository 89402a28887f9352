use crate::constants::{MIN_RATINGS_PER_NOTE, MIN_RATINGS_PER_RATER, NOTE_ID, RATER_PARTICIPANT_ID};
use crate::error::Result;
use crate::table::Table;

/// Activity thresholds for the training filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinRatingCounts {
    pub per_note: usize,
    pub per_rater: usize,
}

impl Default for MinRatingCounts {
    fn default() -> Self {
        Self {
            per_note: MIN_RATINGS_PER_NOTE,
            per_rater: MIN_RATINGS_PER_RATER,
        }
    }
}

/// Apply the minimum ratings per note and per rater.
///
/// Runs notes, then raters, then notes once more, and stops there rather
/// than iterating to convergence. Notes in the output all meet the note
/// threshold; raters may have fallen back under theirs in the last pass.
pub fn filter_ratings_for_training(
    ratings: &Table,
    thresholds: MinRatingCounts,
    should_log: bool,
) -> Result<Table> {
    if should_log {
        tracing::info!("Filtering notes and ratings with too few ratings.");
    }

    let ratings = filter_ratings_on_notes_with_minimal_num_ratings(ratings, thresholds.per_note, should_log)?;
    let ratings = filter_ratings_from_raters_with_minimal_num_ratings(&ratings, thresholds.per_rater, should_log)?;
    filter_ratings_on_notes_with_minimal_num_ratings(&ratings, thresholds.per_note, should_log)
}

fn filter_ratings_on_notes_with_minimal_num_ratings(
    ratings: &Table,
    min_ratings: usize,
    should_log: bool,
) -> Result<Table> {
    let filtered = keep_groups_with_min_count(ratings, NOTE_ID, min_ratings)?;
    if should_log {
        tracing::info!(
            "After Filtering Notes w/less than {} Ratings, Num Ratings: {}, Num Unique Notes Rated: {}, Num Unique Raters: {}",
            min_ratings,
            filtered.len(),
            filtered.count_unique(&[NOTE_ID])?,
            filtered.count_unique(&[RATER_PARTICIPANT_ID])?,
        );
    }
    Ok(filtered)
}

fn filter_ratings_from_raters_with_minimal_num_ratings(
    ratings: &Table,
    min_ratings: usize,
    should_log: bool,
) -> Result<Table> {
    let filtered = keep_groups_with_min_count(ratings, RATER_PARTICIPANT_ID, min_ratings)?;
    if should_log {
        tracing::info!(
            "After Filtering Raters w/less than {} Notes, Num Ratings: {}, Num Unique Notes Rated: {}, Num Unique Raters: {}",
            min_ratings,
            filtered.len(),
            filtered.count_unique(&[NOTE_ID])?,
            filtered.count_unique(&[RATER_PARTICIPANT_ID])?,
        );
    }
    Ok(filtered)
}

/// Keep rows whose value in `column` occurs at least `min_count` times
fn keep_groups_with_min_count(table: &Table, column: &str, min_count: usize) -> Result<Table> {
    let idx = table.column_index(column)?;
    let counts = table.value_counts(column)?;
    let keep: Vec<bool> = table
        .rows()
        .map(|row| counts.get(&row[idx]).copied().unwrap_or(0) >= min_count)
        .collect();
    Ok(table.filter_by_mask(&keep))
}
