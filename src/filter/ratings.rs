use std::collections::{HashMap, HashSet};

use super::drop_duplicates_enforcing_key;
use crate::constants::{
    CLASSIFICATION, CREATED_AT_MILLIS, NOTE_ID, NOTE_SAYS_TWEET_IS_MISLEADING,
    NOTE_SAYS_TWEET_IS_NOT_MISLEADING, RATER_PARTICIPANT_ID,
};
use crate::error::{PipelineError, Result};
use crate::table::{Table, Value};

/// Drop duplicate ratings, then require exactly one rating per (rater, note)
pub fn filter_duplicate_ratings(ratings: &Table) -> Result<Table> {
    drop_duplicates_enforcing_key(ratings, "ratings", &[RATER_PARTICIPANT_ID, NOTE_ID])
}

/// Lifecycle state of the note a rating refers to, as seen through the
/// merged note status history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteLifecycleFlags {
    /// No classification: the note no longer exists in the notes file
    pub deleted_note: bool,
    pub not_deleted_misleading: bool,
    /// Deleted, but the note had been scored before deletion
    pub deleted_but_in_nsh: bool,
    pub deleted_not_in_nsh: bool,
    pub not_deleted_not_misleading_old_ui: bool,
    pub not_deleted_not_misleading_new_ui: bool,
}

impl NoteLifecycleFlags {
    /// `classification` and `nsh_created_at_millis` come from the status
    /// history row joined to the rating; both are None when nothing joined.
    pub fn classify(
        classification: Option<&str>,
        nsh_created_at_millis: Option<i64>,
        ui_launch_millis: i64,
    ) -> Self {
        let deleted_note = classification.is_none();
        let not_misleading = classification == Some(NOTE_SAYS_TWEET_IS_NOT_MISLEADING);
        Self {
            deleted_note,
            not_deleted_misleading: !deleted_note
                && classification == Some(NOTE_SAYS_TWEET_IS_MISLEADING),
            deleted_but_in_nsh: deleted_note && nsh_created_at_millis.is_some(),
            deleted_not_in_nsh: deleted_note && nsh_created_at_millis.is_none(),
            not_deleted_not_misleading_old_ui: not_misleading
                && nsh_created_at_millis.is_some_and(|t| t <= ui_launch_millis),
            not_deleted_not_misleading_new_ui: not_misleading
                && nsh_created_at_millis.is_some_and(|t| t > ui_launch_millis),
        }
    }

    pub fn keep_rating(&self) -> bool {
        self.not_deleted_misleading || self.deleted_but_in_nsh || self.not_deleted_not_misleading_new_ui
    }
}

/// Filter ratings by the state of the note they rate.
///
/// Ratings of notes that say the tweet isn't misleading are dropped unless
/// the note's status was recorded after the not-misleading UI launched.
/// Ratings of deleted notes are kept only when the note appears in the
/// status history.
pub fn filter_ratings_of_misleading_notes(
    ratings: &Table,
    note_status_history: &Table,
    ui_launch_millis: i64,
    should_log: bool,
) -> Result<Table> {
    let history = index_status_history(note_status_history)?;
    let note_idx = ratings.column_index(NOTE_ID)?;

    let flags: Vec<NoteLifecycleFlags> = ratings
        .rows()
        .map(|row| {
            let (classification, created_at) =
                history.get(&row[note_idx]).copied().unwrap_or((None, None));
            NoteLifecycleFlags::classify(classification, created_at, ui_launch_millis)
        })
        .collect();

    if should_log {
        log_categories(ratings, note_idx, &flags);
    }

    let keep: Vec<bool> = flags.iter().map(NoteLifecycleFlags::keep_rating).collect();
    Ok(ratings.filter_by_mask(&keep))
}

type HistoryEntry<'a> = (Option<&'a str>, Option<i64>);

fn index_status_history(nsh: &Table) -> Result<HashMap<&Value, HistoryEntry<'_>>> {
    let unique = nsh.count_unique(&[NOTE_ID])?;
    if unique != nsh.len() {
        return Err(PipelineError::PrimaryKeyViolation {
            table: "noteStatusHistory",
            key: NOTE_ID.to_string(),
            unique_keys: unique,
            rows: nsh.len(),
        });
    }

    let note_idx = nsh.column_index(NOTE_ID)?;
    let created_idx = nsh.column_index(CREATED_AT_MILLIS)?;
    let class_idx = nsh.column_index(CLASSIFICATION)?;

    Ok(nsh
        .rows()
        .map(|row| {
            (
                &row[note_idx],
                (row[class_idx].as_str(), row[created_idx].as_i64()),
            )
        })
        .collect())
}

fn log_categories(ratings: &Table, note_idx: usize, flags: &[NoteLifecycleFlags]) {
    let all_notes: HashSet<&Value> = ratings.rows().map(|row| &row[note_idx]).collect();
    tracing::info!(
        "Preprocess Data: Filter misleading notes, starting with {} ratings on {} notes",
        ratings.len(),
        all_notes.len()
    );

    let (n, notes) = tally(ratings, note_idx, flags, |f| f.not_deleted_misleading);
    tracing::info!("  Keeping {} ratings on {} misleading notes", n, notes);

    let (n, notes) = tally(ratings, note_idx, flags, |f| f.deleted_but_in_nsh);
    tracing::info!(
        "  Keeping {} ratings on {} deleted notes that were previously scored (in note status history)",
        n,
        notes
    );

    let (n, notes) = tally(ratings, note_idx, flags, |f| f.not_deleted_not_misleading_old_ui);
    tracing::info!(
        "  Removing {} ratings on {} older notes that aren't deleted, but are not-misleading.",
        n,
        notes
    );

    let (n, notes) = tally(ratings, note_idx, flags, |f| f.deleted_not_in_nsh);
    tracing::info!(
        "  Removing {} ratings on {} notes that were deleted and not in note status history (e.g. old).",
        n,
        notes
    );
}

/// (ratings, distinct notes) in one category
fn tally<F>(ratings: &Table, note_idx: usize, flags: &[NoteLifecycleFlags], select: F) -> (usize, usize)
where
    F: Fn(&NoteLifecycleFlags) -> bool,
{
    let mut notes = HashSet::new();
    let mut count = 0usize;
    for (row, f) in ratings.rows().zip(flags) {
        if select(f) {
            count += 1;
            notes.insert(&row[note_idx]);
        }
    }
    (count, notes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOT_MISLEADING_UI_LAUNCH_MILLIS as LAUNCH;
    use crate::table::{Column, FieldType};

    fn ratings(rows: &[(&str, i64)]) -> Table {
        Table::from_rows(
            vec![
                Column::new(NOTE_ID, FieldType::Int),
                Column::new(RATER_PARTICIPANT_ID, FieldType::Str),
                Column::new(CREATED_AT_MILLIS, FieldType::Int),
            ],
            rows.iter()
                .map(|&(rater, note)| vec![Value::Int(note), rater.into(), Value::Int(0)])
                .collect(),
        )
        .unwrap()
    }

    fn history(rows: &[(i64, Option<i64>, Option<&str>)]) -> Table {
        Table::from_rows(
            vec![
                Column::new(NOTE_ID, FieldType::Int),
                Column::new(CREATED_AT_MILLIS, FieldType::Int),
                Column::new(CLASSIFICATION, FieldType::Str),
            ],
            rows.iter()
                .map(|&(note, created, class)| vec![Value::Int(note), created.into(), class.into()])
                .collect(),
        )
        .unwrap()
    }

    fn kept_notes(table: &Table) -> Vec<i64> {
        table
            .column_values(NOTE_ID)
            .unwrap()
            .into_iter()
            .filter_map(Value::as_i64)
            .collect()
    }

    #[test]
    fn test_duplicate_ratings_removed() {
        let input = ratings(&[("a", 1), ("a", 1), ("b", 1)]);
        let filtered = filter_duplicate_ratings(&input).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_conflicting_rating_pair_rejected() {
        let input = Table::from_rows(
            input_columns(),
            vec![
                vec![Value::Int(1), "a".into(), Value::Int(10)],
                vec![Value::Int(1), "a".into(), Value::Int(20)],
            ],
        )
        .unwrap();
        let err = filter_duplicate_ratings(&input).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PrimaryKeyViolation { unique_keys: 1, rows: 2, .. }
        ));
    }

    fn input_columns() -> Vec<Column> {
        ratings(&[]).columns().to_vec()
    }

    #[test]
    fn test_lifecycle_cases() {
        // A: misleading, B: deleted but scored, B': unknown, C/D: not misleading around launch
        let nsh = history(&[
            (1, Some(LAUNCH - 10), Some(NOTE_SAYS_TWEET_IS_MISLEADING)),
            (2, Some(LAUNCH - 10), None),
            (4, Some(LAUNCH - 1), Some(NOTE_SAYS_TWEET_IS_NOT_MISLEADING)),
            (5, Some(LAUNCH + 1), Some(NOTE_SAYS_TWEET_IS_NOT_MISLEADING)),
        ]);
        let input = ratings(&[("r", 1), ("r", 2), ("r", 3), ("r", 4), ("r", 5)]);

        let filtered = filter_ratings_of_misleading_notes(&input, &nsh, LAUNCH, true).unwrap();
        assert_eq!(kept_notes(&filtered), vec![1, 2, 5]);
        assert_eq!(filtered.columns(), input.columns());
    }

    #[test]
    fn test_launch_time_itself_counts_as_old_ui() {
        let flags = NoteLifecycleFlags::classify(
            Some(NOTE_SAYS_TWEET_IS_NOT_MISLEADING),
            Some(LAUNCH),
            LAUNCH,
        );
        assert!(flags.not_deleted_not_misleading_old_ui);
        assert!(!flags.keep_rating());
    }

    #[test]
    fn test_not_misleading_without_timestamp_dropped() {
        let flags = NoteLifecycleFlags::classify(Some(NOTE_SAYS_TWEET_IS_NOT_MISLEADING), None, LAUNCH);
        assert!(!flags.not_deleted_not_misleading_old_ui);
        assert!(!flags.not_deleted_not_misleading_new_ui);
        assert!(!flags.keep_rating());
    }

    #[test]
    fn test_unmatched_note_is_deleted_not_in_history() {
        let flags = NoteLifecycleFlags::classify(None, None, LAUNCH);
        assert!(flags.deleted_note);
        assert!(flags.deleted_not_in_nsh);
        assert!(!flags.keep_rating());
    }

    #[test]
    fn test_duplicate_history_rows_rejected() {
        let nsh = history(&[
            (1, Some(1), Some(NOTE_SAYS_TWEET_IS_MISLEADING)),
            (1, Some(2), Some(NOTE_SAYS_TWEET_IS_MISLEADING)),
        ]);
        let input = ratings(&[("r", 1)]);
        let err = filter_ratings_of_misleading_notes(&input, &nsh, LAUNCH, false).unwrap_err();
        assert!(matches!(err, PipelineError::PrimaryKeyViolation { .. }));
    }
}
