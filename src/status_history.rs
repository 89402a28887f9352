use std::collections::{HashMap, HashSet};

use crate::constants::{
    CLASSIFICATION, CREATED_AT_MILLIS, NOTE_AUTHOR_PARTICIPANT_ID, NOTE_ID, TWEET_ID,
};
use crate::error::{PipelineError, Result};
use crate::table::{Column, FieldType, Table, Value};

/// Attach note metadata to the status history.
///
/// Outer join on noteId. History rows gain the note's `tweetId` and
/// `classification` (null when the note has since been deleted), and a
/// missing `createdAtMillis` falls back to the note's. Notes that have no
/// history yet get a new row carrying only the note's fields.
pub fn merge_note_info(note_status_history: &Table, notes: &Table) -> Result<Table> {
    let unique = note_status_history.count_unique(&[NOTE_ID])?;
    if unique != note_status_history.len() {
        return Err(PipelineError::PrimaryKeyViolation {
            table: "noteStatusHistory",
            key: NOTE_ID.to_string(),
            unique_keys: unique,
            rows: note_status_history.len(),
        });
    }

    let note_id = notes.column_index(NOTE_ID)?;
    let note_created = notes.column_index(CREATED_AT_MILLIS)?;
    let note_tweet = notes.column_index(TWEET_ID)?;
    let note_class = notes.column_index(CLASSIFICATION)?;
    let note_author = notes.column_index(NOTE_AUTHOR_PARTICIPANT_ID)?;
    let notes_by_id: HashMap<&Value, &[Value]> =
        notes.rows().map(|row| (&row[note_id], row)).collect();

    let nsh_id = note_status_history.column_index(NOTE_ID)?;
    let nsh_created = note_status_history.column_index(CREATED_AT_MILLIS)?;
    let nsh_author = note_status_history.column_index(NOTE_AUTHOR_PARTICIPANT_ID)?;
    let width = note_status_history.columns().len();

    let mut columns = note_status_history.columns().to_vec();
    columns.push(Column::new(TWEET_ID, FieldType::Str));
    columns.push(Column::new(CLASSIFICATION, FieldType::Str));

    let mut rows = Vec::with_capacity(note_status_history.len() + notes.len());
    let mut in_history = HashSet::new();

    for row in note_status_history.rows() {
        in_history.insert(&row[nsh_id]);
        let mut merged = row.to_vec();
        match notes_by_id.get(&row[nsh_id]) {
            Some(note) => {
                if merged[nsh_created].is_null() {
                    merged[nsh_created] = note[note_created].clone();
                }
                merged.push(tweet_id_text(&note[note_tweet]));
                merged.push(note[note_class].clone());
            }
            None => {
                merged.push(Value::Null);
                merged.push(Value::Null);
            }
        }
        rows.push(merged);
    }

    for note in notes.rows() {
        if in_history.contains(&note[note_id]) {
            continue;
        }
        let mut merged = vec![Value::Null; width];
        merged[nsh_id] = note[note_id].clone();
        merged[nsh_created] = note[note_created].clone();
        merged[nsh_author] = note[note_author].clone();
        merged.push(tweet_id_text(&note[note_tweet]));
        merged.push(note[note_class].clone());
        rows.push(merged);
    }

    Table::from_rows(columns, rows)
}

fn tweet_id_text(value: &Value) -> Value {
    match value {
        Value::Null | Value::Str(_) => value.clone(),
        other => Value::Str(other.to_field().into_owned()),
    }
}
