use super::drop_duplicates_enforcing_key;
use crate::constants::NOTE_ID;
use crate::error::Result;
use crate::table::Table;

/// Remove duplicate notes, then require exactly one row per noteId
pub fn filter_duplicate_notes(notes: &Table) -> Result<Table> {
    drop_duplicates_enforcing_key(notes, "notes", &[NOTE_ID])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::table::{Column, FieldType, Value};

    fn notes(rows: Vec<(i64, &str)>) -> Table {
        Table::from_rows(
            vec![
                Column::new(NOTE_ID, FieldType::Int),
                Column::new("summary", FieldType::Str),
            ],
            rows.into_iter()
                .map(|(id, summary)| vec![Value::Int(id), summary.into()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_duplicates_removed() {
        let input = notes(vec![(1, "a"), (2, "b"), (1, "a")]);
        let filtered = filter_duplicate_notes(&input).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_conflicting_note_ids_rejected() {
        let input = notes(vec![(1, "a"), (1, "different"), (2, "b")]);
        let err = filter_duplicate_notes(&input).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PrimaryKeyViolation { unique_keys: 2, rows: 3, .. }
        ));
    }

    #[test]
    fn test_unique_notes_unchanged() {
        let input = notes(vec![(1, "a"), (2, "b")]);
        assert_eq!(filter_duplicate_notes(&input).unwrap(), input);
    }
}
