//! Unified helpfulness: one scalar from the two rating form generations.
//!
//! The first form asked a yes/no question (`helpful` / `notHelpful`); the
//! second asks for a three-level `helpfulnessLevel`. Both map onto
//! `helpfulNum` in {0, 0.5, 1}.

use crate::constants::{
    HELPFUL, HELPFULNESS_LEVEL, HELPFUL_NUM, HELPFUL_VALUE, NOT_HELPFUL, NOT_HELPFUL_VALUE,
    SOMEWHAT_HELPFUL_VALUE,
};
use crate::error::{PipelineError, Result};
use crate::table::{Column, FieldType, Table, Value};

/// First matching rule wins: `helpful == 1`, then `notHelpful == 1`, then the
/// categorical level. None when no field carries a signal.
pub fn unified_helpfulness(helpful: &Value, not_helpful: &Value, level: &Value) -> Option<f64> {
    if helpful.as_i64() == Some(1) {
        return Some(1.0);
    }
    if not_helpful.as_i64() == Some(1) {
        return Some(0.0);
    }
    match level.as_str() {
        Some(NOT_HELPFUL_VALUE) => Some(0.0),
        Some(SOMEWHAT_HELPFUL_VALUE) => Some(0.5),
        Some(HELPFUL_VALUE) => Some(1.0),
        _ => None,
    }
}

/// Add the `helpfulNum` column and drop ratings with no helpfulness signal
pub fn derive_helpful_num(ratings: &Table) -> Result<Table> {
    let helpful_idx = ratings.column_index(HELPFUL)?;
    let not_helpful_idx = ratings.column_index(NOT_HELPFUL)?;
    let level_idx = ratings.column_index(HELPFULNESS_LEVEL)?;

    let values: Vec<Value> = ratings
        .rows()
        .map(|row| {
            unified_helpfulness(&row[helpful_idx], &row[not_helpful_idx], &row[level_idx]).into()
        })
        .collect();

    let with_num = ratings.with_column(Column::new(HELPFUL_NUM, FieldType::Float), values)?;
    let num_idx = with_num.column_index(HELPFUL_NUM)?;
    Ok(with_num.filter_rows(|row| !row[num_idx].is_null()))
}

/// Fail unless every rating carries a `helpfulNum`
pub fn ensure_helpful_num_defined(ratings: &Table) -> Result<()> {
    let idx = ratings.column_index(HELPFUL_NUM).map_err(|_| {
        PipelineError::DataIntegrityViolation(format!(
            "ratings have no {} column; derive unified helpfulness first",
            HELPFUL_NUM
        ))
    })?;
    let missing = ratings.rows().filter(|row| row[idx].is_null()).count();
    if missing > 0 {
        return Err(PipelineError::DataIntegrityViolation(format!(
            "{} of {} ratings have no {}",
            missing,
            ratings.len(),
            HELPFUL_NUM
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NOTE_ID, RATER_PARTICIPANT_ID};

    fn ratings(rows: Vec<(Option<i64>, Option<i64>, Option<&str>)>) -> Table {
        Table::from_rows(
            vec![
                Column::new(NOTE_ID, FieldType::Int),
                Column::new(RATER_PARTICIPANT_ID, FieldType::Str),
                Column::new(HELPFUL, FieldType::Int),
                Column::new(NOT_HELPFUL, FieldType::Int),
                Column::new(HELPFULNESS_LEVEL, FieldType::Str),
            ],
            rows.into_iter()
                .enumerate()
                .map(|(i, (h, nh, level))| {
                    vec![Value::Int(i as i64), "rater".into(), h.into(), nh.into(), level.into()]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_binary_flag_wins_over_level() {
        let value = unified_helpfulness(&Value::Int(1), &Value::Null, &NOT_HELPFUL_VALUE.into());
        assert_eq!(value, Some(1.0));
    }

    #[test]
    fn test_not_helpful_flag() {
        let value = unified_helpfulness(&Value::Int(0), &Value::Int(1), &HELPFUL_VALUE.into());
        assert_eq!(value, Some(0.0));
    }

    #[test]
    fn test_level_used_when_flags_are_zero() {
        let value = unified_helpfulness(&Value::Int(0), &Value::Int(0), &SOMEWHAT_HELPFUL_VALUE.into());
        assert_eq!(value, Some(0.5));
    }

    #[test]
    fn test_unknown_level_has_no_signal() {
        assert_eq!(
            unified_helpfulness(&Value::Null, &Value::Null, &"MAYBE".into()),
            None
        );
    }

    #[test]
    fn test_derive_drops_rows_without_signal() {
        let input = ratings(vec![
            (Some(1), None, Some(NOT_HELPFUL_VALUE)),
            (Some(0), Some(0), Some(SOMEWHAT_HELPFUL_VALUE)),
            (None, None, None),
            (None, None, Some(HELPFUL_VALUE)),
        ]);
        let derived = derive_helpful_num(&input).unwrap();

        assert_eq!(derived.len(), 3);
        let nums: Vec<f64> = derived
            .column_values(HELPFUL_NUM)
            .unwrap()
            .into_iter()
            .filter_map(Value::as_f64)
            .collect();
        assert_eq!(nums, vec![1.0, 0.5, 1.0]);
        assert!(ensure_helpful_num_defined(&derived).is_ok());
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn test_missing_helpful_num_is_integrity_violation() {
        let input = ratings(vec![(Some(1), None, None)]);
        let err = ensure_helpful_num_defined(&input).unwrap_err();
        assert!(matches!(err, PipelineError::DataIntegrityViolation(_)));

        let with_null = input
            .with_column(Column::new(HELPFUL_NUM, FieldType::Float), vec![Value::Null])
            .unwrap();
        assert!(matches!(
            ensure_helpful_num_defined(&with_null),
            Err(PipelineError::DataIntegrityViolation(_))
        ));
    }
}
