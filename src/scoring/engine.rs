use std::collections::HashMap;

use super::config::ScoringConfig;
use crate::constants::{HELPFUL_NUM, MEAN_HELPFUL_NUM, NOTE_ID, NUM_RATINGS, TWEET_ID};
use crate::error::Result;
use crate::filter::{filter_ratings_for_training, MinRatingCounts};
use crate::helpfulness::ensure_helpful_num_defined;
use crate::table::{Column, FieldType, Table, Value};

/// What a scorer hands back: the scored notes that get written out, plus
/// any intermediate tables it chose to expose.
#[derive(Debug, Clone)]
pub struct ScorerOutput {
    pub scored_notes: Table,
    pub auxiliary: Vec<Table>,
}

/// Boundary to the note scoring algorithm
pub trait Scorer {
    fn score(
        &self,
        ratings: &Table,
        note_status_history: &Table,
        user_enrollments: &Table,
    ) -> Result<ScorerOutput>;
}

/// Aggregates the training ratings of each note into a count and a mean
/// helpfulness. Stands in for the full ranking model.
#[derive(Debug, Clone)]
pub struct TallyScorer {
    thresholds: MinRatingCounts,
    should_log: bool,
}

impl TallyScorer {
    pub fn new(config: &ScoringConfig, should_log: bool) -> Self {
        Self {
            thresholds: config.min_rating_counts(),
            should_log,
        }
    }
}

impl Scorer for TallyScorer {
    fn score(
        &self,
        ratings: &Table,
        note_status_history: &Table,
        _user_enrollments: &Table,
    ) -> Result<ScorerOutput> {
        ensure_helpful_num_defined(ratings)?;
        let training = filter_ratings_for_training(ratings, self.thresholds, self.should_log)?;
        let scored_notes = tally_notes(&training, note_status_history)?;

        if self.should_log {
            tracing::info!(
                "Scored {} notes from {} training ratings",
                scored_notes.len(),
                training.len()
            );
        }

        Ok(ScorerOutput {
            scored_notes,
            auxiliary: vec![training],
        })
    }
}

/// One row per note, in order of first appearance in `ratings`
fn tally_notes(ratings: &Table, note_status_history: &Table) -> Result<Table> {
    let note_idx = ratings.column_index(NOTE_ID)?;
    let num_idx = ratings.column_index(HELPFUL_NUM)?;

    let nsh_note = note_status_history.column_index(NOTE_ID)?;
    let nsh_tweet = note_status_history.column_index(TWEET_ID)?;
    let tweet_by_note: HashMap<&Value, &Value> = note_status_history
        .rows()
        .map(|row| (&row[nsh_note], &row[nsh_tweet]))
        .collect();

    let mut order: Vec<&Value> = Vec::new();
    let mut totals: HashMap<&Value, (i64, f64)> = HashMap::new();
    for row in ratings.rows() {
        let note = &row[note_idx];
        let entry = totals.entry(note).or_insert_with(|| {
            order.push(note);
            (0, 0.0)
        });
        entry.0 += 1;
        entry.1 += row[num_idx].as_f64().unwrap_or_default();
    }

    let columns = vec![
        Column::new(NOTE_ID, ratings.columns()[note_idx].kind),
        Column::new(TWEET_ID, FieldType::Str),
        Column::new(NUM_RATINGS, FieldType::Int),
        Column::new(MEAN_HELPFUL_NUM, FieldType::Float),
    ];
    let rows = order
        .into_iter()
        .map(|note| {
            let (count, sum) = totals[note];
            vec![
                note.clone(),
                tweet_by_note.get(note).map(|v| (*v).clone()).unwrap_or(Value::Null),
                Value::Int(count),
                Value::Float(sum / count as f64),
            ]
        })
        .collect();
    Table::from_rows(columns, rows)
}
