use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::constants::{
    CORE_POPULATION, CREATED_AT_MILLIS, MODELING_POPULATION, NOTE_ID,
    NOT_MISLEADING_UI_LAUNCH_MILLIS, RATER_PARTICIPANT_ID, TWEET_ID,
};
use crate::error::{PipelineError, Result};
use crate::filter::{filter_duplicate_notes, filter_duplicate_ratings, filter_ratings_of_misleading_notes};
use crate::helpfulness::{derive_helpful_num, ensure_helpful_num_defined};
use crate::sources;
use crate::status_history::merge_note_info;
use crate::table::{Column, FieldType, Table, TsvReader, Value};

/// Locations of the four input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub user_enrollment: PathBuf,
    pub notes: PathBuf,
    pub ratings: PathBuf,
    pub note_status_history: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop ratings by note lifecycle (see `filter_ratings_of_misleading_notes`)
    pub filter_not_misleading_notes: bool,
    pub not_misleading_ui_launch_millis: i64,
    /// Log row counts and filter breakdowns
    pub should_log: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            filter_not_misleading_notes: true,
            not_misleading_ui_launch_millis: NOT_MISLEADING_UI_LAUNCH_MILLIS,
            should_log: true,
        }
    }
}

/// Cleaned tables ready for scoring
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub user_enrollments: Table,
    pub notes: Table,
    pub note_status_history: Table,
    pub ratings: Table,
}

/// Reads every input file and pre-processes it.
pub struct DataLoader {
    paths: DataPaths,
}

impl DataLoader {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    /// Read and clean all inputs. Any contract violation aborts the load.
    pub fn load(&self, options: &LoadOptions) -> Result<LoadedData> {
        let user_enrollments = self.load_user_enrollments()?;
        let notes = self.load_notes()?;

        // Dependent on notes, so must come after they are loaded.
        let note_status_history = self.load_note_status_history(&notes)?;

        // Dependent on note status history, so must come after it is loaded.
        let ratings = self.load_ratings(&note_status_history, options)?;

        let data = LoadedData {
            user_enrollments,
            notes,
            note_status_history,
            ratings,
        };
        if options.should_log {
            log_results(&data)?;
        }
        Ok(data)
    }

    fn load_user_enrollments(&self) -> Result<Table> {
        let path = &self.paths.user_enrollment;
        match TsvReader::new(sources::user_enrollment()).read_path(path) {
            Err(err) if is_legacy_enrollment_mismatch(&err) => {
                tracing::info!(
                    "{} does not match the current enrollment format ({}); reading as legacy format",
                    path.display(),
                    err
                );
                let legacy = TsvReader::new(sources::user_enrollment_legacy()).read_path(path)?;
                add_core_population(&legacy)
            }
            result => result,
        }
    }

    fn load_notes(&self) -> Result<Table> {
        let notes = TsvReader::new(sources::notes()).read_path(&self.paths.notes)?;
        prepare_notes(&notes)
    }

    fn load_note_status_history(&self, notes: &Table) -> Result<Table> {
        let history = TsvReader::new(sources::note_status_history())
            .read_path(&self.paths.note_status_history)?;
        merge_note_info(&history, notes)
    }

    fn load_ratings(&self, note_status_history: &Table, options: &LoadOptions) -> Result<Table> {
        let ratings = TsvReader::new(sources::ratings()).read_path(&self.paths.ratings)?;
        prepare_ratings(&ratings, note_status_history, options)
    }
}

/// Deduplicate notes and store tweet ids as text
pub fn prepare_notes(notes: &Table) -> Result<Table> {
    filter_duplicate_notes(notes)?.cast_to_str(TWEET_ID)
}

/// Derive unified helpfulness, deduplicate, and optionally drop ratings by
/// the lifecycle of the note they rate
pub fn prepare_ratings(
    ratings: &Table,
    note_status_history: &Table,
    options: &LoadOptions,
) -> Result<Table> {
    let ratings = derive_helpful_num(ratings)?;
    ensure_helpful_num_defined(&ratings)?;
    let ratings = filter_duplicate_ratings(&ratings)?;

    if !options.filter_not_misleading_notes {
        return Ok(ratings);
    }
    filter_ratings_of_misleading_notes(
        &ratings,
        note_status_history,
        options.not_misleading_ui_launch_millis,
        options.should_log,
    )
}

/// Legacy enrollment rows all belong to the core modeling population
pub fn add_core_population(legacy: &Table) -> Result<Table> {
    legacy.with_column(
        Column::new(MODELING_POPULATION, FieldType::Str),
        vec![Value::from(CORE_POPULATION); legacy.len()],
    )
}

fn is_legacy_enrollment_mismatch(err: &PipelineError) -> bool {
    matches!(
        err,
        PipelineError::SchemaViolation { .. } | PipelineError::FieldCount { .. }
    )
}

fn log_results(data: &LoadedData) -> Result<()> {
    tracing::info!(
        "Timestamp of latest rating in data: {}",
        latest_timestamp(&data.ratings)?
    );
    tracing::info!(
        "Timestamp of latest note in data: {}",
        latest_timestamp(&data.notes)?
    );
    tracing::info!(
        "Num Ratings: {}, Num Unique Notes Rated: {}, Num Unique Raters: {}",
        data.ratings.len(),
        data.ratings.count_unique(&[NOTE_ID])?,
        data.ratings.count_unique(&[RATER_PARTICIPANT_ID])?
    );
    Ok(())
}

/// Latest `createdAtMillis` as a UTC timestamp, or "n/a" when every value is null
fn latest_timestamp(table: &Table) -> Result<String> {
    Ok(table
        .max_i64(CREATED_AT_MILLIS)?
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.to_string())
        .unwrap_or_else(|| "n/a".to_string()))
}
