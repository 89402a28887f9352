pub mod min_count;
pub mod notes;
pub mod ratings;

pub use min_count::{filter_ratings_for_training, MinRatingCounts};
pub use notes::filter_duplicate_notes;
pub use ratings::{filter_duplicate_ratings, filter_ratings_of_misleading_notes, NoteLifecycleFlags};

use crate::error::{PipelineError, Result};
use crate::table::Table;

/// Drop exact duplicate rows, then fail if any key still repeats
fn drop_duplicates_enforcing_key(table: &Table, name: &'static str, key: &[&str]) -> Result<Table> {
    let deduped = table.drop_duplicates();
    let rows = deduped.len();
    let unique_keys = deduped.count_unique(key)?;
    if rows != unique_keys {
        return Err(PipelineError::PrimaryKeyViolation {
            table: name,
            key: key.join(","),
            unique_keys,
            rows,
        });
    }
    Ok(deduped)
}
