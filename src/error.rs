//! Error taxonomy for the ingestion pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::table::FieldType;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every way a load, filter or write can fail. None of these are retried:
/// the run aborts on the first one.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Header-parsed column set differs from the declared schema
    #[error("Columns don't match for {source_name}: {extra:?} are extra columns, {missing:?} are missing")]
    SchemaViolation {
        source_name: String,
        extra: Vec<String>,
        missing: Vec<String>,
    },

    /// Duplicate primary or composite keys left after exact-duplicate removal
    #[error("{table}: only {unique_keys} unique ({key}) keys but {rows} rows")]
    PrimaryKeyViolation {
        table: &'static str,
        key: String,
        unique_keys: usize,
        rows: usize,
    },

    /// A required derived value is missing on a row that reached a key-dependent step
    #[error("Data integrity violation: {0}")]
    DataIntegrityViolation(String),

    /// A field could not be read as its declared type
    #[error("{source_name}: line {line}: cannot read '{value}' in column '{column}' as {expected}")]
    TypeCoercion {
        source_name: String,
        line: u64,
        column: String,
        value: String,
        expected: FieldType,
    },

    #[error("{source_name}: line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        source_name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Table has no column named '{0}'")]
    MissingColumn(String),

    #[error("Row has {found} values but the table has {expected} columns")]
    RowShape { expected: usize, found: usize },

    #[error("Path must be provided")]
    MissingSink,

    #[error("Expected TSV to be written to {}, but no file was persisted there", .0.display())]
    UnconfirmedWrite(PathBuf),

    /// Opening, filling or committing the output file failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// True for the data contract gates (key and integrity violations),
    /// as opposed to unreadable or mis-shaped input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PipelineError::PrimaryKeyViolation { .. } | PipelineError::DataIntegrityViolation(_)
        )
    }

    /// True for failures writing the output file
    pub fn is_output_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingSink
                | PipelineError::UnconfirmedWrite(_)
                | PipelineError::Write { .. }
        )
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        PipelineError::Csv {
            context: context.into(),
            source,
        }
    }
}
