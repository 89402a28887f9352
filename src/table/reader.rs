use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::{Schema, Table, Value};
use crate::error::{PipelineError, Result};

/// Reads a delimited file into a table typed by a schema.
///
/// Files may or may not carry a header row. The reader first assumes there
/// is none; if a field then fails to coerce to its declared type, or row 1
/// has the wrong number of fields, it re-reads the file treating row 1 as a
/// header and requires the header to name exactly the schema's fields.
#[derive(Debug, Clone)]
pub struct TsvReader {
    schema: Schema,
    delimiter: u8,
}

impl TsvReader {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            delimiter: b'\t',
        }
    }

    /// Read and validate a file on disk
    pub fn read_path(&self, path: &Path) -> Result<Table> {
        let data = fs::read(path)
            .map_err(|e| PipelineError::io(format!("Failed to read {}", path.display()), e))?;
        self.read_bytes(&path.display().to_string(), &data)
    }

    /// Read and validate in-memory file contents. `source_name` only labels errors.
    pub fn read_bytes(&self, source_name: &str, data: &[u8]) -> Result<Table> {
        match self.parse_headerless(source_name, data) {
            Err(err) if suggests_header_row(&err) => {
                tracing::info!(
                    "The file {} might contain a header row. Re-reading without forced column names.",
                    source_name
                );
                self.parse_with_header(source_name, data)
            }
            result => result,
        }
    }

    fn builder(&self, has_headers: bool) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.delimiter(self.delimiter).has_headers(has_headers);
        builder
    }

    fn parse_headerless(&self, source_name: &str, data: &[u8]) -> Result<Table> {
        let mut reader = self.builder(false).flexible(true).from_reader(data);
        let positions: Vec<usize> = (0..self.schema.len()).collect();
        let mut table = Table::new(self.schema.fields().to_vec());

        for record in reader.records() {
            let record = record.map_err(|e| read_error(source_name, e))?;
            if record.len() != self.schema.len() {
                return Err(PipelineError::FieldCount {
                    source_name: source_name.to_string(),
                    line: line_of(&record),
                    expected: self.schema.len(),
                    found: record.len(),
                });
            }
            table.push_row(self.typed_row(source_name, &record, &positions)?)?;
        }
        Ok(table)
    }

    fn parse_with_header(&self, source_name: &str, data: &[u8]) -> Result<Table> {
        let mut reader = self.builder(true).from_reader(data);
        let headers = reader
            .headers()
            .map_err(|e| read_error(source_name, e))?
            .clone();

        let (extra, missing) = self.schema.column_mismatch(headers.iter());
        if !extra.is_empty() || !missing.is_empty() {
            return Err(PipelineError::SchemaViolation {
                source_name: source_name.to_string(),
                extra,
                missing,
            });
        }

        // Header order may differ from the schema; rows are laid out in schema order.
        let positions: Vec<usize> = self
            .schema
            .names()
            .map(|name| headers.iter().position(|h| h == name).unwrap_or_default())
            .collect();
        let mut table = Table::new(self.schema.fields().to_vec());

        for record in reader.records() {
            let record = record.map_err(|e| read_error(source_name, e))?;
            table.push_row(self.typed_row(source_name, &record, &positions)?)?;
        }
        Ok(table)
    }

    fn typed_row(
        &self,
        source_name: &str,
        record: &StringRecord,
        positions: &[usize],
    ) -> Result<Vec<Value>> {
        self.schema
            .fields()
            .iter()
            .zip(positions)
            .map(|(field, &pos)| {
                let raw = record.get(pos).unwrap_or("");
                field
                    .kind
                    .parse(raw)
                    .ok_or_else(|| PipelineError::TypeCoercion {
                        source_name: source_name.to_string(),
                        line: line_of(record),
                        column: field.name.clone(),
                        value: raw.to_string(),
                        expected: field.kind,
                    })
            })
            .collect()
    }
}

/// The headerless attempt failing on type coercion, or on a row 1 of the
/// wrong width, usually means row 1 holds column labels rather than data.
pub fn suggests_header_row(err: &PipelineError) -> bool {
    matches!(
        err,
        PipelineError::TypeCoercion { .. } | PipelineError::FieldCount { line: 1, .. }
    )
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn read_error(source_name: &str, err: csv::Error) -> PipelineError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return PipelineError::FieldCount {
            source_name: source_name.to_string(),
            line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    PipelineError::csv(format!("Failed to parse {}", source_name), err)
}
