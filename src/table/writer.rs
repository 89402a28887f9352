use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;
use csv::WriterBuilder;

use super::Table;
use crate::error::{PipelineError, Result};

/// Writes a table to a TSV file on disk: header row, tab-delimited,
/// no row index. Null and empty strings both become an empty field.
#[derive(Debug, Clone)]
pub struct TsvWriter {
    path: PathBuf,
}

impl TsvWriter {
    /// Bind the writer to a destination path. An empty path is rejected.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(PipelineError::MissingSink);
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the table and atomically replace the destination file.
    /// Every failure here is reported as `PipelineError::Write`.
    pub fn write(&self, table: &Table) -> Result<()> {
        let mut file = AtomicWriteFile::open(&self.path).map_err(|e| self.write_error(e))?;
        write_records(&mut file, table).map_err(|e| self.write_error(e.into()))?;
        file.commit().map_err(|e| self.write_error(e))?;

        self.confirm_written()
    }

    fn write_error(&self, source: io::Error) -> PipelineError {
        PipelineError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn confirm_written(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(PipelineError::UnconfirmedWrite(self.path.clone())),
        }
    }
}

/// Serialize a table as TSV into any writer
pub fn write_table<W: Write>(sink: W, table: &Table) -> Result<()> {
    write_records(sink, table).map_err(|e| PipelineError::csv("Failed to write TSV", e))
}

fn write_records<W: Write>(sink: W, table: &Table) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(sink);
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_field().into_owned()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, FieldType, Schema, TsvReader, Value};

    fn scored_notes() -> Table {
        Table::from_rows(
            vec![
                Column::new("noteId", FieldType::Int),
                Column::new("tweetId", FieldType::Str),
                Column::new("meanHelpfulNum", FieldType::Float),
            ],
            vec![
                vec![Value::Int(1), "1001".into(), 0.5.into()],
                vec![Value::Int(2), Value::Null, 1.0.into()],
                vec![Value::Int(3), "tab\there".into(), 0.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            TsvWriter::new(""),
            Err(PipelineError::MissingSink)
        ));
    }

    #[test]
    fn test_write_table_has_header_and_tabs() {
        let mut buf = Vec::new();
        write_table(&mut buf, &scored_notes()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("noteId\ttweetId\tmeanHelpfulNum"));
        assert_eq!(lines.next(), Some("1\t1001\t0.5"));
        assert_eq!(lines.next(), Some("2\t\t1"));
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scored_notes.tsv");
        let table = scored_notes();

        TsvWriter::new(&path).unwrap().write(&table).unwrap();

        let schema = Schema::new([
            ("noteId", FieldType::Int),
            ("tweetId", FieldType::Str),
            ("meanHelpfulNum", FieldType::Float),
        ]);
        let read_back = TsvReader::new(schema).read_path(&path).unwrap();
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_unwritable_destination_is_output_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.tsv");

        let err = TsvWriter::new(&path)
            .unwrap()
            .write(&scored_notes())
            .unwrap_err();

        assert!(matches!(err, PipelineError::Write { .. }));
        assert!(err.is_output_failure());
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_string_reads_back_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.tsv");
        let table = Table::from_rows(
            vec![
                Column::new("noteId", FieldType::Int),
                Column::new("tweetId", FieldType::Str),
            ],
            vec![vec![Value::Int(1), "".into()]],
        )
        .unwrap();

        TsvWriter::new(&path).unwrap().write(&table).unwrap();

        let schema = Schema::new([("noteId", FieldType::Int), ("tweetId", FieldType::Str)]);
        let read_back = TsvReader::new(schema).read_path(&path).unwrap();
        assert_eq!(read_back.row(0).unwrap(), &[Value::Int(1), Value::Null]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        fs::write(&path, "stale").unwrap();

        TsvWriter::new(&path).unwrap().write(&scored_notes()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("noteId\t"));
    }
}
