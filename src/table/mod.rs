pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::TsvReader;
pub use schema::Schema;
pub use writer::{write_table, TsvWriter};

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{PipelineError, Result};

/// Declared scalar type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    Float,
    Str,
}

impl FieldType {
    /// Parse one raw field. Empty text is Null for every type.
    /// Returns None when the text can't be coerced to this type.
    pub fn parse(&self, raw: &str) -> Option<Value> {
        if raw.is_empty() {
            return Some(Value::Null);
        }
        match self {
            FieldType::Int => parse_int(raw).map(Value::Int),
            FieldType::Float => raw.parse::<f64>().ok().map(Value::Float),
            FieldType::Str => Some(Value::Str(raw.to_string())),
        }
    }
}

/// Nullable integer columns exported through a float dtype come out as
/// "1.0"; only an all-zero fraction is accepted, and never via f64.
fn parse_int(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let (whole, fraction) = raw.split_once('.')?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    whole.parse::<i64>().ok()
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Str => write!(f, "string"),
        }
    }
}

/// A single cell.
///
/// Floats compare and hash by bit pattern so rows can be deduplicated
/// exactly; -0.0 and 0.0 are distinct.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used when serializing; Null is the empty field.
    /// An empty `Str` also serializes as the empty field, so it reads back as Null.
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(f) => Cow::Owned(f.to_string()),
            Value::Str(s) => Cow::Borrowed(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "<null>"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: FieldType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

pub type Row = Vec<Value>;

/// Immutable row table. Every transforming operation returns a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row has one value per column
    pub fn from_rows(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub(crate) fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::RowShape {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    fn key_indices(&self, key: &[&str]) -> Result<Vec<usize>> {
        key.iter().map(|name| self.column_index(name)).collect()
    }

    /// Values of one column, in row order
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keep the rows matching the predicate
    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| predicate(r.as_slice()))
                .cloned()
                .collect(),
        }
    }

    /// Keep row `i` where `mask[i]` is true; rows past the end of the mask are dropped
    pub fn filter_by_mask(&self, mask: &[bool]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(row, _)| row.clone())
                .collect(),
        }
    }

    /// Drop exact full-row duplicates, keeping the first occurrence
    pub fn drop_duplicates(&self) -> Table {
        let mut seen: HashSet<&Row> = HashSet::with_capacity(self.rows.len());
        let rows = self
            .rows
            .iter()
            .filter(|r| seen.insert(*r))
            .cloned()
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Number of distinct values of the given key columns
    pub fn count_unique(&self, key: &[&str]) -> Result<usize> {
        let indices = self.key_indices(key)?;
        let distinct: HashSet<Vec<&Value>> = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| &r[i]).collect())
            .collect();
        Ok(distinct.len())
    }

    /// Row count per distinct value of one column
    pub fn value_counts(&self, name: &str) -> Result<HashMap<&Value, usize>> {
        let idx = self.column_index(name)?;
        let mut counts = HashMap::new();
        for row in &self.rows {
            *counts.entry(&row[idx]).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Largest integer in a column, ignoring nulls
    pub fn max_i64(&self, name: &str) -> Result<Option<i64>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().filter_map(|r| r[idx].as_i64()).max())
    }

    /// Return a copy with `column` set to `values`. An existing column of the
    /// same name is replaced in place; otherwise the column is appended.
    pub fn with_column(&self, column: Column, values: Vec<Value>) -> Result<Table> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::RowShape {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        let existing = columns.iter().position(|c| c.name == column.name);
        let mut rows = self.rows.clone();
        match existing {
            Some(idx) => {
                columns[idx] = column;
                for (row, value) in rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                columns.push(column);
                for (row, value) in rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(Table { columns, rows })
    }

    /// Re-type a column as Str, rendering each non-null value as text
    pub fn cast_to_str(&self, name: &str) -> Result<Table> {
        let values = self
            .column_values(name)?
            .into_iter()
            .map(|v| match v {
                Value::Null => Value::Null,
                Value::Str(s) => Value::Str(s.clone()),
                other => Value::Str(other.to_field().into_owned()),
            })
            .collect();
        self.with_column(Column::new(name, FieldType::Str), values)
    }
}
