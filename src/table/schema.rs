use std::collections::BTreeSet;

use super::{Column, FieldType};

/// Ordered field name -> type mapping that a reader validates against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Column>,
}

impl Schema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, kind)| Column::new(name, kind))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[Column] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|c| c.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|c| c.name == name)
    }

    /// Columns in `actual` that the schema lacks, and schema fields absent
    /// from `actual`. A name repeated in `actual` counts as extra.
    pub fn column_mismatch<'a, I>(&self, actual: I) -> (Vec<String>, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expected: BTreeSet<&str> = self.names().collect();
        let mut seen = BTreeSet::new();
        let mut extra = BTreeSet::new();
        for name in actual {
            if !expected.contains(name) || !seen.insert(name) {
                extra.insert(name.to_string());
            }
        }
        let missing = expected
            .iter()
            .filter(|name| !seen.contains(*name))
            .map(|name| name.to_string())
            .collect();
        (extra.into_iter().collect(), missing)
    }

    /// Same schema with one more field appended
    pub fn with_field(&self, name: impl Into<String>, kind: FieldType) -> Self {
        let mut fields = self.fields.clone();
        fields.push(Column::new(name, kind));
        Self { fields }
    }
}
