//! Dictionary storage schema
//!
//! Derives the storage layout of a loaded dictionary from the header of
//! the tabular source: one text field per column, plus a hidden shadow
//! field holding the folded form of the source-language column.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use slovnik_core::{normalize_term, SCHEMA_VERSION, SHADOW_COLUMN, SOURCE_COLUMN};

const BOM: char = '\u{feff}';

/// Stored name for a raw header cell: BOM and surrounding whitespace
/// removed, lowercased.
pub fn column_key(raw: &str) -> String {
    raw.trim_start_matches(BOM).trim().to_lowercase()
}

/// Storage schema of one loaded dataset.
///
/// Column order follows the source header and is the order cells are
/// stored in. The full-text index covers the original columns only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictionarySchema {
    /// Schema version stamped at build time
    #[serde(default = "default_version")]
    pub version: u32,

    /// Lowercased, trimmed column names in header order
    columns: Vec<String>,

    /// Position of the source-language column, if the header has one
    source_column: Option<usize>,
}

fn default_version() -> u32 {
    1
}

impl DictionarySchema {
    /// Build a schema from raw header names.
    ///
    /// Names are trimmed and lowercased. Duplicates after that step are
    /// rejected rather than silently merged.
    pub fn build<I, S>(column_names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = Vec::new();
        let mut seen = AHashSet::new();

        for (position, raw) in column_names.into_iter().enumerate() {
            let name = column_key(raw.as_ref());

            if name.is_empty() {
                return Err(SchemaError::EmptyColumnName(position));
            }
            if name == SHADOW_COLUMN {
                return Err(SchemaError::ReservedColumn(name));
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateColumn(name));
            }
            columns.push(name);
        }

        if columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let source_column = columns.iter().position(|c| c == SOURCE_COLUMN);

        Ok(Self {
            version: SCHEMA_VERSION,
            columns,
            source_column,
        })
    }

    /// Original columns, in storage order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by its stored name.
    #[inline]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the source-language column.
    #[inline]
    pub fn source_column(&self) -> Option<usize> {
        self.source_column
    }

    /// Whether rows carry a shadow value.
    #[inline]
    pub fn has_shadow(&self) -> bool {
        self.source_column.is_some()
    }

    /// Shadow value for a row: the lowercased, folded source-language
    /// cell. Empty when the cell is empty or there is no source column.
    pub fn shadow_value(&self, cells: &[String]) -> String {
        self.source_column
            .and_then(|i| cells.get(i))
            .map(|cell| normalize_term(cell))
            .unwrap_or_default()
    }

    /// Every stored field: the original columns, then the shadow field.
    pub fn storage_fields(&self) -> Vec<FieldConfig> {
        let mut fields: Vec<FieldConfig> = self
            .columns
            .iter()
            .map(|name| FieldConfig::text(name))
            .collect();
        if self.has_shadow() {
            fields.push(FieldConfig::shadow());
        }
        fields
    }

    /// Fields mirrored by the full-text index.
    pub fn index_fields(&self) -> Vec<FieldConfig> {
        self.storage_fields()
            .into_iter()
            .filter(|f| f.kind == FieldKind::Text)
            .collect()
    }

    #[inline]
    pub fn is_current(&self) -> bool {
        self.version >= SCHEMA_VERSION
    }
}

/// A single stored field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,
}

impl FieldConfig {
    /// A user-visible column from the source header
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
        }
    }

    /// The hidden folded copy of the source-language column
    pub fn shadow() -> Self {
        Self {
            name: SHADOW_COLUMN.to_string(),
            kind: FieldKind::Shadow,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Raw cell value, searched with the term as typed
    Text,
    /// Folded source-language value, searched with the folded term
    Shadow,
}

/// Errors that can occur while deriving a schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Tabular source has no columns")]
    EmptySchema,

    #[error("Column {0} has an empty name")]
    EmptyColumnName(usize),

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Column name '{0}' is reserved")]
    ReservedColumn(String),
}

impl From<SchemaError> for slovnik_core::Error {
    fn from(e: SchemaError) -> Self {
        slovnik_core::Error::Schema(e.to_string())
    }
}
