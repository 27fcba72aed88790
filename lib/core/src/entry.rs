use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Row identity assigned by the store at insertion time.
pub type RowId = u64;

/// A row as written to the store: cells in column order plus the hidden
/// normalized form of the source-language cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow {
    pub cells: Vec<String>,
    /// Empty when the dataset has no source-language column.
    #[serde(default)]
    pub shadow: String,
}

impl StoredRow {
    #[inline]
    #[must_use]
    pub fn new(cells: Vec<String>, shadow: String) -> Self {
        Self { cells, shadow }
    }

    /// Cell at `index`, `""` when the row is shorter than the column set.
    #[inline]
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A dictionary row as seen by callers: column name to cell value, in
/// column order. The shadow value is never part of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub id: RowId,
    fields: Vec<(String, String)>,
}

impl DictionaryEntry {
    #[must_use]
    pub fn new(id: RowId, fields: Vec<(String, String)>) -> Self {
        Self { id, fields }
    }

    /// Pair stored cells with the column names of the dataset.
    #[must_use]
    pub fn from_row(id: RowId, columns: &[String], row: &StoredRow) -> Self {
        let fields = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), row.cell(i).to_string()))
            .collect();
        Self { id, fields }
    }

    /// Value of `column`, `None` if the dataset has no such column.
    #[inline]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// True when `column` exists and holds a non-empty value.
    #[inline]
    pub fn has_value(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Entries render as a flat JSON object in column order.
impl Serialize for DictionaryEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An entry together with the search term that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub entry: DictionaryEntry,
    pub term: String,
}

impl SearchResult {
    #[inline]
    #[must_use]
    pub fn new(entry: DictionaryEntry, term: impl Into<String>) -> Self {
        Self {
            entry,
            term: term.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> RowId {
        self.entry.id
    }
}
