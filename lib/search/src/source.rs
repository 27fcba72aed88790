//! Row sources the search engine scans

use slovnik_core::{Result, RowId, StoredRow};
use slovnik_schema::DictionarySchema;

/// Anything that can hand out the rows of one loaded dataset.
///
/// `scan` visits every row exactly once, in ascending row id order.
pub trait RowSource {
    fn schema(&self) -> &DictionarySchema;

    fn scan(&self, visit: &mut dyn FnMut(RowId, &StoredRow)) -> Result<()>;
}

/// In-memory rows, used for tests and benchmarks.
#[derive(Debug, Clone)]
pub struct MemoryRows {
    schema: DictionarySchema,
    rows: Vec<StoredRow>,
}

impl MemoryRows {
    pub fn new(schema: DictionarySchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Append a row of cells in column order, padding missing cells.
    /// Returns the id assigned to it.
    pub fn push(&mut self, mut cells: Vec<String>) -> RowId {
        cells.resize(self.schema.columns().len(), String::new());
        let shadow = self.schema.shadow_value(&cells);
        self.rows.push(StoredRow::new(cells, shadow));
        self.rows.len() as RowId
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for MemoryRows {
    fn schema(&self) -> &DictionarySchema {
        &self.schema
    }

    fn scan(&self, visit: &mut dyn FnMut(RowId, &StoredRow)) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            visit(i as RowId + 1, row);
        }
        Ok(())
    }
}
