//! Bulk load of a tabular dataset into a fresh store
//!
//! The previous store is unlinked first. Rows, full-text index and schema
//! are then written in a single transaction. If anything fails on the way,
//! the half-created store directory is removed so that no store remains
//! that looks complete.

use crate::store::Store;
use crate::tabular::{parse_csv, Row};
use serde::Serialize;
use slovnik_core::{Result, StoredRow};
use slovnik_schema::DictionarySchema;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    pub row_count: u64,
    pub columns: Vec<String>,
}

pub struct Loader {
    store_path: PathBuf,
    map_size: usize,
}

impl Loader {
    pub fn new<P: AsRef<Path>>(store_path: P, map_size: usize) -> Self {
        Self {
            store_path: store_path.as_ref().to_path_buf(),
            map_size,
        }
    }

    /// Parse CSV bytes and load them.
    pub fn load_csv(&self, data: &[u8]) -> Result<LoadResult> {
        Store::remove(&self.store_path)?;
        let (header, rows) = parse_csv(data)?;
        self.load(&header, rows)
    }

    /// Replace the store with `rows`, laid out by `header`.
    ///
    /// `rows` is consumed lazily; an error it yields aborts the load.
    pub fn load<S, I>(&self, header: &[S], rows: I) -> Result<LoadResult>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = Result<Row>>,
    {
        Store::remove(&self.store_path)?;
        let schema = DictionarySchema::build(header.iter().map(AsRef::as_ref))?;
        info!(
            columns = schema.columns().len(),
            shadow = schema.has_shadow(),
            "Loading dictionary into {:?}",
            self.store_path
        );

        let stored = rows
            .into_iter()
            .map(|row| row.map(|row| Self::to_stored(&schema, &row)));

        match Store::write(&self.store_path, self.map_size, &schema, stored) {
            Ok(row_count) => {
                info!(rows = row_count, "Dictionary loaded");
                Ok(LoadResult {
                    row_count,
                    columns: schema.columns().to_vec(),
                })
            }
            Err(e) => {
                warn!("Load failed, removing partial store: {}", e);
                if let Err(cleanup) = Store::remove(&self.store_path) {
                    warn!("Could not remove partial store {:?}: {}", self.store_path, cleanup);
                }
                Err(e)
            }
        }
    }

    fn to_stored(schema: &DictionarySchema, row: &Row) -> StoredRow {
        let cells: Vec<String> = schema
            .columns()
            .iter()
            .map(|column| row.get(column).to_string())
            .collect();
        let shadow = schema.shadow_value(&cells);
        StoredRow::new(cells, shadow)
    }
}
