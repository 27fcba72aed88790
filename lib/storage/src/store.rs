// LMDB-backed dictionary store: rows, shadow values, full-text postings
use heed::byteorder::BE;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slovnik_core::{DictionaryEntry, Error, Result, RowId, StoredRow, TextIndex};
use slovnik_schema::DictionarySchema;
use slovnik_search::RowSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DB_ROWS: &str = "rows";
const DB_POSTINGS: &str = "postings";
const DB_CATALOG: &str = "catalog";

// Catalog keys. The schema record is written last: a store without it was
// never committed and reads as absent.
const CATALOG_SCHEMA: &str = "schema";
const CATALOG_INDEXED_DOCS: &str = "indexed_docs";

const DATA_FILE: &str = "data.mdb";

trait HeedResultExt<T> {
    fn storage(self) -> Result<T>;
}

impl<T> HeedResultExt<T> for heed::Result<T> {
    fn storage(self) -> Result<T> {
        self.map_err(|e| Error::Storage(e.to_string()))
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::StoreCorruption(format!("{}: {}", what, e)))
}

/// Row and index counts of a committed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub rows: u64,
    pub indexed_docs: u64,
    pub tokens: u64,
}

impl StoreStats {
    /// The full-text index covers exactly the stored rows.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.rows == self.indexed_docs
    }
}

pub struct Store {
    env: Env,
    rows_db: Database<U64<BE>, Bytes>,
    postings_db: Database<Str, Bytes>,
    catalog_db: Database<Str, Bytes>,
    schema: DictionarySchema,
    path: PathBuf,
}

impl Store {
    /// Whether an LMDB environment exists at `path`. Says nothing about
    /// whether a load into it ever committed.
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().join(DATA_FILE).exists()
    }

    /// Unlink the store directory. Returns whether anything was removed.
    pub fn remove<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(path)?;
        debug!("Removed store at {:?}", path);
        Ok(true)
    }

    fn open_env(path: &Path, map_size: usize) -> Result<Env> {
        fs::create_dir_all(path)?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(4)
                .open(path)
        }
        .storage()?;
        Ok(env)
    }

    /// Write a complete dataset into a fresh store at `path`.
    ///
    /// Rows get ids 1, 2, ... in iteration order. After the rows, the
    /// full-text index is rebuilt from what was written, then the catalog.
    /// Everything happens in one transaction: an error from `rows` or from
    /// LMDB aborts it and nothing becomes visible.
    pub fn write<P, I>(path: P, map_size: usize, schema: &DictionarySchema, rows: I) -> Result<u64>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = Result<StoredRow>>,
    {
        let env = Self::open_env(path.as_ref(), map_size)?;
        let mut wtxn = env.write_txn().storage()?;

        let rows_db: Database<U64<BE>, Bytes> =
            env.create_database(&mut wtxn, Some(DB_ROWS)).storage()?;
        let postings_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(DB_POSTINGS)).storage()?;
        let catalog_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(DB_CATALOG)).storage()?;

        let mut row_count: u64 = 0;
        for row in rows {
            let row = row?;
            row_count += 1;
            rows_db.put(&mut wtxn, &row_count, &encode(&row)?).storage()?;
        }

        let index = Self::build_index(&wtxn, rows_db, schema)?;
        for (token, ids) in index.postings() {
            let ids: Vec<RowId> = ids.iter().copied().collect();
            postings_db.put(&mut wtxn, token, &encode(&ids)?).storage()?;
        }

        let indexed_docs = index.len() as u64;
        catalog_db
            .put(&mut wtxn, CATALOG_INDEXED_DOCS, &encode(&indexed_docs)?)
            .storage()?;
        catalog_db.put(&mut wtxn, CATALOG_SCHEMA, &encode(schema)?).storage()?;

        wtxn.commit().storage()?;
        debug!(rows = row_count, tokens = index.token_count(), "Store committed");
        Ok(row_count)
    }

    // Index the rows as they sit in the transaction, original columns only.
    fn build_index(
        wtxn: &RwTxn,
        rows_db: Database<U64<BE>, Bytes>,
        schema: &DictionarySchema,
    ) -> Result<TextIndex> {
        let indexed = schema.index_fields().len();
        let mut index = TextIndex::new();
        for item in rows_db.iter(wtxn).storage()? {
            let (id, bytes) = item.storage()?;
            let row: StoredRow = decode(bytes, "row")?;
            index.insert_doc(id, (0..indexed).map(|i| row.cell(i)));
        }
        Ok(index)
    }

    /// Open a committed store.
    ///
    /// Fails with `StoreNotFound` when there is no store or the last load
    /// into it never committed.
    pub fn open<P: AsRef<Path>>(path: P, map_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !Self::exists(&path) {
            return Err(Error::StoreNotFound(path));
        }

        let env = Self::open_env(&path, map_size)?;

        // Database handles opened in a write txn stay valid once committed.
        let wtxn = env.write_txn().storage()?;
        let rows_db = env.open_database(&wtxn, Some(DB_ROWS)).storage()?;
        let postings_db = env.open_database(&wtxn, Some(DB_POSTINGS)).storage()?;
        let catalog_db: Option<Database<Str, Bytes>> =
            env.open_database(&wtxn, Some(DB_CATALOG)).storage()?;

        let (Some(rows_db), Some(postings_db), Some(catalog_db)) = (rows_db, postings_db, catalog_db)
        else {
            return Err(Error::StoreNotFound(path));
        };

        // A store laid out by an older schema version has to be rebuilt.
        let schema = match catalog_db.get(&wtxn, CATALOG_SCHEMA).storage()? {
            Some(bytes) => decode::<DictionarySchema>(bytes, "schema")?,
            None => return Err(Error::StoreNotFound(path)),
        };
        if !schema.is_current() {
            debug!(version = schema.version, "Store schema is outdated");
            return Err(Error::StoreNotFound(path));
        }
        wtxn.commit().storage()?;

        Ok(Self {
            env,
            rows_db,
            postings_db,
            catalog_db,
            schema,
            path,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn schema(&self) -> &DictionarySchema {
        &self.schema
    }

    pub fn row_count(&self) -> Result<u64> {
        let rtxn = self.env.read_txn().storage()?;
        self.rows_db.len(&rtxn).storage()
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let rtxn = self.env.read_txn().storage()?;
        let rows = self.rows_db.len(&rtxn).storage()?;
        let tokens = self.postings_db.len(&rtxn).storage()?;
        let indexed_docs = match self.catalog_db.get(&rtxn, CATALOG_INDEXED_DOCS).storage()? {
            Some(bytes) => decode(bytes, "indexed_docs")?,
            None => 0,
        };
        Ok(StoreStats {
            rows,
            indexed_docs,
            tokens,
        })
    }

    pub fn get_row(&self, id: RowId) -> Result<Option<StoredRow>> {
        let rtxn = self.env.read_txn().storage()?;
        match self.rows_db.get(&rtxn, &id).storage()? {
            Some(bytes) => Ok(Some(decode(bytes, "row")?)),
            None => Ok(None),
        }
    }

    pub fn get_entry(&self, id: RowId) -> Result<Option<DictionaryEntry>> {
        Ok(self
            .get_row(id)?
            .map(|row| DictionaryEntry::from_row(id, self.schema.columns(), &row)))
    }

    /// Rows containing every token of `word` in some original column.
    pub fn lookup(&self, word: &str) -> Result<Vec<RowId>> {
        let rtxn = self.env.read_txn().storage()?;
        let mut lists = Vec::new();
        for token in TextIndex::tokenize(word) {
            let ids = match self.postings_db.get(&rtxn, &token).storage()? {
                Some(bytes) => decode::<Vec<RowId>>(bytes, "postings")?,
                None => Vec::new(),
            };
            lists.push(ids);
        }
        Ok(TextIndex::intersect(lists))
    }
}

impl RowSource for Store {
    fn schema(&self) -> &DictionarySchema {
        &self.schema
    }

    fn scan(&self, visit: &mut dyn FnMut(RowId, &StoredRow)) -> Result<()> {
        let rtxn = self.env.read_txn().storage()?;
        for item in self.rows_db.iter(&rtxn).storage()? {
            let (id, bytes) = item.storage()?;
            let row: StoredRow = decode(bytes, "row")?;
            visit(id, &row);
        }
        Ok(())
    }
}
