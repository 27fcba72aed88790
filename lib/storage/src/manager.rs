use crate::config::CacheConfig;
use crate::fetch::{fetcher_for, SourceFetcher};
use crate::loader::{LoadResult, Loader};
use crate::metadata::{CacheMetadata, MetadataFile};
use crate::store::Store;
use serde::Serialize;
use slovnik_core::{Error, Filter, LanguageFilter, Result, SearchResult};
use slovnik_search::SearchEngine;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What `describe_cache` reports about the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheDescription {
    #[serde(flatten)]
    pub metadata: CacheMetadata,
    pub store_path: PathBuf,
    /// Whether the store directory is on disk.
    pub store_present: bool,
}

/// Entry point for the dictionary cache.
///
/// Holds no open handles between calls: every operation opens the store
/// for its own duration.
pub struct DictionaryManager {
    config: CacheConfig,
    metadata: MetadataFile,
}

impl DictionaryManager {
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let metadata = MetadataFile::new(config.metadata_path());
        Ok(Self { config, metadata })
    }

    #[inline]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store_path(&self) -> PathBuf {
        self.config.store_path()
    }

    /// Refresh from the configured source.
    pub fn refresh_from_source(&self) -> Result<LoadResult> {
        let fetcher = fetcher_for(&self.config);
        self.refresh(fetcher.as_ref())
    }

    /// Fetch the dataset and rebuild the cache from it.
    ///
    /// A fetch failure leaves the existing cache untouched.
    pub fn refresh(&self, fetcher: &dyn SourceFetcher) -> Result<LoadResult> {
        let data = fetcher.fetch()?;
        self.refresh_from(&fetcher.source(), &data)
    }

    /// Rebuild the cache from CSV bytes already in hand.
    ///
    /// Metadata is written only once the store has committed; until then
    /// the previous record is gone, so a failed load leaves no cache at all.
    pub fn refresh_from(&self, source: &str, data: &[u8]) -> Result<LoadResult> {
        fs::create_dir_all(&self.config.cache_dir)?;
        self.metadata.remove()?;

        let loader = Loader::new(self.store_path(), self.config.map_size);
        let result = loader.load_csv(data)?;

        let metadata = CacheMetadata::new(source, result.row_count, result.columns.clone());
        self.metadata.write(&metadata)?;
        info!(
            rows = result.row_count,
            columns = result.columns.len(),
            "Cache refreshed from {}",
            source
        );
        Ok(result)
    }

    // A store that is gone while its metadata survives is corruption,
    // not a cache that was never built.
    fn open_store(&self) -> Result<Store> {
        match Store::open(self.store_path(), self.config.map_size) {
            Err(Error::StoreNotFound(path)) if self.metadata.exists() => Err(Error::StoreCorruption(
                format!("metadata present but no store at {}", path.display()),
            )),
            result => result,
        }
    }

    // Metadata and store must agree on the number of rows. A record that
    // cannot be read is as bad as one that disagrees.
    fn check_consistency(&self, store: &Store) -> Result<()> {
        let metadata = self.metadata.read().map_err(|e| match e {
            Error::Metadata(msg) => Error::StoreCorruption(msg),
            other => other,
        })?;
        if let Some(metadata) = metadata {
            let rows = store.row_count()?;
            if metadata.row_count != rows {
                return Err(Error::StoreCorruption(format!(
                    "metadata records {} rows but the store holds {}",
                    metadata.row_count, rows
                )));
            }
        }
        Ok(())
    }

    /// Substring search for every term, filtered to entries that have a
    /// translation in `language` when given.
    pub fn search<S: AsRef<str>>(&self, terms: &[S], language: Option<&str>) -> Result<Vec<SearchResult>> {
        let store = self.open_store()?;
        self.check_consistency(&store)?;

        let filter = language_filter(language);
        let results = SearchEngine::new(&store)
            .search(terms, filter.as_ref().map(|f| f as &dyn Filter))?;
        debug!(terms = terms.len(), results = results.len(), "Search finished");
        Ok(results)
    }

    /// Entries containing `word` as a whole word in any original column.
    pub fn lookup_word(&self, word: &str, language: Option<&str>) -> Result<Vec<SearchResult>> {
        let store = self.open_store()?;
        self.check_consistency(&store)?;

        let stats = store.stats()?;
        if !stats.is_consistent() {
            return Err(Error::StoreCorruption(format!(
                "index covers {} rows but the store holds {}",
                stats.indexed_docs, stats.rows
            )));
        }

        let filter = language_filter(language);
        let mut results = Vec::new();
        for id in store.lookup(word)? {
            let entry = store
                .get_entry(id)?
                .ok_or_else(|| Error::StoreCorruption(format!("index references missing row {}", id)))?;
            if filter.as_ref().map(|f| f.matches(&entry)).unwrap_or(true) {
                results.push(SearchResult::new(entry, word));
            }
        }
        Ok(results)
    }

    /// Column names of the loaded dataset, empty when nothing is loaded.
    pub fn list_columns(&self) -> Result<Vec<String>> {
        if let Some(metadata) = self.metadata.read()? {
            return Ok(metadata.columns);
        }
        match self.open_store() {
            Ok(store) => Ok(store.schema().columns().to_vec()),
            Err(Error::StoreNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// True when the last load predates the current schema version.
    /// Without metadata there is nothing to upgrade.
    pub fn needs_schema_upgrade(&self) -> Result<bool> {
        Ok(self
            .metadata
            .read()?
            .map(|metadata| metadata.needs_upgrade())
            .unwrap_or(false))
    }

    /// Whether a committed store can be opened.
    pub fn cache_exists(&self) -> bool {
        self.open_store().is_ok()
    }

    /// Metadata of the last load, or `None` when there is no cache.
    pub fn describe_cache(&self) -> Result<Option<CacheDescription>> {
        let store_path = self.store_path();
        Ok(self.metadata.read()?.map(|metadata| CacheDescription {
            metadata,
            store_present: Store::exists(&store_path),
            store_path,
        }))
    }

    /// Remove store and metadata. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool> {
        let store = Store::remove(self.store_path())?;
        let metadata = self.metadata.remove()?;
        Ok(store || metadata)
    }

    pub fn metadata_path(&self) -> &Path {
        self.metadata.path()
    }
}

// A blank language code means no filter.
fn language_filter(language: Option<&str>) -> Option<LanguageFilter> {
    language
        .filter(|code| !code.trim().is_empty())
        .map(LanguageFilter::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FileFetcher;

    const SAMPLE: &str = "isv,en,ru\nvoda,water,вода\nogenj,fire,\nčaša,cup,чаша\n";

    fn manager(dir: &Path) -> DictionaryManager {
        let config = CacheConfig::new(dir).with_map_size(10 * 1024 * 1024);
        DictionaryManager::new(config).unwrap()
    }

    #[test]
    fn test_refresh_writes_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());

        let result = manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        assert_eq!(result.row_count, 3);

        let description = manager.describe_cache().unwrap().unwrap();
        assert_eq!(description.metadata.source, "test.csv");
        assert_eq!(description.metadata.row_count, 3);
        assert_eq!(description.metadata.columns, ["isv", "en", "ru"]);
        assert!(description.store_present);
        assert!(manager.cache_exists());
        assert!(!manager.needs_schema_upgrade().unwrap());
    }

    #[test]
    fn test_refresh_with_file_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("source.csv");
        fs::write(&csv_path, SAMPLE).unwrap();

        let manager = manager(&dir.path().join("cache"));
        manager.refresh(&FileFetcher::new(&csv_path)).unwrap();

        let results = manager.search(&["casa"], None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.get("en"), Some("cup"));
    }

    #[test]
    fn test_failed_fetch_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();

        let missing = FileFetcher::new(dir.path().join("missing.csv"));
        assert!(manager.refresh(&missing).is_err());
        assert_eq!(manager.search(&["voda"], None).unwrap().len(), 1);
    }

    #[test]
    fn test_row_count_mismatch_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();

        let mut metadata = MetadataFile::new(manager.metadata_path()).read().unwrap().unwrap();
        metadata.row_count = 7;
        MetadataFile::new(manager.metadata_path()).write(&metadata).unwrap();

        let err = manager.search(&["voda"], None).unwrap_err();
        assert!(matches!(err, Error::StoreCorruption(_)));
        assert!(err.requires_refresh());
    }

    #[test]
    fn test_missing_store_with_metadata_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        Store::remove(manager.store_path()).unwrap();

        let err = manager.search(&["voda"], None).unwrap_err();
        assert!(matches!(err, Error::StoreCorruption(_)));
        assert!(err.requires_refresh());
        assert!(!manager.cache_exists());
    }

    #[test]
    fn test_unreadable_metadata_needs_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        fs::write(manager.metadata_path(), "garbage").unwrap();

        let err = manager.search(&["voda"], None).unwrap_err();
        assert!(matches!(err, Error::StoreCorruption(_)));
        assert!(err.requires_refresh());
        assert!(manager.lookup_word("voda", None).unwrap_err().requires_refresh());

        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        assert_eq!(manager.search(&["voda"], None).unwrap().len(), 1);
        assert!(!manager.needs_schema_upgrade().unwrap());
    }

    #[test]
    fn test_blank_language_is_no_filter() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();

        assert_eq!(manager.search(&["fire"], Some("")).unwrap().len(), 1);
        assert_eq!(manager.search(&["fire"], Some("  ")).unwrap().len(), 1);
        assert_eq!(manager.lookup_word("fire", Some("")).unwrap().len(), 1);
        assert!(manager.search(&["fire"], Some("ru")).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_word() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager
            .refresh_from("test.csv", b"isv,en\nvoda,water\nvodopad,waterfall\nvoda pitna,drinking water\n")
            .unwrap();

        let ids: Vec<_> = manager.lookup_word("water", None).unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(ids, [1, 3]);
        assert!(manager.lookup_word("wat", None).unwrap().is_empty());
        assert_eq!(manager.lookup_word("water", Some("de")).unwrap().len(), 0);
    }

    #[test]
    fn test_list_columns_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        assert!(manager.list_columns().unwrap().is_empty());
        assert!(manager.describe_cache().unwrap().is_none());
        assert!(!manager.cache_exists());
    }

    #[test]
    fn test_list_columns_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        MetadataFile::new(manager.metadata_path()).remove().unwrap();

        assert_eq!(manager.list_columns().unwrap(), ["isv", "en", "ru"]);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        assert!(!manager.clear().unwrap());

        manager.refresh_from("test.csv", SAMPLE.as_bytes()).unwrap();
        assert!(manager.clear().unwrap());
        assert!(matches!(manager.search(&["voda"], None), Err(Error::StoreNotFound(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CacheConfig::new("/tmp/slovnik").with_map_size(123);
        assert!(DictionaryManager::new(config).is_err());
    }
}
