pub mod config;
pub mod fetch;
pub mod loader;
pub mod manager;
pub mod metadata;
pub mod store;
pub mod tabular;

pub use config::{default_cache_dir, CacheConfig, DEFAULT_SOURCE_URL};
pub use fetch::{fetcher_for, FileFetcher, HttpFetcher, SourceFetcher};
pub use loader::{LoadResult, Loader};
pub use manager::{CacheDescription, DictionaryManager};
pub use metadata::{CacheMetadata, MetadataFile};
pub use store::{Store, StoreStats};
pub use tabular::{parse_csv, CsvRows, Row};
