//! # slovnik
//!
//! Offline search over the Interslavic cross-language dictionary.
//!
//! The dictionary is published as a spreadsheet with one column per
//! language. slovnik downloads it once, loads it into a local LMDB store
//! and answers substring queries against every column. Queries against the
//! Interslavic column ignore diacritics and case, so `casa` finds `čaša`.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install slovnik
//! slovnik voda ogenj --lang ru
//! slovnik --info
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use slovnik::prelude::*;
//!
//! let manager = DictionaryManager::new(CacheConfig::default())?;
//! if !manager.cache_exists() || manager.needs_schema_upgrade()? {
//!     manager.refresh_from_source()?;
//! }
//!
//! for result in manager.search(&["voda"], Some("en"))? {
//!     println!("{} -> {:?}", result.term, result.entry.get("en"));
//! }
//! # Ok::<(), slovnik::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`slovnik-core`](https://docs.rs/slovnik-core) - Normalization, entries, filters, token index
//! - [`slovnik-schema`](https://docs.rs/slovnik-schema) - Storage schema derived from the source header
//! - [`slovnik-search`](https://docs.rs/slovnik-search) - Substring search engine
//! - [`slovnik-storage`](https://docs.rs/slovnik-storage) - LMDB store, loader, metadata, fetching

pub mod output;

// Re-export core types
pub use slovnik_core::{
    normalize, normalize_term, DictionaryEntry, Error, Filter, LanguageFilter, Result, RowId,
    SearchResult, SCHEMA_VERSION,
};

pub use slovnik_schema::{DictionarySchema, SchemaError};

pub use slovnik_search::{MemoryRows, RowSource, SearchEngine};

// Re-export storage
pub use slovnik_storage::{
    CacheConfig, CacheDescription, CacheMetadata, DictionaryManager, FileFetcher, HttpFetcher,
    LoadResult, SourceFetcher,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CacheConfig, DictionaryEntry, DictionaryManager, Error, LanguageFilter, Result,
        SearchResult, SourceFetcher,
    };
}
