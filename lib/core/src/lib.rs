//! # slovnik Core
//!
//! Core library for the slovnik dictionary search engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`normalize`] - Diacritic folding for the Interslavic source column
//! - [`StoredRow`] / [`DictionaryEntry`] - A dictionary row as stored and as returned
//! - [`SearchResult`] - An entry tagged with the term that matched it
//! - [`LanguageFilter`] - Keep entries with a non-empty translation
//! - [`TextIndex`] - Whole-word inverted index over the original columns
//!
//! ## Example
//!
//! ```rust
//! use slovnik_core::{normalize, normalize_term, DictionaryEntry, Filter, LanguageFilter, StoredRow};
//!
//! assert_eq!(normalize("žaba"), "zaba");
//! assert_eq!(normalize_term("ČAŠA"), "casa");
//!
//! let columns = vec!["isv".to_string(), "en".to_string(), "ru".to_string()];
//! let row = StoredRow::new(
//!     vec!["voda".to_string(), "water".to_string(), "вода".to_string()],
//!     "voda".to_string(),
//! );
//! let entry = DictionaryEntry::from_row(1, &columns, &row);
//! assert!(LanguageFilter::new("ru").matches(&entry));
//! ```

pub mod entry;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod text_index;

pub use entry::{DictionaryEntry, RowId, SearchResult, StoredRow};
pub use error::{Error, Result};
pub use filter::{Filter, LanguageFilter};
pub use normalize::{needs_normalization, normalize, normalize_term};
pub use text_index::TextIndex;

/// Canonical name of the source-language column.
pub const SOURCE_COLUMN: &str = "isv";

/// Name of the hidden field holding the folded source-language cell.
pub const SHADOW_COLUMN: &str = "isv_normalized";

/// Schema version written by this build. Caches stamped with an older
/// version are rebuilt from scratch.
pub const SCHEMA_VERSION: u32 = 2;
