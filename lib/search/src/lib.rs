//! # slovnik Search
//!
//! Substring search over the rows of a loaded dictionary.
//!
//! ## Matching
//!
//! - Every term is searched on its own, in the order given
//! - A row matches when any original column contains the term
//! - The `isv` column is compared through its folded shadow value, so
//!   `casa` finds `čaša`; other columns compare the term as typed
//! - Rows are reported once per term; the optional language filter keeps
//!   rows with a non-empty cell in that language
//!
//! ## Example
//!
//! ```rust
//! use slovnik_schema::DictionarySchema;
//! use slovnik_search::{MemoryRows, SearchEngine};
//!
//! let schema = DictionarySchema::build(["isv", "en"]).unwrap();
//! let mut rows = MemoryRows::new(schema);
//! rows.push(vec!["čaša".to_string(), "cup".to_string()]);
//!
//! let engine = SearchEngine::new(&rows);
//! let results = engine.search(&["casa"], None).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].term, "casa");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  RowSource  │────>│SearchEngine │────>│SearchResult │
//! │ (store/mem) │     │ (per term)  │     │ (tagged)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod engine;
pub mod source;

pub use engine::SearchEngine;
pub use source::{MemoryRows, RowSource};
