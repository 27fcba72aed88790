//! # slovnik Schema
//!
//! Storage schema for tabular dictionaries.
//!
//! ## Overview
//!
//! A dictionary arrives as a table whose header names the languages
//! (`isv`, `en`, `ru`, ...). The schema records those columns in header
//! order and, when the Interslavic `isv` column is present, adds a hidden
//! shadow field holding its diacritic-folded form so that `cas` finds
//! `čaša`.
//!
//! ```rust
//! use slovnik_schema::{DictionarySchema, FieldKind};
//!
//! let schema = DictionarySchema::build(["ISV", "en", "ru"]).unwrap();
//! assert_eq!(schema.columns(), ["isv", "en", "ru"]);
//!
//! let fields = schema.storage_fields();
//! assert_eq!(fields.len(), 4);
//! assert_eq!(fields[3].kind, FieldKind::Shadow);
//! assert_eq!(schema.index_fields().len(), 3);
//! ```
//!
//! ## Layout
//!
//! ```text
//! header ──> DictionarySchema ──┬──> storage fields (columns + shadow)
//!                               └──> index fields   (columns only)
//! ```

pub mod schema;

pub use schema::{column_key, DictionarySchema, FieldConfig, FieldKind, SchemaError};
