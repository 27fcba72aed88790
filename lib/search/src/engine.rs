//! Substring search across dictionary columns
//!
//! Every term is matched on its own against every original column. The
//! source-language column is compared through its shadow value using the
//! folded term, all other columns with the term exactly as typed. Results
//! are grouped term by term, in the order the terms were given.

use crate::source::RowSource;
use ahash::AHashSet;
use slovnik_core::{normalize_term, DictionaryEntry, Filter, Result, RowId, SearchResult, StoredRow};
use tracing::debug;

/// Search over one row source
pub struct SearchEngine<'a> {
    source: &'a dyn RowSource,
}

impl<'a> SearchEngine<'a> {
    pub fn new(source: &'a dyn RowSource) -> Self {
        Self { source }
    }

    /// Run every term and concatenate the per-term results.
    ///
    /// A row is reported at most once per term but may show up under
    /// several terms. The filter is applied after matching.
    pub fn search<S: AsRef<str>>(
        &self,
        terms: &[S],
        filter: Option<&dyn Filter>,
    ) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for term in terms {
            results.extend(self.search_term(term.as_ref(), filter)?);
        }
        Ok(results)
    }

    /// Matches for a single term, in row order.
    pub fn search_term(&self, term: &str, filter: Option<&dyn Filter>) -> Result<Vec<SearchResult>> {
        let schema = self.source.schema();
        let normalized = normalize_term(term);
        let mut seen: AHashSet<RowId> = AHashSet::new();
        let mut results = Vec::new();

        self.source.scan(&mut |id, row| {
            if !self.matches(row, term, &normalized) || !seen.insert(id) {
                return;
            }

            let entry = DictionaryEntry::from_row(id, schema.columns(), row);
            if filter.map(|f| f.matches(&entry)).unwrap_or(true) {
                results.push(SearchResult::new(entry, term));
            }
        })?;

        debug!(term, normalized = %normalized, matches = results.len(), "term searched");
        Ok(results)
    }

    /// Whether any column of `row` contains the term.
    ///
    /// `normalized` must be `normalize_term(term)`.
    pub fn matches(&self, row: &StoredRow, term: &str, normalized: &str) -> bool {
        let source_column = self.source.schema().source_column();

        (0..self.source.schema().columns().len()).any(|i| {
            if Some(i) == source_column {
                row.shadow.contains(normalized)
            } else {
                row.cell(i).contains(term)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRows;
    use slovnik_core::LanguageFilter;
    use slovnik_schema::DictionarySchema;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> MemoryRows {
        let schema = DictionarySchema::build(["isv", "en", "ru"]).unwrap();
        let mut rows = MemoryRows::new(schema);
        rows.push(cells(&["voda", "water", "вода"]));
        rows.push(cells(&["ogenj", "fire", ""]));
        rows.push(cells(&["čaša", "cup", "чаша"]));
        rows.push(cells(&["vodopad", "waterfall", "водопад"]));
        rows
    }

    fn ids(results: &[SearchResult]) -> Vec<RowId> {
        results.iter().map(SearchResult::id).collect()
    }

    #[test]
    fn test_source_column_is_diacritic_insensitive() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);

        assert_eq!(ids(&engine.search(&["casa"], None).unwrap()), vec![3]);
        assert_eq!(ids(&engine.search(&["ČAŠ"], None).unwrap()), vec![3]);
        assert_eq!(ids(&engine.search(&["vodš"], None).unwrap()), Vec::<RowId>::new());
    }

    #[test]
    fn test_other_columns_are_case_sensitive() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);

        assert_eq!(ids(&engine.search(&["water"], None).unwrap()), vec![1, 4]);
        assert!(engine.search(&["Water"], None).unwrap().is_empty());
        assert_eq!(ids(&engine.search(&["вод"], None).unwrap()), vec![1, 4]);
    }

    #[test]
    fn test_dedup_within_term() {
        let schema = DictionarySchema::build(["isv", "en", "pl"]).unwrap();
        let mut rows = MemoryRows::new(schema);
        rows.push(cells(&["kot", "kot", "kot"]));
        let engine = SearchEngine::new(&rows);

        let results = engine.search(&["kot"], None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "kot");
    }

    #[test]
    fn test_cross_term_duplicates_are_kept() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);

        let results = engine.search(&["voda", "water"], None).unwrap();
        assert_eq!(ids(&results), vec![1, 1, 4]);
        let terms: Vec<_> = results.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, ["voda", "water", "water"]);
    }

    #[test]
    fn test_language_filter_after_match() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);
        let ru = LanguageFilter::new("ru");

        assert!(engine.search(&["fire"], Some(&ru)).unwrap().is_empty());
        assert_eq!(ids(&engine.search(&["fire"], None).unwrap()), vec![2]);
        assert_eq!(ids(&engine.search(&["water"], Some(&ru)).unwrap()), vec![1, 4]);

        let unknown = LanguageFilter::new("de");
        assert!(engine.search(&["water"], Some(&unknown)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);
        assert_eq!(engine.search(&[""], None).unwrap().len(), rows.len());
    }

    #[test]
    fn test_wildcard_characters_are_literal() {
        let schema = DictionarySchema::build(["isv", "en"]).unwrap();
        let mut rows = MemoryRows::new(schema);
        rows.push(cells(&["procent", "100%"]));
        rows.push(cells(&["snake_case", "word"]));
        rows.push(cells(&["abc", "a_c"]));
        let engine = SearchEngine::new(&rows);

        assert_eq!(ids(&engine.search(&["%"], None).unwrap()), vec![1]);
        assert_eq!(ids(&engine.search(&["_"], None).unwrap()), vec![2, 3]);
        assert!(engine.search(&["a%c"], None).unwrap().is_empty());
    }

    #[test]
    fn test_without_source_column() {
        let schema = DictionarySchema::build(["en", "ru"]).unwrap();
        let mut rows = MemoryRows::new(schema);
        rows.push(cells(&["water", "вода"]));
        let engine = SearchEngine::new(&rows);

        assert_eq!(engine.search(&["wat"], None).unwrap().len(), 1);
        assert!(engine.search(&["voda"], None).unwrap().is_empty());
    }

    #[test]
    fn test_entries_hide_shadow() {
        let rows = sample();
        let engine = SearchEngine::new(&rows);
        let results = engine.search(&["čaša"], None).unwrap();

        let entry = &results[0].entry;
        assert_eq!(entry.get("isv"), Some("čaša"));
        assert_eq!(entry.get("isv_normalized"), None);
        assert_eq!(entry.columns().collect::<Vec<_>>(), ["isv", "en", "ru"]);
    }
}
