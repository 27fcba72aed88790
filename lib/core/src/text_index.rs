// Whole-word inverted index mirroring the dictionary's original columns
use crate::RowId;
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    // token -> rows containing it in any indexed column
    postings: AHashMap<String, BTreeSet<RowId>>,
    // rows seen by the index, including rows with no tokens
    docs: AHashSet<RowId>,
}

impl TextIndex {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize text for indexing and lookup.
    /// Lowercases and splits on whitespace and punctuation.
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Index one row from the values of its indexed columns.
    pub fn insert_doc<'a>(&mut self, row_id: RowId, values: impl IntoIterator<Item = &'a str>) {
        self.delete_doc(row_id);
        self.docs.insert(row_id);

        for value in values {
            for token in Self::tokenize(value) {
                self.postings.entry(token).or_default().insert(row_id);
            }
        }
    }

    pub fn delete_doc(&mut self, row_id: RowId) {
        if self.docs.remove(&row_id) {
            self.postings.retain(|_, rows| {
                rows.remove(&row_id);
                !rows.is_empty()
            });
        }
    }

    /// Rows containing every token of `word`, in row order.
    pub fn lookup(&self, word: &str) -> Vec<RowId> {
        let lists = Self::tokenize(word)
            .iter()
            .map(|token| {
                self.postings
                    .get(token)
                    .map(|rows| rows.iter().copied().collect())
                    .unwrap_or_default()
            })
            .collect();
        Self::intersect(lists)
    }

    /// Intersect posting lists, keeping the order of the first one.
    /// No lists means no match.
    pub fn intersect(lists: Vec<Vec<RowId>>) -> Vec<RowId> {
        let mut lists = lists.into_iter();
        let Some(first) = lists.next() else {
            return Vec::new();
        };

        lists.fold(first, |acc, list| {
            let keep: AHashSet<RowId> = list.into_iter().collect();
            acc.into_iter().filter(|id| keep.contains(id)).collect()
        })
    }

    /// Posting lists, for persisting the index.
    pub fn postings(&self) -> impl Iterator<Item = (&str, &BTreeSet<RowId>)> {
        self.postings.iter().map(|(t, rows)| (t.as_str(), rows))
    }

    #[inline]
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
