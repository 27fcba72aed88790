// Post-match filters over dictionary entries
use crate::DictionaryEntry;

pub trait Filter {
    fn matches(&self, entry: &DictionaryEntry) -> bool;
}

/// Keeps entries that carry a translation in one language column.
///
/// The column name is lowercased on construction, matching how column
/// names are stored. A column the dataset does not have matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFilter {
    column: String,
}

impl LanguageFilter {
    pub fn new(column: impl AsRef<str>) -> Self {
        Self {
            column: column.as_ref().trim().to_lowercase(),
        }
    }

    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl Filter for LanguageFilter {
    fn matches(&self, entry: &DictionaryEntry) -> bool {
        entry.has_value(&self.column)
    }
}
