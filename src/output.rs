//! Terminal and JSON rendering of search results and cache info.

use ahash::AHashMap;
use slovnik_core::{DictionaryEntry, SearchResult};
use slovnik_storage::CacheDescription;
use std::io::{self, Write};

/// Column names that hold the Interslavic headword, in lookup order.
const HEADWORD_COLUMNS: [&str; 4] = ["isv", "interslavic", "slovianto", "medžuslovjansky"];

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "match"
    } else {
        "matches"
    }
}

/// One entry as `[ISV] headword` followed by `  COL: value` lines for the
/// other non-empty columns.
pub fn format_entry(entry: &DictionaryEntry) -> String {
    let mut lines = Vec::new();

    let headword = HEADWORD_COLUMNS
        .iter()
        .filter_map(|column| entry.get(column))
        .find(|value| !value.is_empty());
    if let Some(headword) = headword {
        lines.push(format!("[ISV] {}", headword));
    }

    for (column, value) in entry.iter() {
        if HEADWORD_COLUMNS.contains(&column) || value.is_empty() {
            continue;
        }
        lines.push(format!("  {}: {}", column.to_uppercase(), value));
    }

    lines.join("\n")
}

/// Results grouped by the term that matched them, terms in first-seen order.
pub fn group_by_term(results: &[SearchResult]) -> Vec<(&str, Vec<&DictionaryEntry>)> {
    let mut groups: Vec<(&str, Vec<&DictionaryEntry>)> = Vec::new();
    let mut positions: AHashMap<&str, usize> = AHashMap::new();

    for result in results {
        let position = *positions.entry(result.term.as_str()).or_insert_with(|| {
            groups.push((result.term.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(&result.entry);
    }
    groups
}

pub fn render_results<W: Write>(out: &mut W, results: &[SearchResult]) -> io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "No matches found.");
    }

    for (term, entries) in group_by_term(results) {
        writeln!(
            out,
            "\n=== Results for \"{}\" ({} {}) ===\n",
            term,
            entries.len(),
            plural(entries.len())
        )?;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", format_entry(entry))?;
        }
    }

    writeln!(out, "\nTotal: {} {}", results.len(), plural(results.len()))
}

/// Results as a pretty-printed JSON array of column-to-value objects.
pub fn render_json<W: Write>(out: &mut W, results: &[SearchResult]) -> serde_json::Result<()> {
    let entries: Vec<&DictionaryEntry> = results.iter().map(|r| &r.entry).collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn render_info<W: Write>(out: &mut W, description: Option<&CacheDescription>) -> io::Result<()> {
    let Some(description) = description else {
        return writeln!(out, "No dictionary cache found. Run with --refresh to download.");
    };
    let metadata = &description.metadata;

    writeln!(out, "Interslavic Dictionary Cache Info")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "Last downloaded: {}", metadata.last_load.to_rfc3339())?;
    writeln!(out, "Source: {}", metadata.source)?;
    writeln!(out, "Entries: {}", metadata.row_count)?;
    writeln!(out, "Columns: {}", metadata.columns.join(", "))?;
    writeln!(out, "Schema version: {}", metadata.schema_version)?;
    write!(out, "Cache location: {}", description.store_path.display())?;
    if !description.store_present {
        write!(out, " (missing)")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, fields: &[(&str, &str)]) -> DictionaryEntry {
        DictionaryEntry::new(
            id,
            fields.iter().map(|(c, v)| (c.to_string(), v.to_string())).collect(),
        )
    }

    fn render(results: &[SearchResult]) -> String {
        let mut out = Vec::new();
        render_results(&mut out, results).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_entry() {
        let e = entry(1, &[("isv", "voda"), ("en", "water"), ("ru", "вода"), ("pl", "")]);
        assert_eq!(format_entry(&e), "[ISV] voda\n  EN: water\n  RU: вода");
    }

    #[test]
    fn test_format_entry_without_headword() {
        let e = entry(1, &[("isv", ""), ("en", "fire")]);
        assert_eq!(format_entry(&e), "  EN: fire");
    }

    #[test]
    fn test_render_grouped() {
        let results = vec![
            SearchResult::new(entry(1, &[("isv", "voda"), ("en", "water")]), "voda"),
            SearchResult::new(entry(1, &[("isv", "voda"), ("en", "water")]), "water"),
            SearchResult::new(entry(4, &[("isv", "vodopad"), ("en", "waterfall")]), "water"),
        ];

        let expected = "\n=== Results for \"voda\" (1 match) ===\n\n\
                        [ISV] voda\n  EN: water\n\
                        \n=== Results for \"water\" (2 matches) ===\n\n\
                        [ISV] voda\n  EN: water\n\n\
                        [ISV] vodopad\n  EN: waterfall\n\
                        \nTotal: 3 matches\n";
        assert_eq!(render(&results), expected);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "No matches found.\n");
    }

    #[test]
    fn test_render_json_drops_term() {
        let results = vec![SearchResult::new(entry(3, &[("isv", "čaša"), ("en", "cup")]), "casa")];
        let mut out = Vec::new();
        render_json(&mut out, &results).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("čaša"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!([{"isv": "čaša", "en": "cup"}]));
    }

    #[test]
    fn test_render_no_info() {
        let mut out = Vec::new();
        render_info(&mut out, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No dictionary cache found. Run with --refresh to download.\n"
        );
    }
}
