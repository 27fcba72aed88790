//! CSV reading for dictionary sources.
//!
//! The first record is the header. Records may be shorter or longer than
//! the header; missing cells read as empty, extra cells are dropped.

use ahash::AHashMap;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use slovnik_core::{Error, Result};
use slovnik_schema::column_key;

/// One data record keyed by stored column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: AHashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Cell for `column`, `""` when the record has none.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Lazy iterator over the data records of a CSV source.
pub struct CsvRows<'a> {
    keys: Vec<String>,
    records: StringRecordsIntoIter<&'a [u8]>,
}

impl<'a> CsvRows<'a> {
    fn to_row(&self, record: &StringRecord) -> Row {
        self.keys
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }
}

impl<'a> Iterator for CsvRows<'a> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|record| self.to_row(&record))
                .map_err(|e| Error::Format(format!("Failed to read CSV record: {}", e))),
        )
    }
}

/// Split `data` into its raw header and a lazy record iterator.
///
/// The header is returned as written; callers build the schema from it.
/// Record errors, including invalid UTF-8, surface while iterating.
pub fn parse_csv(data: &[u8]) -> Result<(Vec<String>, CsvRows<'_>)> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(data);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Format(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();
    let keys = header.iter().map(|name| column_key(name)).collect();

    Ok((
        header,
        CsvRows {
            keys,
            records: reader.into_records(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let data = "ISV, EN ,ru\nvoda,water,вода\nogenj,fire,\n";
        let (header, rows) = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(header, ["ISV", " EN ", "ru"]);

        let rows: Vec<Row> = rows.collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("isv"), "voda");
        assert_eq!(rows[0].get("en"), "water");
        assert_eq!(rows[1].get("ru"), "");
    }

    #[test]
    fn test_ragged_records() {
        let data = "isv,en,ru\nvoda\nogenj,fire,огонь,extra\n";
        let (_, rows) = parse_csv(data.as_bytes()).unwrap();
        let rows: Vec<Row> = rows.collect::<Result<_>>().unwrap();

        assert_eq!(rows[0].get("en"), "");
        assert_eq!(rows[1].get("ru"), "огонь");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_quoted_cells() {
        let data = "isv,en\n\"voda, pitna\",\"drinking \"\"water\"\"\"\n";
        let (_, mut rows) = parse_csv(data.as_bytes()).unwrap();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get("isv"), "voda, pitna");
        assert_eq!(row.get("en"), "drinking \"water\"");
    }

    #[test]
    fn test_bom_stripped_from_key() {
        let data = "\u{feff}isv,en\nvoda,water\n";
        let (_, mut rows) = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.next().unwrap().unwrap().get("isv"), "voda");
    }

    #[test]
    fn test_invalid_utf8_record() {
        let mut data = b"isv,en\nvoda,water\n".to_vec();
        data.extend_from_slice(b"\xff\xfe,bad\n");
        let (_, rows) = parse_csv(&data).unwrap();

        let results: Vec<Result<Row>> = rows.collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Format(_))));
    }

    #[test]
    fn test_empty_input() {
        let (header, mut rows) = parse_csv(b"").unwrap();
        assert!(header.is_empty());
        assert!(rows.next().is_none());
    }
}
