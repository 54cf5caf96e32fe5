//! Flattening a corpus into a table
//!
//! Rows are articles, indexed by metadata entry name. Every metadata field
//! maps straight to its final column name through [`COLUMN_MAPPING`], so the
//! item title and the publication title can never end up under the same
//! name. Derived columns are appended after the extracted ones.

use crate::corpus::Corpus;
use crate::derive::DerivedFields;
use crate::metadata::MetadataField;
use tracing::debug;

/// Header of the index column
pub const INDEX_HEADER: &str = "";

/// Final column name of every metadata field, in output order
pub const COLUMN_MAPPING: [(MetadataField, &str); 10] = [
    (MetadataField::ItemTitle, "article_headline"),
    (MetadataField::ItemType, "item_type"),
    (MetadataField::OcrQualityMean, "ocr_quality_mean"),
    (MetadataField::OcrQualitySd, "ocr_quality_sd"),
    (MetadataField::WordCount, "word_count"),
    (MetadataField::PlainTextFile, "plain_text_file"),
    (MetadataField::IssueDate, "date"),
    (MetadataField::PublicationTitle, "newspaper_title"),
    (MetadataField::PublicationLocation, "location"),
    (MetadataField::PublicationSource, "source"),
];

/// Plain-text column, present only when text was requested
pub const TEXT_COLUMN: &str = "text";

/// Derived columns, in output order
pub const DERIVED_COLUMNS: [&str; 6] = ["year", "month", "day", "NLP", "issue", "art_num"];

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Metadata entry name
    pub index: String,
    /// Cell values, aligned with [`Table::columns`]
    pub values: Vec<Option<String>>,
}

/// Flattened corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Data column names, without the index column
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of row `row` in column `column`, `None` when absent or unknown
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let pos = self.column_position(column)?;
        self.rows.get(row)?.values.get(pos)?.as_deref()
    }
}

/// Data column names of a table, with or without the text column
pub fn table_columns(include_text: bool) -> Vec<String> {
    let mut columns: Vec<String> = COLUMN_MAPPING
        .iter()
        .map(|(_, name)| name.to_string())
        .collect();
    if include_text {
        columns.push(TEXT_COLUMN.to_string());
    }
    columns.extend(DERIVED_COLUMNS.iter().map(|c| c.to_string()));
    columns
}

/// Build the output table of a corpus, derived columns included
pub fn build_table(corpus: &Corpus) -> Table {
    let include_text = corpus.includes_text();
    let columns = table_columns(include_text);

    let rows = corpus
        .records()
        .iter()
        .map(|record| {
            let mut values: Vec<Option<String>> = Vec::with_capacity(columns.len());
            values.extend(
                COLUMN_MAPPING
                    .iter()
                    .map(|(field, _)| record.metadata.get(*field).map(str::to_string)),
            );
            if include_text {
                values.push(record.text.clone());
            }

            let DerivedFields { date, text_file } = DerivedFields::from_metadata(&record.metadata);
            values.extend([
                date.year,
                date.month,
                date.day,
                text_file.nlp,
                text_file.issue,
                text_file.art_num,
            ]);

            Row {
                index: record.entry_name.clone(),
                values,
            }
        })
        .collect::<Vec<_>>();

    debug!(rows = rows.len(), columns = columns.len(), "Built table");
    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ArticleRecord;
    use crate::metadata::MetadataRecord;

    fn record(entry: &str, text: Option<&str>) -> ArticleRecord {
        let mut metadata = MetadataRecord::default();
        metadata.set(MetadataField::ItemTitle, Some("A Headline".to_string()));
        metadata.set(MetadataField::PublicationTitle, Some("The Gazette".to_string()));
        metadata.set(MetadataField::IssueDate, Some("1850-03-15".to_string()));
        metadata.set(
            MetadataField::PlainTextFile,
            Some("ABC_issueXYZ0001_art0007.txt".to_string()),
        );
        let mut record = ArticleRecord::new(entry, metadata);
        record.text = text.map(str::to_string);
        record
    }

    #[test]
    fn test_columns_with_text() {
        let columns = table_columns(true);
        assert_eq!(
            columns,
            vec![
                "article_headline",
                "item_type",
                "ocr_quality_mean",
                "ocr_quality_sd",
                "word_count",
                "plain_text_file",
                "date",
                "newspaper_title",
                "location",
                "source",
                "text",
                "year",
                "month",
                "day",
                "NLP",
                "issue",
                "art_num",
            ]
        );
    }

    #[test]
    fn test_columns_without_text() {
        let columns = table_columns(false);
        assert_eq!(columns.len(), 16);
        assert!(!columns.iter().any(|c| c == TEXT_COLUMN));
    }

    #[test]
    fn test_titles_do_not_collide() {
        let mut corpus = Corpus::new(false);
        corpus.insert(record("a_metadata.xml", None));

        let table = build_table(&corpus);
        assert_eq!(table.value(0, "article_headline"), Some("A Headline"));
        assert_eq!(table.value(0, "newspaper_title"), Some("The Gazette"));
        assert_eq!(table.column_position("title"), None);
    }

    #[test]
    fn test_derived_columns() {
        let mut corpus = Corpus::new(false);
        corpus.insert(record("a_metadata.xml", None));

        let table = build_table(&corpus);
        assert_eq!(table.value(0, "year"), Some("1850"));
        assert_eq!(table.value(0, "month"), Some("03"));
        assert_eq!(table.value(0, "day"), Some("15"));
        assert_eq!(table.value(0, "NLP"), Some("ABC"));
        assert_eq!(table.value(0, "issue"), Some("XYZ0001"));
        assert_eq!(table.value(0, "art_num"), Some("0007"));
    }

    #[test]
    fn test_absent_sources_leave_derived_cells_empty() {
        let mut corpus = Corpus::new(false);
        corpus.insert(ArticleRecord::new("a_metadata.xml", MetadataRecord::default()));

        let table = build_table(&corpus);
        for column in DERIVED_COLUMNS {
            assert_eq!(table.value(0, column), None, "column {}", column);
        }
        assert_eq!(table.rows()[0].values.len(), table.columns().len());
    }

    #[test]
    fn test_text_column_and_row_order() {
        let mut corpus = Corpus::new(true);
        corpus.insert(record("b_metadata.xml", Some("second")));
        corpus.insert(record("a_metadata.xml", Some("first")));

        let table = build_table(&corpus);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].index, "b_metadata.xml");
        assert_eq!(table.value(0, "text"), Some("second"));
        assert_eq!(table.value(1, "text"), Some("first"));
    }

    #[test]
    fn test_empty_corpus_keeps_columns() {
        let table = build_table(&Corpus::new(true));
        assert!(table.is_empty());
        assert_eq!(table.columns(), table_columns(true).as_slice());
    }
}
