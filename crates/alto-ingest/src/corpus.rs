//! Joining metadata entries with their plain-text bodies
//!
//! A collection is stored as two archives. Metadata entries look like
//! `0002645/1815/0103/0002645_18150103_art0001_metadata.xml` and the matching
//! plain-text entry is the same path without `_metadata`, ending in `.txt`.

use crate::archive::EntryArchive;
use crate::error::{IngestError, Result};
use crate::metadata::{extract_record, MetadataRecord};
use std::collections::HashMap;
use tracing::{debug, info};

/// Suffix of metadata entries taking part in a conversion
pub const METADATA_SUFFIX: &str = ".xml";

/// Token closing the stem of a metadata entry name
pub const METADATA_TOKEN: &str = "_metadata";

/// Suffix of plain-text entries
pub const TEXT_SUFFIX: &str = ".txt";

/// One article: its metadata and, when requested, its plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Name of the metadata entry the record was read from
    pub entry_name: String,
    pub metadata: MetadataRecord,
    pub text: Option<String>,
}

impl ArticleRecord {
    pub fn new(entry_name: impl Into<String>, metadata: MetadataRecord) -> Self {
        Self {
            entry_name: entry_name.into(),
            metadata,
            text: None,
        }
    }
}

/// All articles of a collection, in archive order, unique by entry name
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<ArticleRecord>,
    positions: HashMap<String, usize>,
    include_text: bool,
}

impl Corpus {
    pub fn new(include_text: bool) -> Self {
        Self {
            include_text,
            ..Self::default()
        }
    }

    /// Add a record; a record with the same entry name is replaced in place
    pub fn insert(&mut self, record: ArticleRecord) {
        match self.positions.get(&record.entry_name) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.positions
                    .insert(record.entry_name.clone(), self.records.len());
                self.records.push(record);
            },
        }
    }

    pub fn get(&self, entry_name: &str) -> Option<&ArticleRecord> {
        self.positions.get(entry_name).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether plain text was requested for this corpus
    pub fn includes_text(&self) -> bool {
        self.include_text
    }
}

/// Metadata entry names of `archive`, in storage order
///
/// Each call starts a fresh pass over the archive.
pub fn enumerate_entries(archive: &dyn EntryArchive) -> impl Iterator<Item = &str> + '_ {
    archive
        .entry_names()
        .iter()
        .map(String::as_str)
        .filter(|name| name.ends_with(METADATA_SUFFIX))
}

/// Plain-text entry name belonging to a metadata entry name
///
/// Strips a trailing `.xml`, then a trailing `_metadata`, and appends `.txt`.
pub fn text_entry_name(entry_name: &str) -> String {
    let stem = entry_name
        .strip_suffix(METADATA_SUFFIX)
        .unwrap_or(entry_name);
    let stem = stem.strip_suffix(METADATA_TOKEN).unwrap_or(stem);
    format!("{}{}", stem, TEXT_SUFFIX)
}

/// Load the plain text of `record` from `text_archive`
///
/// A missing text entry means the two archives do not match and is fatal.
pub fn attach_text(record: &mut ArticleRecord, text_archive: &mut dyn EntryArchive) -> Result<()> {
    let text_entry = text_entry_name(&record.entry_name);

    let bytes = text_archive.read_entry(&text_entry).map_err(|e| match e {
        IngestError::EntryNotFound(_) => IngestError::TextEntryNotFound {
            metadata_entry: record.entry_name.clone(),
            text_entry: text_entry.clone(),
        },
        other => other,
    })?;

    let text = String::from_utf8(bytes).map_err(|source| IngestError::InvalidText {
        entry: text_entry,
        source,
    })?;

    record.text = Some(text);
    Ok(())
}

/// Extract every metadata entry and, when `text_archive` is given, its text
///
/// `on_entry` is called with each entry name once that entry is done; the
/// CLI uses it to drive a progress bar.
pub fn process_corpus(
    metadata_archive: &mut dyn EntryArchive,
    mut text_archive: Option<&mut dyn EntryArchive>,
    mut on_entry: impl FnMut(&str),
) -> Result<Corpus> {
    let entries: Vec<String> = enumerate_entries(metadata_archive)
        .map(str::to_owned)
        .collect();
    let mut corpus = Corpus::new(text_archive.is_some());

    debug!(
        entries = entries.len(),
        include_text = corpus.includes_text(),
        "Processing metadata entries"
    );

    for entry_name in entries {
        let metadata = extract_record(metadata_archive, &entry_name)?;
        let mut record = ArticleRecord::new(entry_name, metadata);

        if let Some(text_archive) = text_archive.as_deref_mut() {
            attach_text(&mut record, text_archive)?;
        }

        on_entry(&record.entry_name);
        corpus.insert(record);
    }

    info!(
        records = corpus.len(),
        include_text = corpus.includes_text(),
        "Processed corpus"
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::metadata::MetadataField;

    fn article_xml(title: &str, text_file: &str) -> String {
        format!(
            "<lwm><publication><title>Gazette</title><issue><date>1850-03-15</date>\
             <item><title>{}</title><plain_text_file>{}</plain_text_file></item>\
             </issue></publication></lwm>",
            title, text_file
        )
    }

    fn archives() -> (MemoryArchive, MemoryArchive) {
        let metadata = MemoryArchive::new()
            .with_entry(
                "0002645/0002645_18500315_art0001_metadata.xml",
                article_xml("One", "0002645_18500315_art0001.txt"),
            )
            .with_entry("0002645/notes.txt", "not metadata")
            .with_entry(
                "0002645/0002645_18500315_art0002_metadata.xml",
                article_xml("Two", "0002645_18500315_art0002.txt"),
            );
        let text = MemoryArchive::new()
            .with_entry("0002645/0002645_18500315_art0001.txt", "First article body")
            .with_entry("0002645/0002645_18500315_art0002.txt", "Second article body");
        (metadata, text)
    }

    #[test]
    fn test_text_entry_name() {
        assert_eq!(
            text_entry_name("0002645/1815/0103/0002645_18150103_art0001_metadata.xml"),
            "0002645/1815/0103/0002645_18150103_art0001.txt"
        );
        assert_eq!(text_entry_name("a.xml"), "a.txt");
        // Only the exact token is removed, not every trailing letter of it.
        assert_eq!(text_entry_name("metadata_metadata.xml"), "metadata.txt");
        assert_eq!(text_entry_name("data.xml"), "data.txt");
    }

    #[test]
    fn test_enumerate_entries_filters_and_restarts() {
        let (metadata, _) = archives();

        let first: Vec<&str> = enumerate_entries(&metadata).collect();
        let second: Vec<&str> = enumerate_entries(&metadata).collect();

        assert_eq!(
            first,
            vec![
                "0002645/0002645_18500315_art0001_metadata.xml",
                "0002645/0002645_18500315_art0002_metadata.xml",
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_enumerate_empty_archive() {
        let archive = MemoryArchive::new();
        assert_eq!(enumerate_entries(&archive).count(), 0);
    }

    #[test]
    fn test_process_corpus_with_text() {
        let (mut metadata, mut text) = archives();
        let mut seen = Vec::new();

        let corpus = process_corpus(&mut metadata, Some(&mut text), |name| {
            seen.push(name.to_string())
        })
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert!(corpus.includes_text());
        assert_eq!(seen.len(), 2);

        let first = &corpus.records()[0];
        assert_eq!(first.metadata.get(MetadataField::ItemTitle), Some("One"));
        assert_eq!(first.text.as_deref(), Some("First article body"));
        assert_eq!(
            corpus
                .get("0002645/0002645_18500315_art0002_metadata.xml")
                .and_then(|r| r.text.as_deref()),
            Some("Second article body")
        );
    }

    #[test]
    fn test_process_corpus_without_text() {
        let (mut metadata, _) = archives();

        let corpus = process_corpus(&mut metadata, None, |_| {}).unwrap();

        assert_eq!(corpus.len(), 2);
        assert!(!corpus.includes_text());
        assert!(corpus.records().iter().all(|r| r.text.is_none()));
    }

    #[test]
    fn test_missing_text_entry_aborts() {
        let (mut metadata, _) = archives();
        let mut text = MemoryArchive::new()
            .with_entry("0002645/0002645_18500315_art0001.txt", "only the first");

        let err = process_corpus(&mut metadata, Some(&mut text), |_| {}).unwrap_err();
        match err {
            IngestError::TextEntryNotFound { metadata_entry, text_entry } => {
                assert_eq!(metadata_entry, "0002645/0002645_18500315_art0002_metadata.xml");
                assert_eq!(text_entry, "0002645/0002645_18500315_art0002.txt");
            },
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_text_aborts() {
        let mut record = ArticleRecord::new("a_metadata.xml", MetadataRecord::default());
        let mut text = MemoryArchive::new().with_entry("a.txt", vec![0xff, 0xfe, 0x00]);

        assert!(matches!(
            attach_text(&mut record, &mut text),
            Err(IngestError::InvalidText { .. })
        ));
        assert!(record.text.is_none());
    }

    #[test]
    fn test_malformed_metadata_aborts() {
        let mut metadata = MemoryArchive::new().with_entry("a_metadata.xml", "<lwm><item>");

        assert!(matches!(
            process_corpus(&mut metadata, None, |_| {}),
            Err(IngestError::MalformedXml { .. })
        ));
    }

    #[test]
    fn test_corpus_insert_replaces_duplicate() {
        let mut corpus = Corpus::new(false);
        let mut first = MetadataRecord::default();
        first.set(MetadataField::ItemTitle, Some("old".to_string()));
        let mut second = MetadataRecord::default();
        second.set(MetadataField::ItemTitle, Some("new".to_string()));

        corpus.insert(ArticleRecord::new("a.xml", first));
        corpus.insert(ArticleRecord::new("b.xml", MetadataRecord::default()));
        corpus.insert(ArticleRecord::new("a.xml", second));

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].entry_name, "a.xml");
        assert_eq!(
            corpus.records()[0].metadata.get(MetadataField::ItemTitle),
            Some("new")
        );
    }
}
