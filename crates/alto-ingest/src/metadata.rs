//! alto2txt metadata extraction
//!
//! Each article in a metadata archive is a small XML document. Only ten
//! fields are of interest, each addressed as a `parent/child` pair:
//!
//! ```text
//! item        title, item_type, ocr_quality_mean, ocr_quality_sd,
//!             word_count, plain_text_file
//! issue       date
//! publication title, location, source
//! ```
//!
//! A field resolves to the first `child` element (document order) whose
//! direct parent is a `parent` element, wherever that pair sits in the tree.
//! Its value is the element's leading text. Missing or empty elements leave
//! the field absent; only a document that is not well-formed XML is an error.

use crate::archive::EntryArchive;
use crate::error::{IngestError, Result};
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::collections::HashMap;
use tracing::trace;

/// One of the fixed metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    ItemTitle,
    ItemType,
    OcrQualityMean,
    OcrQualitySd,
    WordCount,
    PlainTextFile,
    IssueDate,
    PublicationTitle,
    PublicationLocation,
    PublicationSource,
}

impl MetadataField {
    /// Every field, in output order
    pub const ALL: [MetadataField; 10] = [
        MetadataField::ItemTitle,
        MetadataField::ItemType,
        MetadataField::OcrQualityMean,
        MetadataField::OcrQualitySd,
        MetadataField::WordCount,
        MetadataField::PlainTextFile,
        MetadataField::IssueDate,
        MetadataField::PublicationTitle,
        MetadataField::PublicationLocation,
        MetadataField::PublicationSource,
    ];

    /// Name of the parent element
    pub fn parent(self) -> &'static str {
        match self {
            MetadataField::ItemTitle
            | MetadataField::ItemType
            | MetadataField::OcrQualityMean
            | MetadataField::OcrQualitySd
            | MetadataField::WordCount
            | MetadataField::PlainTextFile => "item",
            MetadataField::IssueDate => "issue",
            MetadataField::PublicationTitle
            | MetadataField::PublicationLocation
            | MetadataField::PublicationSource => "publication",
        }
    }

    /// Name of the child element holding the value
    pub fn child(self) -> &'static str {
        match self {
            MetadataField::ItemTitle | MetadataField::PublicationTitle => "title",
            MetadataField::ItemType => "item_type",
            MetadataField::OcrQualityMean => "ocr_quality_mean",
            MetadataField::OcrQualitySd => "ocr_quality_sd",
            MetadataField::WordCount => "word_count",
            MetadataField::PlainTextFile => "plain_text_file",
            MetadataField::IssueDate => "date",
            MetadataField::PublicationLocation => "location",
            MetadataField::PublicationSource => "source",
        }
    }

    /// Fully-qualified key, e.g. `publication/title`
    pub fn key(self) -> String {
        format!("{}/{}", self.parent(), self.child())
    }

    fn matches(self, parent: Option<&[u8]>, name: &[u8]) -> bool {
        parent == Some(self.parent().as_bytes()) && name == self.child().as_bytes()
    }
}

/// Metadata fields of one article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    values: [Option<String>; MetadataField::ALL.len()],
}

impl MetadataRecord {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.values[field as usize].as_deref()
    }

    pub fn set(&mut self, field: MetadataField, value: Option<String>) {
        self.values[field as usize] = value;
    }

    /// Fields with their values, in output order
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, Option<&str>)> + '_ {
        MetadataField::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    /// Number of fields that resolved to a value
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Element whose leading text is being collected
struct Capture {
    field: MetadataField,
    depth: usize,
    text: String,
    sealed: bool,
}

/// Currently open element
struct OpenElement {
    local_name: Vec<u8>,
    /// Not in any namespace
    unbound: bool,
}

/// Read and parse the metadata entry `entry_name`
pub fn extract_record(
    archive: &mut dyn EntryArchive,
    entry_name: &str,
) -> Result<MetadataRecord> {
    let xml = archive.read_entry(entry_name)?;
    let record = parse_metadata(entry_name, &xml)?;

    trace!(
        entry = entry_name,
        present = record.present_count(),
        "Extracted metadata"
    );
    Ok(record)
}

/// Parse one metadata document
///
/// Field elements must not be in a namespace. General entities declared in
/// the internal DTD subset are expanded.
///
/// `entry_name` is only used to label errors.
pub fn parse_metadata(entry_name: &str, xml: &[u8]) -> Result<MetadataRecord> {
    let malformed = |reason: &dyn std::fmt::Display| IngestError::malformed_xml(entry_name, reason);

    let mut reader = NsReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut entities: HashMap<String, String> = HashMap::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut found = [false; MetadataField::ALL.len()];
    let mut captures: Vec<Capture> = Vec::new();
    let mut record = MetadataRecord::default();
    let mut seen_root = false;

    loop {
        buf.clear();
        let (namespace, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| malformed(&e))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if seen_root && stack.is_empty() {
                    return Err(malformed(&"content after the root element"));
                }
                for attr in e.attributes() {
                    attr.map_err(|e| malformed(&e))?;
                }

                let is_empty = matches!(event, Event::Empty(_));
                let local_name = e.local_name().as_ref().to_vec();
                let unbound = matches!(namespace, ResolveResult::Unbound);
                let depth = stack.len();
                seen_root = true;

                // A child element ends the leading text of its parent.
                seal_captures(&mut captures, depth);

                let parent = stack
                    .last()
                    .filter(|p| p.unbound)
                    .map(|p| p.local_name.as_slice());
                for field in MetadataField::ALL {
                    if !unbound || found[field as usize] || !field.matches(parent, &local_name) {
                        continue;
                    }
                    found[field as usize] = true;
                    if !is_empty {
                        captures.push(Capture {
                            field,
                            depth: depth + 1,
                            text: String::new(),
                            sealed: false,
                        });
                    }
                }

                if !is_empty {
                    stack.push(OpenElement { local_name, unbound });
                }
            },
            Event::End(_) => {
                let depth = stack.len();
                captures.retain_mut(|capture| {
                    if capture.depth != depth {
                        return true;
                    }
                    let text = std::mem::take(&mut capture.text);
                    record.set(capture.field, (!text.is_empty()).then_some(text));
                    false
                });
                stack.pop();
            },
            Event::Text(ref t) => {
                // Unescape even when nothing is captured so bad entities fail the document.
                let text = t
                    .unescape_with(|name| entities.get(name).map(String::as_str))
                    .map_err(|e| malformed(&e))?;
                if stack.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(malformed(&"text outside the root element"));
                    }
                    continue;
                }
                append_leading_text(&mut captures, stack.len(), &text);
            },
            Event::CData(ref c) => {
                if stack.is_empty() {
                    return Err(malformed(&"CDATA outside the root element"));
                }
                let text = std::str::from_utf8(c).map_err(|e| malformed(&e))?;
                append_leading_text(&mut captures, stack.len(), text);
            },
            Event::DocType(ref d) => {
                if seen_root {
                    return Err(malformed(&"DOCTYPE after the root element"));
                }
                let doctype = std::str::from_utf8(d).map_err(|e| malformed(&e))?;
                // The first declaration of a name is binding.
                for (name, value) in internal_entities(doctype) {
                    let value = unescape(value).map_err(|e| malformed(&e))?.into_owned();
                    entities.entry(name.to_string()).or_insert(value);
                }
            },
            Event::Comment(_) | Event::PI(_) => seal_captures(&mut captures, stack.len()),
            Event::Eof => break,
            _ => {},
        }
    }

    if !seen_root {
        return Err(malformed(&"document has no root element"));
    }
    if let Some(open) = stack.last() {
        return Err(malformed(&format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(&open.local_name)
        )));
    }

    Ok(record)
}

fn seal_captures(captures: &mut [Capture], depth: usize) {
    for capture in captures.iter_mut().filter(|c| c.depth == depth) {
        capture.sealed = true;
    }
}

fn append_leading_text(captures: &mut [Capture], depth: usize, text: &str) {
    for capture in captures.iter_mut().filter(|c| c.depth == depth && !c.sealed) {
        capture.text.push_str(text);
    }
}

/// Internal general entities of a DOCTYPE declaration, as `(name, literal value)`
///
/// Parameter entities and external entities are skipped.
fn internal_entities(doctype: &str) -> Vec<(&str, &str)> {
    const DECL: &str = "<!ENTITY";
    let mut entities = Vec::new();
    let mut rest = doctype;

    while let Some(start) = rest.find(DECL) {
        rest = rest[start + DECL.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_end);
        let tail = tail.trim_start();
        let Some(quote) = tail.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(end) = tail[1..].find(quote) else {
            break;
        };

        entities.push((name, &tail[1..1 + end]));
        rest = &tail[1 + end..];
    }

    entities
}
