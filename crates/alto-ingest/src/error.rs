//! Error types for ALTO ingestion
//!
//! Field-level absence is never an error: a missing metadata element simply
//! becomes an empty cell. Everything in here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Underlying cause of an archive failure
pub type ArchiveCause = Box<dyn std::error::Error + Send + Sync>;

/// Fatal ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// An archive file could not be opened or is not a valid zip archive
    #[error("Cannot open archive '{}'", path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: ArchiveCause,
    },

    /// A named entry could not be read from an opened archive
    #[error("Cannot read archive entry '{entry}'")]
    ArchiveEntry {
        entry: String,
        #[source]
        source: ArchiveCause,
    },

    /// No plain-text entry matches a metadata entry
    #[error(
        "Plain-text entry '{text_entry}' for metadata entry '{metadata_entry}' not found. \
         The metadata and plain-text archives do not belong together."
    )]
    TextEntryNotFound {
        metadata_entry: String,
        text_entry: String,
    },

    /// A plain-text entry is not valid UTF-8
    #[error("Plain-text entry '{entry}' is not valid UTF-8")]
    InvalidText {
        entry: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A metadata entry is not well-formed XML
    #[error("Metadata entry '{entry}' is not well-formed XML: {reason}")]
    MalformedXml { entry: String, reason: String },

    /// An entry name was requested that the archive does not contain
    #[error("Entry '{0}' not found in archive")]
    EntryNotFound(String),

    /// Writing the flattened table failed
    #[error("Failed to write CSV output")]
    Csv(#[from] csv::Error),

    /// File system operation failed
    #[error("File operation failed (check file permissions and disk space)")]
    Io(#[from] std::io::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    /// Create a malformed XML error
    pub fn malformed_xml(entry: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedXml {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Unwrap zip I/O errors so the OS error is reported once
pub(crate) fn archive_cause(err: zip::result::ZipError) -> ArchiveCause {
    match err {
        zip::result::ZipError::Io(io) => Box::new(io),
        other => Box::new(other),
    }
}
