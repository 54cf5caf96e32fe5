//! Read access to archives of named entries
//!
//! The pipeline never cares where an archive came from. It only needs the
//! entry names in storage order and the bytes of a named entry, which is what
//! [`EntryArchive`] exposes. [`ZipEntryArchive`] backs it with a zip file (or
//! any seekable reader), [`MemoryArchive`] with an in-memory map.

use crate::error::{archive_cause, IngestError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_SIZE_HINT: u64 = 1 << 20;

/// An archive holding named entries
pub trait EntryArchive {
    /// Entry names in archive storage order, directories excluded
    fn entry_names(&self) -> &[String];

    /// Read the full contents of the entry called `name`
    ///
    /// Returns [`IngestError::EntryNotFound`] when there is no such entry.
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>>;
}

/// Zip-backed entry archive
pub struct ZipEntryArchive<R> {
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl ZipEntryArchive<BufReader<File>> {
    /// Open the zip file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |err| IngestError::ArchiveOpen {
            path: path.to_path_buf(),
            source: archive_cause(err),
        };

        let file = File::open(path).map_err(|e| open_error(ZipError::Io(e)))?;
        let archive = Self::new(BufReader::new(file)).map_err(open_error)?;

        debug!(
            path = %path.display(),
            entries = archive.names.len(),
            "Opened archive"
        );
        Ok(archive)
    }
}

impl<R: Read + Seek> ZipEntryArchive<R> {
    /// Read the central directory of a zip archive
    pub fn new(reader: R) -> zip::result::ZipResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut names = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            if file.is_dir() {
                continue;
            }
            names.push(file.name().to_string());
        }

        Ok(Self { archive, names })
    }
}

impl<R: Read + Seek> EntryArchive for ZipEntryArchive<R> {
    fn entry_names(&self) -> &[String] {
        &self.names
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry_error = |err| IngestError::ArchiveEntry {
            entry: name.to_string(),
            source: archive_cause(err),
        };

        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(IngestError::EntryNotFound(name.to_string()))
            },
            Err(err) => return Err(entry_error(err)),
        };

        // The declared size comes from the archive and is only a hint.
        let mut contents = Vec::with_capacity(file.size().min(MAX_SIZE_HINT) as usize);
        file.read_to_end(&mut contents)
            .map_err(|e| entry_error(ZipError::Io(e)))?;
        Ok(contents)
    }
}

/// Entry archive held entirely in memory
///
/// Entries keep their insertion order. Inserting an existing name replaces
/// its contents without moving it.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    names: Vec<String>,
    contents: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        let name = name.into();
        if self.contents.insert(name.clone(), contents.into()).is_none() {
            self.names.push(name);
        }
    }

    /// Builder-style [`MemoryArchive::insert`]
    pub fn with_entry(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }
}

impl EntryArchive for MemoryArchive {
    fn entry_names(&self) -> &[String] {
        &self.names
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.contents
            .get(name)
            .cloned()
            .ok_or_else(|| IngestError::EntryNotFound(name.to_string()))
    }
}
