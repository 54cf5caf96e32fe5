//! Locating the archive pair of a collection
//!
//! alto2txt output for a newspaper title `ID` is laid out as
//!
//! ```text
//! {data_dir}/metadata/{ID}_metadata.zip
//! {data_dir}/plaintext/{ID}_plaintext.zip
//! ```

use crate::archive::ZipEntryArchive;
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory of metadata archives below the data directory
pub const METADATA_DIR: &str = "metadata";

/// Directory of plain-text archives below the data directory
pub const PLAINTEXT_DIR: &str = "plaintext";

const METADATA_ARCHIVE_SUFFIX: &str = "_metadata.zip";
const PLAINTEXT_ARCHIVE_SUFFIX: &str = "_plaintext.zip";

/// Zip archive read from disk
pub type FileArchive = ZipEntryArchive<BufReader<File>>;

/// Archive locations of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: String,
    pub metadata_archive: PathBuf,
    pub plaintext_archive: PathBuf,
}

impl Collection {
    /// Archive paths of collection `id` under `data_dir`
    pub fn locate(data_dir: &Path, id: &str) -> Self {
        Self {
            id: id.to_string(),
            metadata_archive: data_dir
                .join(METADATA_DIR)
                .join(format!("{}{}", id, METADATA_ARCHIVE_SUFFIX)),
            plaintext_archive: data_dir
                .join(PLAINTEXT_DIR)
                .join(format!("{}{}", id, PLAINTEXT_ARCHIVE_SUFFIX)),
        }
    }

    pub fn open_metadata(&self) -> Result<FileArchive> {
        ZipEntryArchive::open(&self.metadata_archive)
    }

    pub fn open_plaintext(&self) -> Result<FileArchive> {
        ZipEntryArchive::open(&self.plaintext_archive)
    }
}

/// Ids of all collections with a metadata archive under `data_dir`, sorted
pub fn list_collections(data_dir: &Path) -> Result<Vec<String>> {
    let metadata_dir = data_dir.join(METADATA_DIR);
    let mut ids = Vec::new();

    for entry in std::fs::read_dir(&metadata_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(id) = name
            .to_str()
            .and_then(|n| n.strip_suffix(METADATA_ARCHIVE_SUFFIX))
            .filter(|id| !id.is_empty())
        {
            ids.push(id.to_string());
        }
    }

    ids.sort();
    debug!(dir = %metadata_dir.display(), collections = ids.len(), "Listed collections");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;

    #[test]
    fn test_locate() {
        let collection = Collection::locate(Path::new("/data"), "0002645");
        assert_eq!(
            collection.metadata_archive,
            PathBuf::from("/data/metadata/0002645_metadata.zip")
        );
        assert_eq!(
            collection.plaintext_archive,
            PathBuf::from("/data/plaintext/0002645_plaintext.zip")
        );
    }

    #[test]
    fn test_list_collections() {
        let dir = tempfile::tempdir().unwrap();
        let metadata_dir = dir.path().join(METADATA_DIR);
        std::fs::create_dir_all(metadata_dir.join("nested_metadata.zip")).unwrap();
        for name in ["0002647_metadata.zip", "0002645_metadata.zip", "notes.txt", "_metadata.zip"] {
            std::fs::write(metadata_dir.join(name), b"").unwrap();
        }

        let ids = list_collections(dir.path()).unwrap();
        assert_eq!(ids, vec!["0002645", "0002647"]);
    }

    #[test]
    fn test_list_collections_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(list_collections(dir.path()), Err(IngestError::Io(_))));
    }

    #[test]
    fn test_open_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::locate(dir.path(), "0002645");

        match collection.open_metadata() {
            Err(IngestError::ArchiveOpen { path, .. }) => {
                assert_eq!(path, collection.metadata_archive)
            },
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("opening a missing archive succeeded"),
        }
    }
}
