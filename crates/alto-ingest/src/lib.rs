//! ALTO Ingest Library
//!
//! Flattens alto2txt newspaper output into one CSV file per collection.
//!
//! A collection is a pair of zip archives: one with an XML metadata document
//! per article, one with the article's plain text. The pipeline is a chain of
//! plain functions over explicit archive handles:
//!
//! 1. [`corpus::enumerate_entries`] lists the metadata entries
//! 2. [`metadata::extract_record`] pulls the fixed fields out of each document
//! 3. [`corpus::attach_text`] joins the matching plain text
//! 4. [`table::build_table`] flattens everything and adds derived columns
//! 5. [`export::serialize`] writes the delimited file
//!
//! [`convert::convert_collection`] runs all of it for a collection on disk.
//!
//! # Example
//!
//! ```no_run
//! use alto_ingest::archive::MemoryArchive;
//! use alto_ingest::corpus::process_corpus;
//! use alto_ingest::table::build_table;
//!
//! fn main() -> alto_ingest::Result<()> {
//!     let mut metadata = MemoryArchive::new().with_entry(
//!         "0002645/0002645_18150103_art0001_metadata.xml",
//!         "<lwm><issue><date>1815-01-03</date></issue></lwm>",
//!     );
//!
//!     let corpus = process_corpus(&mut metadata, None, |_| {})?;
//!     let table = build_table(&corpus);
//!     assert_eq!(table.value(0, "year"), Some("1815"));
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod collection;
pub mod config;
pub mod convert;
pub mod corpus;
pub mod derive;
pub mod error;
pub mod export;
pub mod metadata;
pub mod progress;
pub mod table;

pub use error::{IngestError, Result};
