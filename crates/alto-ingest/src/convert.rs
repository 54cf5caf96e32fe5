//! End-to-end conversion of one collection
//!
//! Opens the archive pair, extracts every article, flattens the corpus and
//! writes `{output_dir}/{collection_id}.csv`. Both archives are opened before
//! any entry is processed, so a missing archive fails fast.

use crate::archive::EntryArchive;
use crate::collection::Collection;
use crate::config::IngestConfig;
use crate::corpus::{enumerate_entries, process_corpus};
use crate::error::Result;
use crate::export::serialize;
use crate::table::build_table;
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub collection_id: String,
    pub rows: usize,
    pub include_text: bool,
    pub output: PathBuf,
}

/// Convert collection `collection_id` as configured by `config`
#[instrument(skip(config, progress))]
pub fn convert_collection(
    config: &IngestConfig,
    collection_id: &str,
    progress: &ProgressBar,
) -> Result<ConversionSummary> {
    let collection = Collection::locate(&config.data_dir, collection_id);

    let mut metadata = collection.open_metadata()?;
    let mut text = if config.include_text {
        Some(collection.open_plaintext()?)
    } else {
        None
    };

    let total = enumerate_entries(&metadata).count();
    info!(entries = total, include_text = config.include_text, "Converting collection");
    progress.set_length(total as u64);

    let corpus = process_corpus(
        &mut metadata,
        text.as_mut().map(|t| t as &mut dyn EntryArchive),
        |_| progress.inc(1),
    );
    progress.finish_and_clear();
    let corpus = corpus?;

    let table = build_table(&corpus);
    let output = serialize(&table, &config.output_dir, collection_id, config.delimiter)?;

    Ok(ConversionSummary {
        collection_id: collection_id.to_string(),
        rows: table.len(),
        include_text: corpus.includes_text(),
        output,
    })
}
