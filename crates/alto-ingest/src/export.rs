//! Writing flattened tables as delimited files
//!
//! The first column is the row index (metadata entry name) under an empty
//! header, which is what pandas writes and what `read_csv(index_col=0)`
//! expects. Absent values become empty fields.

use crate::error::Result;
use crate::table::{Table, INDEX_HEADER};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Output file name for a collection
pub fn output_file_name(collection_id: &str) -> String {
    format!("{}.csv", collection_id)
}

/// Write `table` to `writer`, header row first
pub fn write_table<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv.write_record(
        std::iter::once(INDEX_HEADER).chain(table.columns().iter().map(String::as_str)),
    )?;

    for row in table.rows() {
        csv.write_record(
            std::iter::once(row.index.as_str())
                .chain(row.values.iter().map(|v| v.as_deref().unwrap_or(""))),
        )?;
    }

    csv.flush()?;
    Ok(())
}

/// Write `table` to `{output_dir}/{collection_id}.csv`
///
/// Creates `output_dir` when needed and replaces an existing file.
pub fn serialize(
    table: &Table,
    output_dir: &Path,
    collection_id: &str,
    delimiter: u8,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join(output_file_name(collection_id));
    let file = File::create(&path)?;
    write_table(table, BufWriter::new(file), delimiter)?;

    info!(
        path = %path.display(),
        rows = table.len(),
        "Wrote table"
    );
    Ok(path)
}
