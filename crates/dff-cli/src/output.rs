//! Filtered-table output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, PolarsResult, SerWriter};

use dff_ingest::{Dataset, TABLE_SEPARATOR};

/// Writes the dataset as tab-separated text with a header row.
///
/// An empty dataset still produces the header line.
pub fn write_tsv<W: Write>(dataset: &mut Dataset, writer: W) -> PolarsResult<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(TABLE_SEPARATOR)
        .finish(&mut dataset.data)
}

pub fn write_tsv_file(dataset: &mut Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_tsv(dataset, &mut writer).with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
