//! Tab-separated table loading.
//!
//! Every column is read as text so Polars never has to infer types across a
//! wide annotation table. Columns the [`ColumnSchema`] declares numeric are then
//! cleaned of placeholder tokens and coerced to `Float64`.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use polars::prelude::{
    CsvReadOptions, DataFrame, DataType, IntoColumn, NamedFrom, SerReader, Series,
};
use tracing::{debug, info, warn};

use dff_model::ColumnSchema;

use crate::encoding::{TextEncoding, decode_text};
use crate::error::{LoadError, Result};
use crate::frame::Dataset;

/// Field separator of variant tables.
pub const TABLE_SEPARATOR: u8 = b'\t';

/// Returns true when the path carries a gzip suffix.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Loads a tab-separated variant table.
///
/// `.gz` files are decompressed transparently. Content is decoded as UTF-8,
/// falling back to ISO-8859-1. Numeric columns known to `schema` are coerced
/// with [`clean_numeric_cell`]; all other columns stay text.
pub fn load_table(path: &Path, schema: &ColumnSchema) -> Result<Dataset> {
    let bytes = read_table_bytes(path)?;
    if bytes.is_empty() {
        return Err(LoadError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    let (text, encoding) = decode_text(bytes).ok_or_else(|| LoadError::Undecodable {
        path: path.to_path_buf(),
    })?;
    if encoding != TextEncoding::Utf8 {
        warn!(
            path = %path.display(),
            %encoding,
            "table is not valid UTF-8, decoded with fallback encoding"
        );
    }

    let mut df = parse_table(path, text)?;
    let numeric = coerce_numeric_columns(&mut df, schema)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        numeric_columns = numeric,
        %encoding,
        "table loaded"
    );
    Ok(Dataset::new(df).with_source(path))
}

fn read_table_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let mut bytes = Vec::new();
    if is_gzip_path(path) {
        debug!(path = %path.display(), "reading gzip-compressed table");
        MultiGzDecoder::new(BufReader::new(file))
            .read_to_end(&mut bytes)
            .map_err(|e| LoadError::Decompress {
                path: path.to_path_buf(),
                source: e,
            })?;
    } else {
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| LoadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    Ok(bytes)
}

/// Parses decoded table text with every column typed as `String`.
fn parse_table(path: &Path, text: String) -> Result<DataFrame> {
    if text.trim().is_empty() {
        return Err(LoadError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(TABLE_SEPARATOR))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| LoadError::TableParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Coerces every numeric-declared column present in `df`.
///
/// Returns the number of columns coerced.
pub fn coerce_numeric_columns(df: &mut DataFrame, schema: &ColumnSchema) -> Result<usize> {
    let targets: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| schema.is_numeric(name.as_str()))
        .map(|name| name.to_string())
        .collect();

    for name in &targets {
        let values: Vec<f64> = {
            let column = df.column(name)?.cast(&DataType::String)?;
            column.str()?.into_iter().map(clean_numeric_cell).collect()
        };
        let unparsed = values.iter().filter(|value| value.is_nan()).count();
        if unparsed > 0 {
            debug!(column = %name, unparsed, "numeric cells could not be parsed");
        }
        df.with_column(Series::new(name.as_str().into(), values).into_column())?;
    }
    Ok(targets.len())
}

/// Cleans and parses one cell of a numeric column.
///
/// `,` is read as a decimal separator. Missing cells and the placeholders
/// `.` and `-` become `0`, `1.` becomes `1`. Anything else that does not parse
/// to a finite number becomes NaN.
pub fn clean_numeric_cell(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let value = raw.trim().replace(',', ".");
    match value.as_str() {
        "" | "." | "-" => 0.0,
        "1." => 1.0,
        other => other
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .unwrap_or(f64::NAN),
    }
}
