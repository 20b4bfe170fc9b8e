//! In-memory variant table.
//!
//! [`Dataset`] wraps a Polars DataFrame with the path it was loaded from.
//! Filtering only ever removes rows and normalization only ever renames
//! columns, so row and column order survive the whole pipeline.

use std::path::{Path, PathBuf};

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};

#[derive(Debug, Clone)]
pub struct Dataset {
    /// The table contents.
    pub data: DataFrame,
    /// File the table was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl Dataset {
    pub fn new(data: DataFrame) -> Self {
        Self { data, source: None }
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_count(&self) -> usize {
        self.data.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.get_column_index(name).is_some()
    }

    /// Renames a column in place, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: &str) -> PolarsResult<()> {
        self.data.rename(from, to.into())?;
        Ok(())
    }

    /// Keeps the rows whose mask entry is `true`, preserving their order.
    pub fn retain_rows(&mut self, keep: &[bool]) -> PolarsResult<()> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        self.data = self.data.filter(&mask)?;
        Ok(())
    }
}

impl From<DataFrame> for Dataset {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
