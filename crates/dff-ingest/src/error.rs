//! Error types for table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a variant table.
#[derive(Debug, Error)]
pub enum LoadError {
    // === File System Errors ===
    /// Table file not found.
    #[error("table file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Gzip stream is corrupt or truncated.
    #[error("failed to decompress {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// Content is neither UTF-8 nor ISO-8859-1.
    #[error("could not decode {path} as UTF-8 or ISO-8859-1")]
    Undecodable { path: PathBuf },

    // === Parsing Errors ===
    /// Failed to parse the tab-separated content with Polars.
    #[error("failed to parse table {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    /// Table has no header row.
    #[error("table file is empty: {path}")]
    EmptyTable { path: PathBuf },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for LoadError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl LoadError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("/path/to/variants.tab"),
        };
        assert_eq!(err.to_string(), "table file not found: /path/to/variants.tab");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let load_err: LoadError = polars_err.into();
        assert!(matches!(load_err, LoadError::DataFrame { .. }));
    }

    #[test]
    fn test_not_found_io_error_maps_to_file_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = LoadError::from_io(std::path::Path::new("x.tab"), io);
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}
