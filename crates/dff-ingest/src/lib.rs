//! Variant table ingestion.
//!
//! This crate loads everything the filter engine consumes:
//!
//! - **Tables**: tab-separated (optionally gzip-compressed) variant tables read
//!   into Polars DataFrames, with schema-driven numeric coercion
//! - **Filter specifications**: JSON lists of condition strings
//! - **Term lists**: plain-text files turned into `contains` conditions
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dff_ingest::{load_filter_spec, load_table};
//! use dff_model::ColumnSchema;
//!
//! let schema = ColumnSchema::builtin();
//! let dataset = load_table(Path::new("variants.tab.gz"), &schema)?;
//! let conditions = load_filter_spec(Path::new("filter.json"))?;
//! ```

mod encoding;
mod error;
mod frame;
mod spec;
mod table;
mod terms;

// === Error Types ===
pub use error::{LoadError, Result};

// === Dataset ===
pub use frame::Dataset;

// === Table Loading ===
pub use encoding::{TextEncoding, decode_text};
pub use table::{TABLE_SEPARATOR, clean_numeric_cell, coerce_numeric_columns, is_gzip_path, load_table};

// === Filter Sources ===
pub use spec::load_filter_spec;
pub use terms::{TERM_LIST_EXTENSIONS, load_term_lists, read_terms, term_list_column};
