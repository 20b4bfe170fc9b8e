//! Library side of the `dff` command: logging setup, TSV output and the
//! summary tables.

pub mod logging;
pub mod output;
pub mod summary;
