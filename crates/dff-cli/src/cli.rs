//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dff",
    version,
    about = "Filter annotated variant tables with declarative conditions",
    long_about = "Filter tab-separated variant annotation tables.\n\n\
                  Conditions come from a JSON list of strings such as\n\
                  'PopFreqMax < 0.01' or 'Func.refGene contains exonic|splicing',\n\
                  plus optional term-list files named after the column they test."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter a variant table and write the kept rows as TSV.
    Filter(FilterArgs),

    /// List the columns read as numeric or text.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct FilterArgs {
    /// Tab-separated variant table, optionally gzip-compressed (.gz).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// JSON file holding a list of condition strings.
    #[arg(value_name = "FILTER_JSON")]
    pub filter_spec: PathBuf,

    /// Term-list file whose name is the column and whose lines must match.
    ///
    /// May be repeated. `Gene.refGene.txt` with lines `PRH1` and `GRIN2B`
    /// becomes `Gene.refGene contains PRH1|GRIN2B`.
    #[arg(long = "column-contains", value_name = "PATH")]
    pub column_contains: Vec<PathBuf>,

    /// Term-list file whose lines must not match. May be repeated.
    #[arg(long = "column-not-contains", value_name = "PATH")]
    pub column_not_contains: Vec<PathBuf>,

    /// Extra columns to read as numbers (comma-separated).
    #[arg(long = "numeric-columns", value_name = "NAMES", value_delimiter = ',')]
    pub numeric_columns: Vec<String>,

    /// Write the filtered table to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print a per-condition summary to stderr.
    #[arg(long = "summary")]
    pub summary: bool,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Extra columns to read as numbers (comma-separated).
    #[arg(long = "numeric-columns", value_name = "NAMES", value_delimiter = ',')]
    pub numeric_columns: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
