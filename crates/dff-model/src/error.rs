//! Error types shared by the loaders and the filter engine.

use std::path::PathBuf;

use thiserror::Error;

/// The filter specification could not be read or a condition could not be
/// split into column, operator and terms.
#[derive(Debug, Error)]
pub enum SpecificationError {
    /// Filter specification file could not be opened or read.
    #[error("failed to read filter specification {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filter specification is not a JSON list of strings.
    #[error("invalid filter specification {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Term-list file could not be opened or read.
    #[error("failed to read term list {path}: {source}")]
    TermList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Condition string does not have the `column operator terms` shape.
    #[error("malformed condition '{condition}': {reason}")]
    Malformed { condition: String, reason: String },
}

/// A relational expression or a term pattern is invalid.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// Unexpected token while parsing the predicate.
    #[error("invalid predicate '{condition}' at offset {position}: {message}")]
    Syntax {
        condition: String,
        position: usize,
        message: String,
    },

    /// A quoted literal or name is never closed.
    #[error("unterminated {quote} quote in '{condition}'")]
    Unterminated { condition: String, quote: char },

    /// A column operand other than the leading column does not exist.
    #[error("unknown column '{column}' in predicate '{condition}'")]
    UnknownIdentifier { condition: String, column: String },

    /// The `contains` terms do not form a valid regular expression.
    #[error("invalid term pattern in '{condition}': {source}")]
    InvalidPattern {
        condition: String,
        #[source]
        source: regex::Error,
    },
}

impl SpecificationError {
    pub fn malformed(condition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            condition: condition.into(),
            reason: reason.into(),
        }
    }
}
