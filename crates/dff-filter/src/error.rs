//! Error types for the filter engine.

use polars::prelude::PolarsError;
use thiserror::Error;

use dff_ingest::LoadError;
use dff_model::{PredicateError, SpecificationError};

/// Fatal filtering errors.
///
/// A condition naming an unknown column is not an error: it is logged and
/// skipped (see [`crate::ConditionOutcome::Skipped`]).
#[derive(Debug, Error)]
pub enum FilterError {
    /// The input table could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The filter specification or a condition string is malformed.
    #[error(transparent)]
    Specification(#[from] SpecificationError),

    /// A predicate or term pattern is invalid.
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] PolarsError),
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
