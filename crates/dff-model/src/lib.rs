//! Data model for variant table filtering.
//!
//! - **schema**: which annotation columns are numeric and which are text
//! - **condition**: parsed filter conditions and the predicate AST
//! - **error**: specification and predicate errors shared across crates

pub mod condition;
pub mod error;
pub mod schema;

pub use condition::{
    CompareOp, Condition, Operand, Predicate, Relation, TermSet, is_word_delimiter,
};
pub use error::{PredicateError, SpecificationError};
pub use schema::{ColumnKind, ColumnSchema, parse_column_list};
