//! Variant table filtering.
//!
//! Turns condition strings into typed [`Condition`](dff_model::Condition)s and
//! folds them over a [`Dataset`](dff_ingest::Dataset):
//!
//! - **normalize**: canonical column names and the renames they imply
//! - **parser**: condition splitting and the predicate grammar
//! - **evaluate**: one condition against one dataset
//! - **pipeline**: the ordered fold, term-list merging and run configuration
//!
//! # Example
//!
//! ```ignore
//! use dff_filter::{FilterPipeline, FilterRequest};
//!
//! let pipeline = FilterPipeline::default().with_numeric_column_list("Depth");
//! let request = FilterRequest::new("variants.tab.gz").with_filter_spec("filter.json");
//! let output = pipeline.run(&request)?;
//! println!("{} rows kept", output.dataset.row_count());
//! ```

mod error;
pub mod evaluate;
pub mod normalize;
pub mod parser;
pub mod pipeline;

pub use error::{FilterError, Result};
pub use evaluate::{ConditionOutcome, ConditionResult, apply_condition};
pub use normalize::{canonical_name, normalize_column, strip_extension};
pub use parser::{RawCondition, parse_condition, parse_predicate, split_condition};
pub use pipeline::{
    FilterOutput, FilterPipeline, FilterReport, FilterRequest, ReportEntry, apply, apply_all,
    apply_all_with_report, fold_conditions, parse_conditions,
};
