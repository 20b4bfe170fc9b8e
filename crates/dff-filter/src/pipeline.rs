//! Filter pipeline.
//!
//! Conditions are parsed up front, then folded left to right over the
//! dataset. Each step can only remove rows, so the list behaves as a
//! conjunction.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{info, info_span};

use dff_ingest::{Dataset, load_filter_spec, load_table, load_term_lists};
use dff_model::{ColumnSchema, Condition, Relation, parse_column_list};

use crate::error::Result;
use crate::evaluate::{ConditionOutcome, apply_condition};
use crate::parser::parse_condition;

/// Outcome of one condition in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// The condition as it was applied, after column renames.
    pub condition: String,
    pub outcome: ConditionOutcome,
}

/// Per-condition record of a filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub entries: Vec<ReportEntry>,
}

impl FilterReport {
    pub fn applied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, ConditionOutcome::Applied { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.applied_count()
    }
}

/// Parses every condition, failing on the first malformed one.
pub fn parse_conditions<S: AsRef<str>>(conditions: &[S]) -> Result<Vec<Condition>> {
    conditions
        .iter()
        .map(|text| parse_condition(text.as_ref()))
        .collect()
}

/// Applies a single condition string.
pub fn apply(condition: &str, dataset: Dataset) -> Result<Dataset> {
    apply_all(&[condition], dataset)
}

/// Applies condition strings in order.
pub fn apply_all<S: AsRef<str>>(conditions: &[S], dataset: Dataset) -> Result<Dataset> {
    let (dataset, _) = apply_all_with_report(conditions, dataset)?;
    Ok(dataset)
}

/// Applies condition strings in order and reports what each one did.
pub fn apply_all_with_report<S: AsRef<str>>(
    conditions: &[S],
    dataset: Dataset,
) -> Result<(Dataset, FilterReport)> {
    let parsed = parse_conditions(conditions)?;
    fold_conditions(parsed, dataset)
}

/// Left fold of parsed conditions over the dataset.
///
/// Column renames made while resolving a condition are pushed into the
/// conditions still pending, so they keep resolving against the renamed
/// columns.
pub fn fold_conditions(
    conditions: Vec<Condition>,
    mut dataset: Dataset,
) -> Result<(Dataset, FilterReport)> {
    let mut pending: VecDeque<Condition> = conditions.into();
    let mut report = FilterReport::default();

    while let Some(condition) = pending.pop_front() {
        let span = info_span!("condition", condition = %condition);
        let _guard = span.enter();

        let result = apply_condition(&condition, &mut dataset)?;
        for (from, to) in &result.renames {
            for next in pending.iter_mut() {
                next.rename_column(from, to);
            }
        }
        report.entries.push(ReportEntry {
            condition: condition.to_string(),
            outcome: result.outcome,
        });
    }

    info!(
        conditions = report.entries.len(),
        applied = report.applied_count(),
        skipped = report.skipped_count(),
        rows = dataset.row_count(),
        "filtering complete"
    );
    Ok((dataset, report))
}

/// Inputs of one filter run.
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub table: PathBuf,
    pub filter_spec: Option<PathBuf>,
    pub contains_lists: Vec<PathBuf>,
    pub not_contains_lists: Vec<PathBuf>,
}

impl FilterRequest {
    pub fn new(table: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn with_filter_spec(mut self, path: impl Into<PathBuf>) -> Self {
        self.filter_spec = Some(path.into());
        self
    }

    pub fn with_contains_lists(mut self, paths: Vec<PathBuf>) -> Self {
        self.contains_lists = paths;
        self
    }

    pub fn with_not_contains_lists(mut self, paths: Vec<PathBuf>) -> Self {
        self.not_contains_lists = paths;
        self
    }
}

/// Filtered dataset and per-condition report.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    pub dataset: Dataset,
    pub report: FilterReport,
}

/// Filter run configuration.
///
/// The [`ColumnSchema`] is fixed once the pipeline is built and passed to
/// the loader explicitly.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    schema: ColumnSchema,
}

impl FilterPipeline {
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    /// Declares extra numeric columns on top of the current schema.
    pub fn with_numeric_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schema.register_numeric(names);
        self
    }

    /// Declares extra numeric columns from a comma-separated list.
    pub fn with_numeric_column_list(self, raw: &str) -> Self {
        self.with_numeric_columns(parse_column_list(raw))
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn load(&self, path: &Path) -> Result<Dataset> {
        Ok(load_table(path, &self.schema)?)
    }

    /// JSON conditions first, then term-list conditions.
    pub fn merge_conditions(json: Vec<String>, term_lists: Vec<String>) -> Vec<String> {
        let mut merged = json;
        merged.extend(term_lists);
        merged
    }

    /// Collects every condition of a request without touching the table.
    pub fn conditions(&self, request: &FilterRequest) -> Result<Vec<String>> {
        let json = match &request.filter_spec {
            Some(path) => load_filter_spec(path)?,
            None => Vec::new(),
        };
        let mut term_lists = load_term_lists(&request.contains_lists, Relation::Contains)?;
        term_lists.extend(load_term_lists(
            &request.not_contains_lists,
            Relation::NotContains,
        )?);
        Ok(Self::merge_conditions(json, term_lists))
    }

    /// Loads the table and applies every condition of the request.
    ///
    /// Conditions are read and parsed before the table is loaded.
    pub fn run(&self, request: &FilterRequest) -> Result<FilterOutput> {
        let conditions = self.conditions(request)?;
        let parsed = parse_conditions(&conditions)?;
        info!(conditions = parsed.len(), "filter specification parsed");

        let dataset = self.load(&request.table)?;
        let (dataset, report) = fold_conditions(parsed, dataset)?;
        Ok(FilterOutput { dataset, report })
    }
}
