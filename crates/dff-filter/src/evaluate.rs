//! Applying one parsed condition to a dataset.
//!
//! Rows are decided one at a time into a keep mask, which is then applied
//! with [`Dataset::retain_rows`].

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use polars::prelude::{Column, DataType, Float64Chunked, StringChunked};
use tracing::{debug, warn};

use dff_ingest::Dataset;
use dff_model::{Condition, Operand, Predicate, PredicateError, Relation, TermSet};

use crate::error::Result;
use crate::normalize::normalize_column;

/// What applying a condition did to the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOutcome {
    /// Rows were filtered.
    Applied { rows_before: usize, rows_after: usize },
    /// The leading column does not exist; the dataset is unchanged.
    Skipped { column: String },
}

impl ConditionOutcome {
    pub fn rows_removed(&self) -> usize {
        match self {
            ConditionOutcome::Applied {
                rows_before,
                rows_after,
            } => rows_before - rows_after,
            ConditionOutcome::Skipped { .. } => 0,
        }
    }
}

/// Result of [`apply_condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionResult {
    pub outcome: ConditionOutcome,
    /// Column references resolved to a different name, as `(raw, resolved)`.
    pub renames: Vec<(String, String)>,
}

/// Applies one condition, normalizing the columns it references first.
pub fn apply_condition(condition: &Condition, dataset: &mut Dataset) -> Result<ConditionResult> {
    let mut renames = Vec::new();
    let raw_column = condition.column();
    let column = resolve(dataset, raw_column, &mut renames)?;

    if !dataset.has_column(&column) {
        warn!(
            column = %raw_column,
            condition = %condition,
            "column not found, condition skipped"
        );
        return Ok(ConditionResult {
            outcome: ConditionOutcome::Skipped {
                column: raw_column.to_string(),
            },
            renames,
        });
    }

    let rows_before = dataset.row_count();
    let mask = match condition {
        Condition::Contains { terms, .. } => {
            term_mask(condition, dataset, &column, terms, Relation::Contains)?
        }
        Condition::NotContains { terms, .. } => {
            term_mask(condition, dataset, &column, terms, Relation::NotContains)?
        }
        Condition::Predicate { predicate, .. } => {
            predicate_mask(condition, dataset, predicate, &column, &mut renames)?
        }
    };
    dataset.retain_rows(&mask)?;
    let rows_after = dataset.row_count();

    debug!(
        condition = %condition,
        rows_before,
        rows_after,
        "condition applied"
    );
    Ok(ConditionResult {
        outcome: ConditionOutcome::Applied {
            rows_before,
            rows_after,
        },
        renames,
    })
}

fn resolve(
    dataset: &mut Dataset,
    raw: &str,
    renames: &mut Vec<(String, String)>,
) -> Result<String> {
    let resolved = normalize_column(dataset, raw)?;
    if resolved != raw
        && dataset.has_column(&resolved)
        && !renames.iter().any(|(from, _)| from == raw)
    {
        renames.push((raw.to_string(), resolved.clone()));
    }
    Ok(resolved)
}

fn term_mask(
    condition: &Condition,
    dataset: &Dataset,
    column: &str,
    terms: &TermSet,
    relation: Relation,
) -> Result<Vec<bool>> {
    let regex = terms.compile().map_err(|source| PredicateError::InvalidPattern {
        condition: condition.to_string(),
        source,
    })?;
    let view = ColumnView::new(dataset.data.column(column)?)?;
    let wanted = relation == Relation::Contains;
    Ok((0..dataset.row_count())
        .map(|idx| match view.cell(idx).as_text() {
            Some(text) => regex.is_match(&text) == wanted,
            None => false,
        })
        .collect())
}

fn predicate_mask(
    condition: &Condition,
    dataset: &mut Dataset,
    predicate: &Predicate,
    leading: &str,
    renames: &mut Vec<(String, String)>,
) -> Result<Vec<bool>> {
    // The leading column is already resolved and possibly renamed.
    let mut resolved: HashMap<&str, String> = HashMap::new();
    resolved.insert(condition.column(), leading.to_string());
    for raw in predicate.columns() {
        if resolved.contains_key(raw) {
            continue;
        }
        let name = resolve(dataset, raw, renames)?;
        if !dataset.has_column(&name) {
            return Err(PredicateError::UnknownIdentifier {
                condition: condition.to_string(),
                column: raw.to_string(),
            }
            .into());
        }
        resolved.insert(raw, name);
    }

    let mut views: HashMap<&str, ColumnView> = HashMap::new();
    for (raw, name) in &resolved {
        views.insert(*raw, ColumnView::new(dataset.data.column(name)?)?);
    }

    let evaluator = RowEvaluator { views: &views };
    Ok((0..dataset.row_count())
        .map(|idx| evaluator.holds(predicate, idx))
        .collect())
}

/// Typed read access to one column.
enum ColumnView {
    Numeric(Float64Chunked),
    Text(StringChunked),
}

impl ColumnView {
    fn new(column: &Column) -> Result<Self> {
        let view = match column.dtype() {
            DataType::Float64 => ColumnView::Numeric(column.f64()?.clone()),
            DataType::Float32
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64 => {
                ColumnView::Numeric(column.cast(&DataType::Float64)?.f64()?.clone())
            }
            _ => ColumnView::Text(column.cast(&DataType::String)?.str()?.clone()),
        };
        Ok(view)
    }

    fn cell(&self, idx: usize) -> Cell<'_> {
        match self {
            ColumnView::Numeric(values) => values.get(idx).map_or(Cell::Missing, Cell::Number),
            ColumnView::Text(values) => values.get(idx).map_or(Cell::Missing, Cell::Text),
        }
    }
}

/// One cell value as seen by comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl<'a> Cell<'a> {
    /// Text form used for term matching. Missing and NaN cells have none.
    fn as_text(self) -> Option<Cow<'a, str>> {
        match self {
            Cell::Number(value) if value.is_nan() => None,
            Cell::Number(value) => Some(Cow::Owned(value.to_string())),
            Cell::Text(text) => Some(Cow::Borrowed(text)),
            Cell::Missing => None,
        }
    }
}

/// Orders two cells; `None` when they are incomparable.
///
/// Text compared against a number is read as a number when it parses.
fn compare_cells(left: Cell<'_>, right: Cell<'_>) -> Option<Ordering> {
    match (left, right) {
        (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(&b),
        (Cell::Text(a), Cell::Text(b)) => Some(a.cmp(b)),
        (Cell::Number(a), Cell::Text(b)) => parse_number(b).and_then(|b| a.partial_cmp(&b)),
        (Cell::Text(a), Cell::Number(b)) => parse_number(a).and_then(|a| a.partial_cmp(&b)),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

struct RowEvaluator<'v> {
    views: &'v HashMap<&'v str, ColumnView>,
}

impl RowEvaluator<'_> {
    fn holds(&self, predicate: &Predicate, idx: usize) -> bool {
        match predicate {
            Predicate::Compare { op, left, right } => {
                let ordering = compare_cells(self.operand(left, idx), self.operand(right, idx));
                op.holds(ordering)
            }
            Predicate::And(left, right) => self.holds(left, idx) && self.holds(right, idx),
            Predicate::Or(left, right) => self.holds(left, idx) || self.holds(right, idx),
            Predicate::Not(inner) => !self.holds(inner, idx),
        }
    }

    fn operand<'a>(&'a self, operand: &'a Operand, idx: usize) -> Cell<'a> {
        match operand {
            Operand::Column(name) => self
                .views
                .get(name.as_str())
                .map_or(Cell::Missing, |view| view.cell(idx)),
            Operand::Number(value) => Cell::Number(*value),
            Operand::Text(text) => Cell::Text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

    use crate::parser::parse_condition;

    fn dataset() -> Dataset {
        let df = DataFrame::new(vec![
            Series::new("Gene.refGene".into(), vec![Some("PRH1"), Some("BRCA2"), None])
                .into_column(),
            Series::new("PopFreqMax".into(), vec![0.001, f64::NAN, 0.5]).into_column(),
            Series::new("Ref".into(), vec!["A", "G", "T"]).into_column(),
        ])
        .unwrap();
        Dataset::new(df)
    }

    fn apply(text: &str, ds: &mut Dataset) -> ConditionResult {
        apply_condition(&parse_condition(text).unwrap(), ds).unwrap()
    }

    #[test]
    fn compare_cells_rules() {
        assert_eq!(compare_cells(Cell::Number(1.0), Cell::Number(2.0)), Some(Ordering::Less));
        assert_eq!(compare_cells(Cell::Number(f64::NAN), Cell::Number(f64::NAN)), None);
        assert_eq!(compare_cells(Cell::Text("b"), Cell::Text("a")), Some(Ordering::Greater));
        assert_eq!(compare_cells(Cell::Text("0.5"), Cell::Number(0.5)), Some(Ordering::Equal));
        assert_eq!(compare_cells(Cell::Text("x"), Cell::Number(0.5)), None);
        assert_eq!(compare_cells(Cell::Missing, Cell::Text("x")), None);
    }

    #[test]
    fn contains_excludes_missing_cells() {
        let mut ds = dataset();
        let result = apply("Gene.refGene contains PRH|BRCA", &mut ds);
        assert_eq!(
            result.outcome,
            ConditionOutcome::Applied {
                rows_before: 3,
                rows_after: 2
            }
        );
        assert_eq!(
            result.renames,
            vec![("Gene.refGene".to_string(), "Gene_refGene".to_string())]
        );
    }

    #[test]
    fn not_contains_excludes_missing_cells() {
        let mut ds = dataset();
        let result = apply("Gene.refGene not_contains PRH1", &mut ds);
        assert_eq!(result.outcome.rows_removed(), 2);
    }

    #[test]
    fn contains_on_numeric_column_matches_formatted_value() {
        let mut ds = dataset();
        apply("PopFreqMax contains ^0\\.5$", &mut ds);
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn nan_is_only_unequal() {
        let mut ds = dataset();
        apply("PopFreqMax != PopFreqMax", &mut ds);
        assert_eq!(ds.row_count(), 1);
        let value = ds.data.column("PopFreqMax").unwrap().f64().unwrap().get(0);
        assert!(value.is_some_and(f64::is_nan));
    }

    #[test]
    fn text_equality_and_lexicographic_order() {
        let mut ds = dataset();
        apply("Ref == \"G\" | Ref > 'S'", &mut ds);
        let refs: Vec<_> = ds
            .data
            .column("Ref")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        assert_eq!(refs, vec!["G", "T"]);
    }

    #[test]
    fn dotted_predicate_column_ignores_stem_column() {
        let df = DataFrame::new(vec![
            Series::new("Gene".into(), vec!["X", "PRH1"]).into_column(),
            Series::new("Gene.refGene".into(), vec!["PRH1", "X"]).into_column(),
        ])
        .unwrap();
        let mut ds = Dataset::new(df);
        apply("Gene.refGene == \"PRH1\"", &mut ds);
        assert_eq!(ds.column_names(), vec!["Gene", "Gene_refGene"]);
        let kept: Vec<_> = ds
            .data
            .column("Gene_refGene")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        assert_eq!(kept, vec!["PRH1"]);
    }

    #[test]
    fn unknown_leading_column_is_skipped() {
        let mut ds = dataset();
        let result = apply("Imaginary.col < 3", &mut ds);
        assert_eq!(
            result.outcome,
            ConditionOutcome::Skipped {
                column: "Imaginary.col".to_string()
            }
        );
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn unknown_secondary_column_is_an_error() {
        let mut ds = dataset();
        let condition = parse_condition("PopFreqMax < ExAC_ALL").unwrap();
        let err = apply_condition(&condition, &mut ds).unwrap_err();
        assert!(matches!(
            err,
            crate::FilterError::Predicate(PredicateError::UnknownIdentifier { ref column, .. })
                if column == "ExAC_ALL"
        ));
    }

    #[test]
    fn invalid_term_pattern_is_an_error() {
        let mut ds = dataset();
        let condition = parse_condition("Ref contains (A").unwrap();
        let err = apply_condition(&condition, &mut ds).unwrap_err();
        assert!(matches!(
            err,
            crate::FilterError::Predicate(PredicateError::InvalidPattern { .. })
        ));
    }
}
