//! Column-name normalization.
//!
//! Condition strings name columns the way annotation tools print them
//! (`Func.refGene`, `1000G_ALL`, `OMIM_id OMIM_disorder`), and term-list
//! files may carry a file extension. The normalizer maps such a name to one
//! canonical form and renames the matching dataset column to it, so every
//! later reference to the raw name resolves to the same column.

use polars::prelude::PolarsResult;
use tracing::{debug, warn};

use dff_ingest::Dataset;

/// Characters replaced by `_` in canonical names.
const IRREGULAR_CHARS: [char; 2] = ['.', ' '];

/// Returns the name without its last `.suffix`, if it has one.
pub fn strip_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(stem)
}

pub fn has_irregular_chars(name: &str) -> bool {
    name.contains(IRREGULAR_CHARS)
}

pub fn starts_with_digit(name: &str) -> bool {
    name.chars().next().is_some_and(|ch| ch.is_ascii_digit())
}

/// Canonical form of a column name: `.` and spaces become `_`, and a name
/// starting with a digit gets a leading `_`.
pub fn canonical_name(name: &str) -> String {
    let mut canonical = name.replace(IRREGULAR_CHARS, "_");
    if starts_with_digit(&canonical) {
        canonical.insert(0, '_');
    }
    canonical
}

/// Resolves `candidate` against the dataset columns.
///
/// An exact column match is preferred, then a column already carrying the
/// canonical name. Otherwise a trailing extension is stripped when the stem
/// (or its canonical form) is a column. The name is
/// then canonicalized, renaming the dataset column when it exists under the
/// raw name. Names that need no normalization never touch the dataset.
///
/// A name that matches nothing is returned in canonical form; the caller
/// decides what a missing column means.
pub fn normalize_column(dataset: &mut Dataset, candidate: &str) -> PolarsResult<String> {
    let mut name = candidate.to_string();

    if !dataset.has_column(&name)
        && !dataset.has_column(&canonical_name(&name))
        && let Some(stem) = strip_extension(&name)
        && (dataset.has_column(stem) || dataset.has_column(&canonical_name(stem)))
    {
        debug!(column = %candidate, stripped = %stem, "stripped extension from column name");
        name = stem.to_string();
    }

    if has_irregular_chars(&name) {
        let replaced = name.replace(IRREGULAR_CHARS, "_");
        name = rename_step(dataset, &name, replaced)?;
    }

    if starts_with_digit(&name) {
        let prefixed = format!("_{name}");
        name = rename_step(dataset, &name, prefixed)?;
    }

    Ok(name)
}

/// Renames `from` to `to` when `from` is a column.
///
/// If `to` already exists the rename would duplicate a column; the existing
/// `from` column is kept and returned instead.
fn rename_step(dataset: &mut Dataset, from: &str, to: String) -> PolarsResult<String> {
    if !dataset.has_column(from) {
        return Ok(to);
    }
    if dataset.has_column(&to) {
        warn!(
            column = %from,
            canonical = %to,
            "canonical column name already taken, keeping original name"
        );
        return Ok(from.to_string());
    }
    dataset.rename_column(from, &to)?;
    debug!(from = %from, to = %to, "renamed column");
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

    fn dataset(names: &[&str]) -> Dataset {
        let cols: Vec<Column> = names
            .iter()
            .map(|name| Series::new((*name).into(), vec!["x"]).into_column())
            .collect();
        Dataset::new(DataFrame::new(cols).unwrap())
    }

    #[test]
    fn strip_extension_needs_stem_and_suffix() {
        assert_eq!(strip_extension("Gene.refGene.txt"), Some("Gene.refGene"));
        assert_eq!(strip_extension("Gene"), None);
        assert_eq!(strip_extension(".txt"), None);
        assert_eq!(strip_extension("Gene."), None);
    }

    #[test]
    fn canonical_name_examples() {
        assert_eq!(canonical_name("Func.refGene"), "Func_refGene");
        assert_eq!(canonical_name("OMIM_id OMIM_disorder"), "OMIM_id_OMIM_disorder");
        assert_eq!(canonical_name("1000G_ALL"), "_1000G_ALL");
        assert_eq!(canonical_name("PopFreqMax"), "PopFreqMax");
    }

    #[test]
    fn dotted_column_is_renamed() {
        let mut ds = dataset(&["Chr", "Func.refGene"]);
        let name = normalize_column(&mut ds, "Func.refGene").unwrap();
        assert_eq!(name, "Func_refGene");
        assert_eq!(ds.column_names(), vec!["Chr", "Func_refGene"]);
    }

    #[test]
    fn leading_digit_column_is_prefixed() {
        let mut ds = dataset(&["1000G_ALL", "Chr"]);
        let name = normalize_column(&mut ds, "1000G_ALL").unwrap();
        assert_eq!(name, "_1000G_ALL");
        assert_eq!(ds.column_names(), vec!["_1000G_ALL", "Chr"]);
    }

    #[test]
    fn extension_is_stripped_before_normalizing() {
        let mut ds = dataset(&["Gene.refGene"]);
        let name = normalize_column(&mut ds, "Gene.refGene.txt").unwrap();
        assert_eq!(name, "Gene_refGene");
        assert_eq!(ds.column_names(), vec!["Gene_refGene"]);
    }

    #[test]
    fn extension_is_stripped_after_earlier_rename() {
        let mut ds = dataset(&["Gene_refGene"]);
        let name = normalize_column(&mut ds, "Gene.refGene.txt").unwrap();
        assert_eq!(name, "Gene_refGene");
    }

    #[test]
    fn exact_match_wins_over_stripping() {
        let mut ds = dataset(&["Gene.refGene", "Gene"]);
        let name = normalize_column(&mut ds, "Gene.refGene").unwrap();
        assert_eq!(name, "Gene_refGene");
        assert_eq!(ds.column_names(), vec!["Gene_refGene", "Gene"]);
    }

    #[test]
    fn renamed_column_wins_over_stripped_stem() {
        let mut ds = dataset(&["Gene", "Gene_refGene"]);
        let name = normalize_column(&mut ds, "Gene.refGene").unwrap();
        assert_eq!(name, "Gene_refGene");
        assert_eq!(ds.column_names(), vec!["Gene", "Gene_refGene"]);
    }

    #[test]
    fn collision_keeps_original_column() {
        let mut ds = dataset(&["TVC.counts", "TVC_counts"]);
        let name = normalize_column(&mut ds, "TVC.counts").unwrap();
        assert_eq!(name, "TVC.counts");
        assert_eq!(ds.column_names(), vec!["TVC.counts", "TVC_counts"]);
    }

    #[test]
    fn unknown_name_is_passed_through_canonicalized() {
        let mut ds = dataset(&["Chr"]);
        assert_eq!(normalize_column(&mut ds, "Imaginary").unwrap(), "Imaginary");
        assert_eq!(normalize_column(&mut ds, "Some.thing").unwrap(), "Some_thing");
        assert_eq!(ds.column_names(), vec!["Chr"]);
    }
}
