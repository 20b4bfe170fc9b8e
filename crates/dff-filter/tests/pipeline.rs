//! End-to-end filter runs over on-disk tables.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dff_filter::{ConditionOutcome, FilterError, FilterPipeline, FilterRequest, apply_all};
use dff_model::PredicateError;

const TABLE: &str = "\
Chr\tStart\tRef\tAlt\tFunc.refGene\tGene.refGene\tPopFreqMax\t1000G_ALL\tTVC.counts\tCG46
1\t100\tG\tA\texonic\tPRH1\t0.001\t0.3\t2\t.
1\t200\tG\tT\tintronic\tGRIN2B\t0.2\t0.1\t5\t0.01
2\t300\tA\tG\texonic\tBRCA2\t.\t0.5\t1.\tn/a
2\t400\tC\tT\tsplicing\tTP53\t0,005\t-\t8\tx
X\t500\tG\tC\texonic;splicing\tFAKE3\tn/a\t0.25\t3\t0.2
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(dir: &Path, conditions: &[&str]) -> dff_filter::FilterOutput {
    let table = write(dir, "variants.tab", TABLE);
    let spec = write(dir, "filter.json", &serde_json_list(conditions));
    FilterPipeline::default()
        .run(&FilterRequest::new(table).with_filter_spec(spec))
        .unwrap()
}

fn serde_json_list(conditions: &[&str]) -> String {
    let quoted: Vec<String> = conditions
        .iter()
        .map(|c| format!("\"{}\"", c.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

fn column_text(output: &dff_filter::FilterOutput, name: &str) -> Vec<String> {
    output
        .dataset
        .data
        .column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn text_equality_keeps_columns() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["Ref == \"G\""]);
    assert_eq!(output.dataset.row_count(), 3);
    assert_eq!(output.dataset.column_count(), 10);
}

#[test]
fn frequency_and_function_filters_combine() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["PopFreqMax < 0.01", "Func.refGene contains exonic"]);
    // Row 3 has PopFreqMax "." which cleans to 0.
    assert_eq!(column_text(&output, "Gene.refGene"), vec!["PRH1", "BRCA2"]);
    assert!(output.dataset.has_column("Func_refGene"));
}

#[test]
fn leading_digit_column_resolves_after_rename() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["1000G_ALL > 0.2"]);
    assert_eq!(
        column_text(&output, "Gene.refGene"),
        vec!["PRH1", "BRCA2", "FAKE3"]
    );
    assert!(output.dataset.has_column("_1000G_ALL"));
    assert!(!output.dataset.has_column("1000G_ALL"));
}

#[test]
fn contradictory_ranges_yield_empty_table() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["TVC.counts < 3", "TVC.counts > 3"]);
    assert_eq!(output.dataset.row_count(), 0);
    assert_eq!(output.dataset.column_count(), 10);
    assert_eq!(output.report.applied_count(), 2);
}

#[test]
fn self_inequality_selects_unparseable_cells() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["CG46 != CG46"]);
    assert_eq!(column_text(&output, "Gene.refGene"), vec!["BRCA2", "TP53"]);
}

#[test]
fn unknown_column_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["Imaginary contains x", "Ref == 'G'"]);
    assert_eq!(output.dataset.row_count(), 3);
    assert_eq!(
        output.report.entries[0].outcome,
        ConditionOutcome::Skipped {
            column: "Imaginary".to_string()
        }
    );
}

#[test]
fn term_lists_follow_json_conditions() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "variants.tab", TABLE);
    let spec = write(dir.path(), "filter.json", r#"["Chr != \"X\""]"#);
    let genes = write(dir.path(), "Gene.refGene.txt", "PRH1\nGRIN2B\nFAKE3\n");
    let funcs = write(dir.path(), "Func.refGene", "intronic\n");

    let request = FilterRequest::new(table)
        .with_filter_spec(spec)
        .with_contains_lists(vec![genes])
        .with_not_contains_lists(vec![funcs]);
    let output = FilterPipeline::default().run(&request).unwrap();

    let conditions: Vec<&str> = output
        .report
        .entries
        .iter()
        .map(|entry| entry.condition.as_str())
        .collect();
    assert_eq!(
        conditions,
        vec![
            "Chr != \"X\"",
            "Gene.refGene contains PRH1|GRIN2B|FAKE3",
            "Func.refGene not_contains intronic",
        ]
    );
    assert_eq!(column_text(&output, "Gene_refGene"), vec!["PRH1"]);
}

#[test]
fn extra_numeric_columns_compare_numerically() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "variants.tab", "Chr\tDepth\n1\t9\n1\t10\n1\t.\n");
    let spec = write(dir.path(), "filter.json", r#"["Depth >= 9"]"#);

    let text_run = FilterPipeline::default()
        .run(&FilterRequest::new(&table).with_filter_spec(&spec))
        .unwrap();
    // Text cells are read as numbers against a numeric literal, "." is not one.
    assert_eq!(text_run.dataset.row_count(), 2);

    let numeric_run = FilterPipeline::default()
        .with_numeric_column_list("Depth")
        .run(&FilterRequest::new(&table).with_filter_spec(&spec))
        .unwrap();
    assert_eq!(numeric_run.dataset.row_count(), 2);

    let spec = write(dir.path(), "filter.json", r#"["Depth < 1"]"#);
    let numeric_run = FilterPipeline::default()
        .with_numeric_column_list("Depth")
        .run(&FilterRequest::new(&table).with_filter_spec(&spec))
        .unwrap();
    // "." cleans to 0 once the column is numeric.
    assert_eq!(numeric_run.dataset.row_count(), 1);
}

#[test]
fn unknown_predicate_operand_is_fatal() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "variants.tab", TABLE);
    let spec = write(dir.path(), "filter.json", r#"["PopFreqMax < ExAC_ALL"]"#);
    let err = FilterPipeline::default()
        .run(&FilterRequest::new(table).with_filter_spec(spec))
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Predicate(PredicateError::UnknownIdentifier { .. })
    ));
}

#[test]
fn malformed_specification_is_fatal() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "variants.tab", TABLE);
    let spec = write(dir.path(), "filter.json", r#"{"Ref": "G"}"#);
    let err = FilterPipeline::default()
        .run(&FilterRequest::new(table).with_filter_spec(spec))
        .unwrap_err();
    assert!(matches!(err, FilterError::Specification(_)));
}

#[test]
fn missing_table_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let spec = write(dir.path(), "filter.json", "[]");
    let err = FilterPipeline::default()
        .run(&FilterRequest::new(dir.path().join("absent.tab")).with_filter_spec(spec))
        .unwrap_err();
    assert!(matches!(err, FilterError::Load(_)));
}

#[test]
fn in_memory_fold_matches_pipeline() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "variants.tab", TABLE);
    let dataset = FilterPipeline::default().load(&table).unwrap();
    let filtered = apply_all(&["Chr == 2", "Alt == \"T\""], dataset).unwrap();
    assert_eq!(filtered.row_count(), 1);
}
