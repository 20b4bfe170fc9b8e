use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dff_cli::output::{write_tsv, write_tsv_file};
use dff_cli::summary::column_table;
use dff_filter::{FilterOutput, FilterPipeline, FilterRequest};

use crate::cli::{ColumnsArgs, FilterArgs};

pub fn run_filter(args: &FilterArgs) -> Result<FilterOutput> {
    let span = info_span!("filter", table = %args.table.display());
    let _guard = span.enter();
    let start = Instant::now();

    let pipeline = FilterPipeline::default().with_numeric_columns(&args.numeric_columns);
    let request = FilterRequest::new(&args.table)
        .with_filter_spec(&args.filter_spec)
        .with_contains_lists(args.column_contains.clone())
        .with_not_contains_lists(args.column_not_contains.clone());

    let mut output = pipeline
        .run(&request)
        .with_context(|| format!("filter {}", args.table.display()))?;

    match &args.output {
        Some(path) => write_tsv_file(&mut output.dataset, path)?,
        None => write_tsv(&mut output.dataset, io::stdout().lock()).context("write to stdout")?,
    }

    info!(
        rows = output.dataset.row_count(),
        columns = output.dataset.column_count(),
        duration_ms = start.elapsed().as_millis(),
        "filtered table written"
    );
    Ok(output)
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let pipeline = FilterPipeline::default().with_numeric_columns(&args.numeric_columns);
    println!("{}", column_table(pipeline.schema()));
    Ok(())
}
