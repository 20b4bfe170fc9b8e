//! Term-list files.
//!
//! A term-list file names a column through its file name and lists one match
//! term per line. Each file becomes one `contains` / `not_contains` condition
//! whose alternatives are the file's lines.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use dff_model::{Condition, Relation, SpecificationError, TermSet};

use crate::encoding::decode_text;

/// File extensions stripped from a term-list file name to get the column.
pub const TERM_LIST_EXTENSIONS: &[&str] = &["txt", "list", "lst", "terms"];

/// Derives the column name a term-list file refers to.
///
/// The directory is dropped. A trailing term-list extension is stripped, any
/// other suffix is part of the column name (`Gene.refGene` stays as is).
pub fn term_list_column(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    if let Some((stem, ext)) = name.rsplit_once('.')
        && !stem.is_empty()
        && TERM_LIST_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    {
        return Some(stem.to_string());
    }
    Some(name)
}

/// Reads the non-empty, right-trimmed lines of a term-list file.
pub fn read_terms(path: &Path) -> Result<Vec<String>, SpecificationError> {
    let bytes = fs::read(path).map_err(|source| SpecificationError::TermList {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) = decode_text(bytes).ok_or_else(|| SpecificationError::TermList {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, "undecodable term list"),
    })?;
    let terms: Vec<String> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    debug!(path = %path.display(), terms = terms.len(), %encoding, "term list read");
    Ok(terms)
}

/// Builds one condition string per term-list file.
///
/// Files without any term produce no condition.
pub fn load_term_lists<P: AsRef<Path>>(
    paths: &[P],
    relation: Relation,
) -> Result<Vec<String>, SpecificationError> {
    let mut conditions = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let column = term_list_column(path).ok_or_else(|| {
            SpecificationError::malformed(path.display().to_string(), "term list has no file name")
        })?;
        let terms = read_terms(path)?;
        if terms.is_empty() {
            warn!(path = %path.display(), column = %column, "term list is empty, skipped");
            continue;
        }
        let condition = Condition::with_relation(relation, column, TermSet::new(terms.join("|")));
        conditions.push(condition.to_string());
    }
    Ok(conditions)
}
