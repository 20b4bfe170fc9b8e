//! Filter specification files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use dff_model::SpecificationError;

/// Reads a JSON filter specification: a top-level list of condition strings.
///
/// List order is evaluation order.
pub fn load_filter_spec(path: &Path) -> Result<Vec<String>, SpecificationError> {
    let file = File::open(path).map_err(|source| SpecificationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let conditions: Vec<String> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            SpecificationError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
    debug!(
        path = %path.display(),
        conditions = conditions.len(),
        "filter specification loaded"
    );
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_list_of_conditions_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"["Ref == \"G\"", "Func.refGene contains exonic"]"#).unwrap();
        let conditions = load_filter_spec(file.path()).unwrap();
        assert_eq!(
            conditions,
            vec!["Ref == \"G\"".to_string(), "Func.refGene contains exonic".to_string()]
        );
    }

    #[test]
    fn rejects_non_list_documents() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"Ref": "G"}}"#).unwrap();
        let result = load_filter_spec(file.path());
        assert!(matches!(result, Err(SpecificationError::Json { .. })));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = load_filter_spec(Path::new("/nonexistent/filter.json"));
        assert!(matches!(result, Err(SpecificationError::Read { .. })));
    }
}
