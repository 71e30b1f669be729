// Reading and writing test lists as JSON files

use crate::error::{FormError, ImportError};
use crate::types::{TestCaseList, TestEntry};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the file produced by an export
pub const EXPORT_FILE_NAME: &str = "tests.json";

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse file contents into a test list.
///
/// The only structural requirement is a top-level array. Elements are taken
/// as they are; anything that is not a complete test case stays raw JSON.
pub fn parse_test_list(contents: &str) -> Result<TestCaseList, ImportError> {
    let value: Value = serde_json::from_str(contents).map_err(ImportError::Parse)?;

    let elements = match value {
        Value::Array(elements) => elements,
        other => return Err(ImportError::NotAnArray(json_kind(&other))),
    };

    Ok(elements.into_iter().map(TestEntry::from_value).collect())
}

/// Read and parse a test file from disk
pub fn read_test_file(path: &Path) -> Result<TestCaseList, ImportError> {
    let contents = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_test_list(&contents)
}

/// Pretty-printed JSON array
pub fn to_pretty_json(tests: &[TestEntry]) -> Result<String, FormError> {
    Ok(serde_json::to_string_pretty(tests)?)
}

/// Write `tests.json` into `dir` and return its path
pub fn write_test_file(dir: &Path, tests: &[TestEntry]) -> Result<PathBuf, FormError> {
    let path = dir.join(EXPORT_FILE_NAME);
    write_test_file_to(&path, tests)?;
    Ok(path)
}

/// Write the list to an explicit path
pub fn write_test_file_to(path: &Path, tests: &[TestEntry]) -> Result<(), FormError> {
    let content = to_pretty_json(tests)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| FormError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| FormError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TestCase, TestCaseField};

    #[test]
    fn test_parse_array() {
        let tests = parse_test_list(
            r#"[
                {"input": "2+2", "expected_output": "4", "actual_output": "4"},
                {"input": "capital of France", "expected_output": "Paris", "actual_output": "Lyon"}
            ]"#,
        )
        .unwrap();

        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].field(TestCaseField::ActualOutput), Some("Lyon"));
        assert!(tests.iter().all(|t| t.as_case().is_some()));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_test_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_object() {
        let err = parse_test_list(r#"{"a":1}"#).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray("an object")));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        let err = parse_test_list("{bad json").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_parse_keeps_malformed_elements() {
        let tests = parse_test_list(r#"[{"input": "ok"}, 42, {"expected_output": null}]"#).unwrap();

        assert_eq!(tests.len(), 3);
        assert_eq!(tests[0], TestEntry::Raw(serde_json::json!({"input": "ok"})));
        assert_eq!(tests[1], TestEntry::Raw(serde_json::json!(42)));
        assert_eq!(tests[2], TestEntry::Raw(serde_json::json!({"expected_output": null})));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let tests = vec![
            TestEntry::Case(TestCase::new("a", "b", "c")),
            TestEntry::default(),
            TestEntry::Raw(serde_json::json!("free text")),
        ];

        let path = write_test_file(dir.path(), &tests).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);

        let loaded = read_test_file(&path).unwrap();
        assert_eq!(loaded, tests);
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let json = to_pretty_json(&[TestEntry::default()]).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"expected_output\": \"\""));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_test_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }
}
