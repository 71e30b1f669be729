// CLI commands for editing test files and running evaluations
use anyhow::{bail, Context, Result};
use playground_common::config::DEFAULT_METRIC;
use playground_common::single::SingleCaseForm;
use playground_common::{EvaluationForm, FormError, HttpEvaluator, TestCaseField, TestEntry};
use serde_json::Value;
use std::path::Path;
use tracing::info;

const PREVIEW_WIDTH: usize = 28;

/// Load a test file into a fresh form
fn load_form(path: &Path, metric: &str) -> Result<EvaluationForm> {
    if !path.exists() {
        bail!(
            "Test file not found: {} (create one with: playground-cli init)",
            path.display()
        );
    }

    let mut form = EvaluationForm::new(metric);
    form.import_from_file(path)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    Ok(form)
}

/// Save the form back to the file it was loaded from
fn save_form(form: &EvaluationForm, path: &Path) -> Result<()> {
    form.save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Shorten a field for the table view
fn preview(value: &str) -> String {
    let single_line = value.replace('\n', "⏎");
    if single_line.chars().count() <= PREVIEW_WIDTH {
        single_line
    } else {
        let cut: String = single_line.chars().take(PREVIEW_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}

/// Table cell for one field; raw elements show their JSON instead
fn cell(entry: &TestEntry, field: TestCaseField) -> String {
    match entry {
        TestEntry::Case(case) => preview(case.field(field)),
        TestEntry::Raw(value) => match value.get(field.as_str()) {
            Some(Value::String(text)) => preview(text),
            Some(other) => preview(&other.to_string()),
            None if value.is_object() => String::new(),
            // non-objects take the input column only
            None if field == TestCaseField::Input => preview(&value.to_string()),
            None => String::new(),
        },
    }
}

fn render_table(tests: &[TestEntry]) -> String {
    let mut out = format!(
        "{:<5} {:<w$} {:<w$} {:<w$}\n",
        "#",
        "Input",
        "Expected Output",
        "Actual Output",
        w = PREVIEW_WIDTH
    );
    out.push_str(&"─".repeat(5 + 3 * (PREVIEW_WIDTH + 1)));
    out.push('\n');

    for (idx, entry) in tests.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<w$} {:<w$} {:<w$}\n",
            idx,
            cell(entry, TestCaseField::Input),
            cell(entry, TestCaseField::ExpectedOutput),
            cell(entry, TestCaseField::ActualOutput),
            w = PREVIEW_WIDTH
        ));
    }
    out
}

/// Write a new tests.json with a single empty case
pub fn init_tests(dir: &Path, metric: &str) -> Result<()> {
    let target = dir.join(playground_common::test_file::EXPORT_FILE_NAME);
    if target.exists() {
        bail!("{} already exists", target.display());
    }

    let form = EvaluationForm::new(metric);
    let path = form
        .export_to_file(dir)
        .with_context(|| format!("Failed to export tests to {}", dir.display()))?;

    println!("📝 Created {}", path.display());
    println!("\n📋 Next steps:");
    println!("  1. Fill in a case: playground-cli set --index 0 --field input --value \"...\"");
    println!("  2. Evaluate: playground-cli evaluate --metric {}", metric);

    Ok(())
}

/// Print the test list as a table
pub fn show_tests(path: &Path) -> Result<()> {
    let form = load_form(path, DEFAULT_METRIC)?;

    if form.is_empty() {
        println!("No test cases in {}.", path.display());
        println!("\n💡 Add one with: playground-cli add");
        return Ok(());
    }

    print!("{}", render_table(form.tests()));
    println!("\n✅ Total: {} test case(s)", form.len());

    Ok(())
}

/// Append an empty test case
pub fn add_test(path: &Path) -> Result<()> {
    let mut form = load_form(path, DEFAULT_METRIC)?;
    form.add_test();
    save_form(&form, path)?;

    println!("➕ Added test case #{} ({} total)", form.len() - 1, form.len());
    Ok(())
}

/// Set a single field of one test case
pub fn set_field(path: &Path, index: usize, field: TestCaseField, value: &str) -> Result<()> {
    let mut form = load_form(path, DEFAULT_METRIC)?;
    form.update_field(index, field, value)?;
    save_form(&form, path)?;

    println!("✏️  Test #{}: {} = \"{}\"", index, field, preview(value));
    Ok(())
}

/// Remove one test case; refused when it is the only one left
pub fn remove_test(path: &Path, index: usize) -> Result<()> {
    let mut form = load_form(path, DEFAULT_METRIC)?;

    match form.remove_test(index) {
        Ok(_) => {}
        Err(FormError::LastTestCase) => {
            bail!("Cannot remove test #{}: at least one test case must remain", index)
        }
        Err(e) => return Err(e.into()),
    }
    save_form(&form, path)?;

    println!("🗑️  Removed test case #{} ({} remaining)", index, form.len());
    Ok(())
}

/// Submit every case in the file and print the result JSON
pub async fn evaluate(path: &Path, metric: &str, base_url: &str) -> Result<()> {
    let mut form = load_form(path, metric)?;
    let evaluator = HttpEvaluator::new(base_url);

    info!(
        url = %evaluator.url(),
        metric = %form.metric(),
        test_count = form.len(),
        "{}",
        form.submit_label()
    );

    let result = form.submit(&evaluator).await;
    println!("{}", result.render());

    Ok(())
}

/// Submit one case the way the first playground form did
pub async fn evaluate_single(
    input: &str,
    expected: &str,
    actual: &str,
    base_url: &str,
) -> Result<()> {
    let mut form = SingleCaseForm::new(input, expected, actual);
    let evaluator = HttpEvaluator::new(base_url);

    info!(url = %evaluator.url(), "Evaluating single test case");

    let text = form.submit(&evaluator).await;
    println!("{}", text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_common::TestCase;
    use serde_json::json;

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("a\nb"), "a⏎b");

        let long = "x".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_WIDTH);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_render_table_rows() {
        let table = render_table(&[
            TestCase::new("2+2", "4", "5").into(),
            TestEntry::default(),
            TestEntry::Raw(json!(42)),
            TestEntry::Raw(json!({"input": 7})),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("#"));
        assert!(lines[2].starts_with("0"));
        assert!(lines[2].contains("2+2"));
        assert!(lines[3].starts_with("1"));
        assert!(lines[4].starts_with("2     42"));
        assert!(lines[5].starts_with("3     7"));
    }

    #[test]
    fn test_init_then_edit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.json");

        init_tests(dir.path(), "correctness").unwrap();
        add_test(&path).unwrap();
        set_field(&path, 1, TestCaseField::ExpectedOutput, "Paris").unwrap();

        let form = load_form(&path, DEFAULT_METRIC).unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.tests()[1].field(TestCaseField::ExpectedOutput), Some("Paris"));

        remove_test(&path, 0).unwrap();
        let form = load_form(&path, DEFAULT_METRIC).unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form.tests()[0].field(TestCaseField::ExpectedOutput), Some("Paris"));

        // the last case stays
        assert!(remove_test(&path, 0).is_err());
        assert_eq!(load_form(&path, DEFAULT_METRIC).unwrap().len(), 1);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_tests(dir.path(), "correctness").unwrap();
        assert!(init_tests(dir.path(), "correctness").is_err());
    }

    #[test]
    fn test_broken_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.json");
        std::fs::write(&path, "{bad json").unwrap();

        assert!(add_test(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{bad json");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(show_tests(&dir.path().join("tests.json")).is_err());
    }
}
