use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn sift_binary() -> &'static str {
    env!("CARGO_BIN_EXE_sift")
}

fn run_sift(input: &Path, output: &Path, columns: &[&str], query: Option<&str>) -> Output {
    let mut cmd = Command::new(sift_binary());
    cmd.args(["--input-file", input.to_str().unwrap()]);
    cmd.args(["--output-file", output.to_str().unwrap()]);
    cmd.arg("--columns");
    cmd.args(columns);
    if let Some(q) = query {
        cmd.args(["--query", q]);
    }
    cmd.output().expect("Failed to run sift")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_project_and_filter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let result = run_sift(&input, &output, &["name", "age"], Some("age > 26"));

    assert!(result.status.success(), "sift failed: {}", stderr_of(&result));
    assert_eq!(fs::read_to_string(&output).unwrap(), "name,age\nAlice,30\n");
}

#[test]
fn test_column_subset_and_reorder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age,city\nAlice,30,Oslo\nBob,25,Paris\n").unwrap();

    let result = run_sift(&input, &output, &["city", "name"], None);

    assert!(result.status.success(), "sift failed: {}", stderr_of(&result));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "city,name\nOslo,Alice\nParis,Bob\n"
    );
}

#[test]
fn test_missing_column_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let result = run_sift(&input, &output, &["name", "height"], None);

    assert!(!result.status.success(), "expected failure");
    let stderr = stderr_of(&result);
    assert!(
        stderr.contains("Error: column `height` does not exist in the dataset"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(!output.exists(), "output must not be written on failure");
}

#[test]
fn test_invalid_query_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let result = run_sift(&input, &output, &["name", "age"], Some("nonexistent_col == 1"));

    assert!(!result.status.success(), "expected failure");
    let stderr = stderr_of(&result);
    assert!(
        stderr.contains("Error: invalid query:"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(stderr.contains("nonexistent_col"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_missing_input_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("does-not-exist.csv");
    let output = dir.path().join("out.csv");

    let result = run_sift(&input, &output, &["name"], None);

    assert!(!result.status.success(), "expected failure");
    assert!(
        stderr_of(&result).contains("Error: cannot read"),
        "unexpected stderr: {}",
        stderr_of(&result)
    );
}

#[test]
fn test_output_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\n").unwrap();
    fs::write(&output, "stale contents\n").unwrap();

    let result = run_sift(&input, &output, &["name"], None);

    assert!(result.status.success(), "sift failed: {}", stderr_of(&result));
    assert_eq!(fs::read_to_string(&output).unwrap(), "name\nAlice\n");
}

#[test]
fn test_query_cannot_reference_dropped_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let result = run_sift(&input, &output, &["name"], Some("name != 'Bob' and age >= 30"));

    assert!(!result.status.success(), "expected failure");
    // `age` was projected away before filtering; the query cannot see it.
    assert!(
        stderr_of(&result).contains("Error: invalid query:"),
        "unexpected stderr: {}",
        stderr_of(&result)
    );
}

#[test]
fn test_query_sees_projected_columns_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let result = run_sift(
        &input,
        &output,
        &["name", "age"],
        Some("name != 'Bob' and age >= 30"),
    );

    assert!(result.status.success(), "sift failed: {}", stderr_of(&result));
    assert_eq!(fs::read_to_string(&output).unwrap(), "name,age\nAlice,30\n");
}
