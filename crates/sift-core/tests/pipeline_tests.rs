use std::fs;

use sift_core::pipeline::{run, PipelineConfig};
use sift_core::{reader, writer, SiftError, Table, Value};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_end_to_end_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("people.csv");
    let output = dir.path().join("filtered.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    run(&PipelineConfig {
        input: input.clone(),
        output: output.clone(),
        columns: names(&["name", "age"]),
        query: Some("age > 26".to_string()),
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "name,age\nAlice,30\n");
}

#[test]
fn test_missing_column_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("people.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let err = run(&PipelineConfig {
        input,
        output: dir.path().join("out.csv"),
        columns: names(&["name", "height"]),
        query: None,
    })
    .unwrap_err();

    assert!(matches!(err, SiftError::ColumnNotFound { .. }));
    assert!(err.to_string().contains("height"));
}

#[test]
fn test_invalid_query_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("people.csv");
    fs::write(&input, "name,age\nAlice,30\nBob,25\n").unwrap();

    let err = run(&PipelineConfig {
        input,
        output: dir.path().join("out.csv"),
        columns: names(&["name", "age"]),
        query: Some("nonexistent_col == 1".to_string()),
    })
    .unwrap_err();

    assert!(matches!(err, SiftError::InvalidQuery { .. }));
    assert!(err.to_string().starts_with("invalid query:"));
}

#[test]
fn test_write_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round.csv");

    let table = Table::new(
        names(&["name", "age", "score", "active", "note"]),
        vec![
            vec![
                Value::String("Alice".to_string()),
                Value::Int64(30),
                Value::Float64(2.5),
                Value::Boolean(true),
                Value::String("has, comma".to_string()),
            ],
            vec![
                Value::String("Bob".to_string()),
                Value::Int64(25),
                Value::Null,
                Value::Boolean(false),
                Value::String("quote \"here\"".to_string()),
            ],
        ],
    );

    writer::write_csv(&table, &path).unwrap();
    let read_back = reader::read_csv(&path).unwrap();

    assert_eq!(read_back, table);
}

#[test]
fn test_projection_then_duplicate_columns_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "a,b\n1,2\n3,4\n").unwrap();

    run(&PipelineConfig {
        input,
        output: output.clone(),
        columns: names(&["b", "a", "b"]),
        query: None,
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "b,a,b\n2,1,2\n4,3,4\n");
}

#[test]
fn test_header_only_output_for_all_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "name,age\nAlice,30\n").unwrap();

    run(&PipelineConfig {
        input,
        output: output.clone(),
        columns: names(&["name"]),
        query: Some("name == 'Nobody'".to_string()),
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "name\n");
}
