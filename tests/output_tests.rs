// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_inspector::{
    filter::FilterColumn,
    output::{
        OutputFormat, OutputOptions, StatementColumns, TruncatedStatement,
        format_filter_columns, format_truncations
    }
};

fn plain(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        colored: false
    }
}

fn sample_columns() -> Vec<StatementColumns> {
    vec![
        StatementColumns {
            statement: 1,
            kind:      "Select".to_string(),
            columns:   vec![
                FilterColumn::new(Some("users"), "id"),
                FilterColumn::new(None, "active"),
            ]
        },
        StatementColumns {
            statement: 2,
            kind:      "InsertInto".to_string(),
            columns:   Vec::new()
        },
    ]
}

fn sample_truncations() -> Vec<TruncatedStatement> {
    vec![TruncatedStatement {
        statement:       1,
        original_length: 59,
        length:          37,
        truncated:       true,
        sql:             "SELECT ... FROM accounts WHERE id = 1".to_string()
    }]
}

#[test]
fn test_output_format_default() {
    assert_eq!(OutputFormat::default(), OutputFormat::Text);
    let opts = OutputOptions::default();
    assert!(opts.colored);
}

#[test]
fn test_columns_text() {
    let output = format_filter_columns(&sample_columns(), &plain(OutputFormat::Text));
    assert!(output.contains("Statement #1 (Select):"));
    assert!(output.contains("  users.id\n"));
    assert!(output.contains("  active\n"));
    assert!(output.contains("Statement #2 (InsertInto):"));
    assert!(output.contains("(no filter columns)"));
}

#[test]
fn test_columns_json() {
    let output = format_filter_columns(&sample_columns(), &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["columns"][0]["table"], "users");
    assert_eq!(value[0]["columns"][1]["table"], serde_json::Value::Null);
    assert_eq!(value[1]["kind"], "InsertInto");
}

#[test]
fn test_columns_yaml() {
    let output = format_filter_columns(&sample_columns(), &plain(OutputFormat::Yaml));
    assert!(output.contains("column: id"));
    assert!(output.contains("table: users"));
}

#[test]
fn test_truncations_text() {
    let output = format_truncations(&sample_truncations(), &plain(OutputFormat::Text));
    assert!(output.contains("Statement #1 [truncated 59 -> 37]"));
    assert!(output.contains("SELECT ... FROM accounts WHERE id = 1"));
}

#[test]
fn test_truncations_text_untouched() {
    let results = vec![TruncatedStatement {
        statement:       1,
        original_length: 8,
        length:          8,
        truncated:       false,
        sql:             "SELECT 1".to_string()
    }];
    let output = format_truncations(&results, &plain(OutputFormat::Text));
    assert!(output.contains("[8 chars]"));
}

#[test]
fn test_truncations_json() {
    let output = format_truncations(&sample_truncations(), &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["truncated"], true);
    assert_eq!(value[0]["original_length"], 59);
}

#[test]
fn test_colored_text_contains_content() {
    let opts = OutputOptions {
        format:  OutputFormat::Text,
        colored: true
    };
    let output = format_truncations(&sample_truncations(), &opts);
    assert!(output.contains("SELECT ... FROM accounts WHERE id = 1"));
}
