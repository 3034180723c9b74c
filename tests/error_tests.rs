// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_inspector::{
    error::{
        config_error, deparse_error, file_read_error, input_format_error, query_parse_error,
        truncation_path_error
    },
    query::{SqlDialect, parse_statements}
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/file.sql", io_error);
    assert!(format!("{:?}", error).contains("/path/to/file.sql"));
}

#[test]
fn test_query_parse_error() {
    let error = query_parse_error("Unexpected token");
    assert!(format!("{:?}", error).contains("Unexpected token"));
}

#[test]
fn test_query_parse_error_with_position() {
    let error = query_parse_error("Expected: an expression, found: EOF at Line: 3, Column: 14");
    assert!(format!("{:?}", error).contains("line 3, column 14"));
}

#[test]
fn test_parse_failure_surfaces_position() {
    let err = parse_statements("SELEC 1", SqlDialect::Generic).unwrap_err();
    let message = format!("{:?}", err);
    assert!(message.contains("Query parse error"));
    assert!(message.contains("line 1"));
    assert!(message.contains("column 1"));
}

#[test]
fn test_deparse_error() {
    let error = deparse_error("no SQL text for CaseExpr node");
    assert!(format!("{:?}", error).contains("CaseExpr"));
}

#[test]
fn test_truncation_path_error() {
    let error = truncation_path_error("[0].targetList does not exist");
    assert!(format!("{:?}", error).contains("[0].targetList"));
}

#[test]
fn test_input_format_error() {
    let error = input_format_error("expected value at line 1 column 1");
    assert!(format!("{:?}", error).contains("expected value"));
}

#[test]
fn test_config_error() {
    let error = config_error("Unknown dialect: oracle");
    assert!(format!("{:?}", error).contains("oracle"));
}
