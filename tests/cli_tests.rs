// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use clap::Parser;
use sql_query_inspector::cli::{Cli, Commands, Dialect, Format, InputFormat};

#[test]
fn test_columns_defaults() {
    let cli = Cli::try_parse_from(["sql-query-inspector", "columns", "-q", "queries.sql"]).unwrap();
    assert!(!cli.verbose);
    match cli.command {
        Commands::Columns {
            queries,
            dialect,
            input,
            aliases,
            output_format,
            no_color
        } => {
            assert_eq!(queries.to_str(), Some("queries.sql"));
            assert!(dialect.is_none());
            assert_eq!(input, InputFormat::Sql);
            assert!(aliases.is_empty());
            assert_eq!(output_format, Format::Text);
            assert!(!no_color);
        }
        other => panic!("unexpected command: {:?}", other)
    }
}

#[test]
fn test_columns_repeated_aliases() {
    let cli = Cli::try_parse_from([
        "sql-query-inspector",
        "columns",
        "-q",
        "-",
        "--alias",
        "a=accounts",
        "-a",
        "o=orders",
        "--dialect",
        "postgresql",
        "-f",
        "json"
    ])
    .unwrap();
    let Commands::Columns {
        aliases,
        dialect,
        output_format,
        ..
    } = cli.command
    else {
        panic!("expected columns command");
    };
    assert_eq!(aliases, vec!["a=accounts", "o=orders"]);
    assert_eq!(dialect, Some(Dialect::Postgresql));
    assert_eq!(output_format, Format::Json);
}

#[test]
fn test_truncate_options() {
    let cli = Cli::try_parse_from([
        "sql-query-inspector",
        "--verbose",
        "truncate",
        "-q",
        "queries.json",
        "-m",
        "80",
        "--input",
        "json",
        "--no-color"
    ])
    .unwrap();
    assert!(cli.verbose);
    let Commands::Truncate {
        max_length,
        input,
        no_color,
        ..
    } = cli.command
    else {
        panic!("expected truncate command");
    };
    assert_eq!(max_length, Some(80));
    assert_eq!(input, InputFormat::Json);
    assert!(no_color);
}

#[test]
fn test_truncate_rejects_negative_length() {
    assert!(
        Cli::try_parse_from(["sql-query-inspector", "truncate", "-q", "q.sql", "-m", "-5"])
            .is_err()
    );
}

#[test]
fn test_missing_queries_rejected() {
    assert!(Cli::try_parse_from(["sql-query-inspector", "columns"]).is_err());
}

#[test]
fn test_unknown_dialect_rejected() {
    assert!(
        Cli::try_parse_from([
            "sql-query-inspector",
            "columns",
            "-q",
            "q.sql",
            "--dialect",
            "oracle"
        ])
        .is_err()
    );
}
