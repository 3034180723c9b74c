//! # SQL Query Inspector
//!
//! Filter column extraction and budget-aware truncation for SQL queries.
//!
//! `sql-query-inspector` parses SQL into a tagged statement tree and answers
//! two questions about each top-level statement: which columns it filters by
//! (WHERE, JOIN ... ON and subquery predicates, with table aliases resolved),
//! and how to render it within a character budget while keeping its overall
//! shape readable.
//!
//! # Quick Start
//!
//! ```bash
//! # Columns used in filtering positions
//! sql-query-inspector columns -q queries.sql
//!
//! # Resolve an alias the query does not declare itself
//! sql-query-inspector columns -q queries.sql --alias a=accounts
//!
//! # Render each query in at most 120 characters
//! sql-query-inspector truncate -q queries.sql -m 120
//!
//! # Stream queries from stdin, JSON output
//! echo "SELECT * FROM users WHERE id = 1" | sql-query-inspector columns -q - -f json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_INSPECTOR_MAX_LENGTH`,
//!    `SQL_INSPECTOR_DIALECT`)
//! 3. `.sql-query-inspector.toml` in current directory
//! 4. `~/.config/sql-query-inspector/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [parser]
//! dialect = "postgresql"
//!
//! [truncate]
//! max_length = 500
//!
//! [aliases]
//! a = "accounts"
//! ```
//!
//! # Truncation
//!
//! When a statement renders longer than the budget, its target lists, WHERE
//! clauses, CTE bodies and column lists are replaced by `...` one at a time,
//! deepest and longest first, until the rendering fits. If no replacement
//! is enough, the rendered text is cut to the budget and ends in `...`.
//!
//! # Input
//!
//! - `--input sql` (default) - SQL text, parsed with `--dialect`
//! - `--input json` - a JSON array of serialized statement trees
//!
//! # Output Formats
//!
//! - `text` - Human-readable colored output (default)
//! - `json` - Structured JSON for programmatic processing
//! - `yaml` - YAML format
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Any error (unreadable input, parse failure, bad configuration)

use std::process;

use clap::Parser;
use log::LevelFilter;
use sql_query_inspector::{
    app::{ColumnsParams, TruncateParams, run_columns, run_truncate},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(cli: Cli) -> AppResult<String> {
    let config = Config::load()?;

    match cli.command {
        Commands::Columns {
            queries,
            dialect,
            input,
            aliases,
            output_format,
            no_color
        } => run_columns(
            ColumnsParams {
                queries_path: queries.display().to_string(),
                dialect,
                input,
                aliases,
                output_format,
                no_color
            },
            &config
        ),
        Commands::Truncate {
            queries,
            max_length,
            dialect,
            input,
            output_format,
            no_color
        } => run_truncate(
            TruncateParams {
                queries_path: queries.display().to_string(),
                max_length,
                dialect,
                input,
                output_format,
                no_color
            },
            &config
        )
    }
}
