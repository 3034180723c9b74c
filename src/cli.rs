use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Query Inspector - Extract filter columns and truncate SQL queries
#[derive(Parser, Debug)]
#[command(name = "sql-query-inspector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the columns each query filters by
    Columns {
        /// Path to SQL queries file (use - for stdin)
        #[arg(short, long)]
        queries: PathBuf,

        /// SQL dialect for parsing
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Input format of the queries file
        #[arg(short, long, value_enum, default_value = "sql")]
        input: InputFormat,

        /// Extra alias mapping, e.g. `a=accounts` (repeatable)
        #[arg(short, long = "alias", value_name = "ALIAS=TABLE")]
        aliases: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Render each query within a character budget
    Truncate {
        /// Path to SQL queries file (use - for stdin)
        #[arg(short, long)]
        queries: PathBuf,

        /// Maximum rendered length in characters
        #[arg(short, long)]
        max_length: Option<usize>,

        /// SQL dialect for parsing
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Input format of the queries file
        #[arg(short, long, value_enum, default_value = "sql")]
        input: InputFormat,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
    Clickhouse
}

/// How the queries file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// SQL text, parsed with the selected dialect
    Sql,
    /// JSON array of serialized statement trees
    Json
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
