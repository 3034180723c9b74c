//! Application types for CLI commands.
//!
//! Parameters passed from the CLI layer to the command runners.

use crate::cli::{Dialect, Format, InputFormat};

/// Parameters for the `columns` command.
///
/// # Example
///
/// ```
/// use sql_query_inspector::{
///     app::ColumnsParams,
///     cli::{Format, InputFormat}
/// };
///
/// let params = ColumnsParams {
///     queries_path:  "queries.sql".to_string(),
///     dialect:       None,
///     input:         InputFormat::Sql,
///     aliases:       vec!["a=accounts".to_string()],
///     output_format: Format::Text,
///     no_color:      false
/// };
/// assert_eq!(params.aliases.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnsParams {
    /// Path to queries file or "-" for stdin input.
    pub queries_path:  String,
    /// SQL dialect; falls back to configuration, then generic.
    pub dialect:       Option<Dialect>,
    /// Whether the input is SQL text or serialized trees.
    pub input:         InputFormat,
    /// Extra `alias=table` entries.
    pub aliases:       Vec<String>,
    pub output_format: Format,
    pub no_color:      bool
}

/// Parameters for the `truncate` command.
#[derive(Debug, Clone)]
pub struct TruncateParams {
    /// Path to queries file or "-" for stdin input.
    pub queries_path:  String,
    /// Character budget; falls back to configuration.
    pub max_length:    Option<usize>,
    pub dialect:       Option<Dialect>,
    pub input:         InputFormat,
    pub output_format: Format,
    pub no_color:      bool
}
