//! Application logic for the SQL Query Inspector CLI.
//!
//! This module contains the command runners separated from the main entry
//! point to enable testing. Every top-level statement of the input is
//! processed as an independent query.

mod convert;
mod types;

use std::{
    fs::read_to_string,
    io::{self, Read},
    slice
};

pub use convert::{convert_dialect, convert_format, create_output_options};
use log::debug;
use rayon::prelude::*;
pub use types::{ColumnsParams, TruncateParams};

use crate::{
    aliases::AliasMap,
    cache::{cache_statements, get_cached},
    cli::{Dialect, InputFormat},
    config::Config,
    deparse::{Deparse, SqlDeparser},
    error::{AppResult, config_error, file_read_error, input_format_error},
    filter::filter_columns,
    node::Node,
    output::{StatementColumns, TruncatedStatement, format_filter_columns, format_truncations},
    query::{SqlDialect, parse_statements},
    truncate::truncate
};

/// Read queries from file or stdin
pub fn read_queries_input(path: &str) -> AppResult<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))
    }
}

/// Parse statements with caching
pub fn parse_statements_cached(sql: &str, dialect: SqlDialect) -> AppResult<Vec<Node>> {
    if let Some(cached) = get_cached(sql, dialect) {
        Ok(cached)
    } else {
        let statements = parse_statements(sql, dialect)?;
        cache_statements(sql, dialect, statements.clone());
        Ok(statements)
    }
}

/// Statement trees from SQL text or from a JSON array of serialized nodes
pub fn load_statements(
    content: &str,
    input: InputFormat,
    dialect: SqlDialect
) -> AppResult<Vec<Node>> {
    match input {
        InputFormat::Sql => parse_statements_cached(content, dialect),
        InputFormat::Json => {
            serde_json::from_str(content).map_err(|e| input_format_error(e.to_string()))
        }
    }
}

/// Dialect from the command line, else from configuration, else generic
pub fn resolve_dialect(dialect: Option<Dialect>, config: &Config) -> AppResult<SqlDialect> {
    match dialect {
        Some(dialect) => Ok(convert_dialect(dialect)),
        None => Ok(config.dialect()?.unwrap_or_default())
    }
}

/// Parse `alias=table` pairs
pub fn parse_alias_overrides(entries: &[String]) -> AppResult<Vec<(String, String)>> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((alias, table)) if !alias.trim().is_empty() && !table.trim().is_empty() => {
                Ok((alias.trim().to_string(), table.trim().to_string()))
            }
            _ => Err(config_error(format!(
                "Invalid alias '{}', expected ALIAS=TABLE",
                entry
            )))
        })
        .collect()
}

/// Alias map of one statement, with configured entries merged on top
pub fn statement_aliases(statement: &Node, extra: &[(String, String)]) -> AliasMap {
    let mut aliases = AliasMap::from_statements(slice::from_ref(statement));
    aliases.extend(extra.iter().map(|(alias, table)| (alias.as_str(), table.as_str())));
    aliases
}

/// Filter columns of every statement
pub fn collect_columns(statements: &[Node], extra: &[(String, String)]) -> Vec<StatementColumns> {
    statements
        .par_iter()
        .enumerate()
        .map(|(i, statement)| {
            let aliases = statement_aliases(statement, extra);
            StatementColumns {
                statement: i + 1,
                kind:      statement.kind_name().to_string(),
                columns:   filter_columns(slice::from_ref(statement), &aliases)
            }
        })
        .collect()
}

/// Render every statement within `max_length` characters
pub fn truncate_statements<D>(
    statements: &[Node],
    max_length: usize,
    deparser: &D
) -> AppResult<Vec<TruncatedStatement>>
where
    D: Deparse + Sync
{
    statements
        .par_iter()
        .enumerate()
        .map(|(i, statement)| {
            let single = slice::from_ref(statement);
            let original = deparser.deparse(single)?;
            let sql = truncate(single, max_length, deparser)?;
            Ok(TruncatedStatement {
                statement:       i + 1,
                original_length: original.chars().count(),
                length:          sql.chars().count(),
                truncated:       sql != original,
                sql
            })
        })
        .collect()
}

/// Run the `columns` command and return its formatted output
pub fn run_columns(params: ColumnsParams, config: &Config) -> AppResult<String> {
    let dialect = resolve_dialect(params.dialect, config)?;
    let content = read_queries_input(&params.queries_path)?;
    let statements = load_statements(&content, params.input, dialect)?;
    debug!("collecting filter columns of {} statements", statements.len());

    let mut extra: Vec<(String, String)> = config
        .aliases
        .iter()
        .map(|(alias, table)| (alias.clone(), table.clone()))
        .collect();
    extra.sort();
    extra.extend(parse_alias_overrides(&params.aliases)?);

    let results = collect_columns(&statements, &extra);
    let opts = create_output_options(params.output_format, params.no_color);
    Ok(format_filter_columns(&results, &opts))
}

/// Run the `truncate` command and return its formatted output
pub fn run_truncate(params: TruncateParams, config: &Config) -> AppResult<String> {
    let dialect = resolve_dialect(params.dialect, config)?;
    let max_length = params.max_length.unwrap_or(config.truncate.max_length);
    let content = read_queries_input(&params.queries_path)?;
    let statements = load_statements(&content, params.input, dialect)?;
    debug!(
        "truncating {} statements to {} characters",
        statements.len(),
        max_length
    );

    let results = truncate_statements(&statements, max_length, &SqlDeparser)?;
    let opts = create_output_options(params.output_format, params.no_color);
    Ok(format_truncations(&results, &opts))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::{
        cli::Format,
        filter::FilterColumn,
        output::OutputFormat
    };

    fn temp_sql(sql: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sql).unwrap();
        file
    }

    #[test]
    fn test_convert_dialect_clickhouse() {
        assert_eq!(convert_dialect(Dialect::Clickhouse), SqlDialect::ClickHouse);
    }

    #[test]
    fn test_convert_format_yaml() {
        assert_eq!(convert_format(Format::Yaml), OutputFormat::Yaml);
    }

    #[test]
    fn test_create_output_options_no_color() {
        let opts = create_output_options(Format::Json, true);
        assert_eq!(opts.format, OutputFormat::Json);
        assert!(!opts.colored);
    }

    #[test]
    fn test_resolve_dialect_prefers_cli() {
        let mut config = Config::default();
        config.parser.dialect = Some("mysql".to_string());
        assert_eq!(
            resolve_dialect(Some(Dialect::Sqlite), &config).unwrap(),
            SqlDialect::SQLite
        );
        assert_eq!(resolve_dialect(None, &config).unwrap(), SqlDialect::MySQL);
        assert_eq!(
            resolve_dialect(None, &Config::default()).unwrap(),
            SqlDialect::Generic
        );
    }

    #[test]
    fn test_parse_alias_overrides() {
        let parsed = parse_alias_overrides(&["a = accounts".to_string()]).unwrap();
        assert_eq!(parsed, vec![("a".to_string(), "accounts".to_string())]);
        assert!(parse_alias_overrides(&["accounts".to_string()]).is_err());
        assert!(parse_alias_overrides(&["=accounts".to_string()]).is_err());
    }

    #[test]
    fn test_statement_aliases_overrides_win() {
        let statements = parse_statements("SELECT 1 FROM users u", SqlDialect::Generic).unwrap();
        let extra = vec![("u".to_string(), "people".to_string())];
        let aliases = statement_aliases(&statements[0], &extra);
        assert_eq!(aliases.resolve("u"), Some("people"));
    }

    #[test]
    fn test_collect_columns_per_statement() {
        let statements = parse_statements(
            "SELECT * FROM users u WHERE u.id = 1; DELETE FROM logs WHERE created_at < 5",
            SqlDialect::Generic
        )
        .unwrap();
        let results = collect_columns(&statements, &[]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].statement, 1);
        assert_eq!(results[0].columns, vec![FilterColumn::new(Some("users"), "id")]);
        assert_eq!(results[1].kind, "DeleteFrom");
        assert_eq!(results[1].columns, vec![FilterColumn::new(None, "created_at")]);
    }

    #[test]
    fn test_truncate_statements_within_budget() {
        let statements = parse_statements("SELECT a FROM t", SqlDialect::Generic).unwrap();
        let results = truncate_statements(&statements, 100, &SqlDeparser).unwrap();
        assert_eq!(results[0].sql, "SELECT a FROM t");
        assert!(!results[0].truncated);
        assert_eq!(results[0].length, results[0].original_length);
    }

    #[test]
    fn test_truncate_statements_over_budget() {
        let statements = parse_statements(
            "SELECT alpha, beta, gamma, delta FROM t",
            SqlDialect::Generic
        )
        .unwrap();
        let results = truncate_statements(&statements, 20, &SqlDeparser).unwrap();
        assert!(results[0].truncated);
        assert!(results[0].length <= 20);
    }

    #[test]
    fn test_load_statements_json() {
        let statements = parse_statements("SELECT a FROM t WHERE b = 1", SqlDialect::Generic).unwrap();
        let json = serde_json::to_string(&statements).unwrap();
        let loaded = load_statements(&json, InputFormat::Json, SqlDialect::Generic).unwrap();
        assert_eq!(loaded, statements);
    }

    #[test]
    fn test_load_statements_json_invalid() {
        let err = load_statements("{not json", InputFormat::Json, SqlDialect::Generic).unwrap_err();
        assert!(format!("{:?}", err).contains("Invalid node tree input"));
    }

    #[test]
    fn test_read_queries_input_missing_file() {
        assert!(read_queries_input("/nonexistent/queries.sql").is_err());
    }

    #[test]
    fn test_run_columns_with_cli_alias() {
        let file = temp_sql("SELECT * FROM t WHERE x.id = 1");
        let params = ColumnsParams {
            queries_path:  file.path().display().to_string(),
            dialect:       None,
            input:         InputFormat::Sql,
            aliases:       vec!["x=accounts".to_string()],
            output_format: Format::Json,
            no_color:      true
        };
        let output = run_columns(params, &Config::default()).unwrap();
        assert!(output.contains("\"table\": \"accounts\""));
        assert!(output.contains("\"column\": \"id\""));
    }

    #[test]
    fn test_run_truncate_uses_config_budget() {
        let file = temp_sql("SELECT alpha, beta, gamma, delta, epsilon FROM t");
        let mut config = Config::default();
        config.truncate.max_length = 25;
        let params = TruncateParams {
            queries_path:  file.path().display().to_string(),
            max_length:    None,
            dialect:       None,
            input:         InputFormat::Sql,
            output_format: Format::Text,
            no_color:      true
        };
        let output = run_truncate(params, &config).unwrap();
        assert!(output.contains("SELECT ... FROM t"));
        assert!(output.contains("truncated"));
    }
}
