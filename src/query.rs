mod convert;

use log::debug;
use rayon::prelude::*;
use sqlparser::{
    dialect::{
        ClickHouseDialect, Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
    },
    parser::Parser
};

pub use convert::convert_statement;

use crate::{
    error::{AppResult, query_parse_error},
    node::Node
};

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite,
    ClickHouse
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::ClickHouse => Box::new(ClickHouseDialect {})
        }
    }
}

/// Parse SQL text into node trees, one per statement
///
/// # Notes
///
/// - Statements are converted in parallel
/// - Constructs the node model does not describe are kept as
///   [`Node::Other`] with their SQL text, so every tree renders back
pub fn parse_statements(sql: &str, dialect: SqlDialect) -> AppResult<Vec<Node>> {
    let parser_dialect = dialect.into_parser_dialect();
    let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
        .map_err(|e| query_parse_error(e.to_string()))?;
    debug!("parsed {} statements as {:?}", statements.len(), dialect);
    Ok(statements.par_iter().map(convert_statement).collect())
}
