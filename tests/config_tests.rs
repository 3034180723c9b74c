use sql_query_inspector::{
    config::{Config, DEFAULT_MAX_LENGTH, TruncateConfig, parse_dialect},
    query::SqlDialect
};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.truncate.max_length, DEFAULT_MAX_LENGTH);
    assert!(config.parser.dialect.is_none());
    assert!(config.aliases.is_empty());
}

#[test]
fn test_default_truncate_config() {
    assert_eq!(TruncateConfig::default().max_length, 1000);
}

#[test]
fn test_from_toml_full() {
    let config = Config::from_toml(
        r#"
[parser]
dialect = "sqlite"

[truncate]
max_length = 240

[aliases]
a = "accounts"
o = "sales.orders"
"#
    )
    .unwrap();

    assert_eq!(config.dialect().unwrap(), Some(SqlDialect::SQLite));
    assert_eq!(config.truncate.max_length, 240);
    assert_eq!(config.aliases.get("o").map(String::as_str), Some("sales.orders"));
}

#[test]
fn test_from_toml_partial_sections() {
    let config = Config::from_toml("[truncate]\n").unwrap();
    assert_eq!(config.truncate.max_length, DEFAULT_MAX_LENGTH);

    let config = Config::from_toml("").unwrap();
    assert!(config.aliases.is_empty());
}

#[test]
fn test_from_toml_invalid() {
    let err = Config::from_toml("[truncate]\nmax_length = \"long\"").unwrap_err();
    assert!(format!("{:?}", err).contains("Invalid config file"));
}

#[test]
fn test_from_toml_unknown_dialect() {
    assert!(Config::from_toml("[parser]\ndialect = \"oracle\"").is_err());
}

#[test]
fn test_parse_dialect_names() {
    assert_eq!(parse_dialect("generic").unwrap(), SqlDialect::Generic);
    assert_eq!(parse_dialect("MySQL").unwrap(), SqlDialect::MySQL);
    assert_eq!(parse_dialect("postgres").unwrap(), SqlDialect::PostgreSQL);
    assert_eq!(parse_dialect(" clickhouse ").unwrap(), SqlDialect::ClickHouse);
}
