//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-query-inspector.toml` in current directory
//! 4. `~/.config/sql-query-inspector/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [parser]
//! dialect = "postgresql"       # generic, mysql, postgresql, sqlite, clickhouse
//!
//! [truncate]
//! max_length = 1000
//!
//! [aliases]
//! a = "accounts"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_INSPECTOR_MAX_LENGTH` | Truncation budget in characters |
//! | `SQL_INSPECTOR_DIALECT` | Dialect name |

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    error::{AppResult, config_error},
    query::SqlDialect
};

/// Default truncation budget in characters
pub const DEFAULT_MAX_LENGTH: usize = 1000;

const MAX_LENGTH_VAR: &str = "SQL_INSPECTOR_MAX_LENGTH";
const DIALECT_VAR: &str = "SQL_INSPECTOR_DIALECT";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub parser:   ParserConfig,
    #[serde(default)]
    pub truncate: TruncateConfig,
    /// Extra alias entries (alias -> table) merged into every alias map
    #[serde(default)]
    pub aliases:  HashMap<String, String>
}

/// Parser configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ParserConfig {
    pub dialect: Option<String>
}

/// Truncation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TruncateConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH
        }
    }
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-query-inspector.toml)
    /// 3. Config file in home directory
    ///    (~/.config/sql-query-inspector/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-query-inspector")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-query-inspector.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(
            env::var(MAX_LENGTH_VAR).ok(),
            env::var(DIALECT_VAR).ok()
        )?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
        config.dialect()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Apply environment overrides
    pub fn apply_env(
        &mut self,
        max_length: Option<String>,
        dialect: Option<String>
    ) -> AppResult<()> {
        if let Some(value) = max_length {
            self.truncate.max_length = value.trim().parse().map_err(|_| {
                config_error(format!(
                    "{} must be a positive integer, got '{}'",
                    MAX_LENGTH_VAR, value
                ))
            })?;
        }
        if let Some(value) = dialect {
            self.parser.dialect = Some(value);
            self.dialect()?;
        }
        Ok(())
    }

    /// Configured dialect, if any
    pub fn dialect(&self) -> AppResult<Option<SqlDialect>> {
        self.parser
            .dialect
            .as_deref()
            .map(parse_dialect)
            .transpose()
    }
}

/// Dialect from its configuration name (case-insensitive)
pub fn parse_dialect(name: &str) -> AppResult<SqlDialect> {
    match name.trim().to_ascii_lowercase().as_str() {
        "generic" => Ok(SqlDialect::Generic),
        "mysql" => Ok(SqlDialect::MySQL),
        "postgresql" | "postgres" => Ok(SqlDialect::PostgreSQL),
        "sqlite" => Ok(SqlDialect::SQLite),
        "clickhouse" => Ok(SqlDialect::ClickHouse),
        other => Err(config_error(format!("Unknown dialect: {}", other)))
    }
}
