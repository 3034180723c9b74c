use colored::Colorize;
use serde::Serialize;

use crate::filter::FilterColumn;

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true
        }
    }
}

/// Filter columns of one top-level statement
#[derive(Debug, Clone, Serialize)]
pub struct StatementColumns {
    /// 1-based position in the input
    pub statement: usize,
    pub kind:      String,
    pub columns:   Vec<FilterColumn>
}

/// Truncation result of one top-level statement
#[derive(Debug, Clone, Serialize)]
pub struct TruncatedStatement {
    /// 1-based position in the input
    pub statement:       usize,
    pub original_length: usize,
    pub length:          usize,
    pub truncated:       bool,
    pub sql:             String
}

/// Format filter columns based on output options
pub fn format_filter_columns(results: &[StatementColumns], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(results).unwrap_or_default(),
        OutputFormat::Text => format_columns_text(results, opts)
    }
}

/// Format truncated statements based on output options
pub fn format_truncations(results: &[TruncatedStatement], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(results).unwrap_or_default(),
        OutputFormat::Text => format_truncations_text(results, opts)
    }
}

fn header(text: String, opts: &OutputOptions) -> String {
    if opts.colored {
        text.cyan().bold().to_string()
    } else {
        text
    }
}

fn format_columns_text(results: &[StatementColumns], opts: &OutputOptions) -> String {
    let mut output = String::new();

    for result in results {
        output.push_str(&header(
            format!("Statement #{} ({}):", result.statement, result.kind),
            opts
        ));
        output.push('\n');

        if result.columns.is_empty() {
            let none = "  (no filter columns)";
            if opts.colored {
                output.push_str(&none.dimmed().to_string());
            } else {
                output.push_str(none);
            }
            output.push('\n');
        }
        for column in &result.columns {
            let line = match &column.table {
                Some(table) if opts.colored => format!("{}.{}", table.yellow(), column.column),
                _ => column.to_string()
            };
            output.push_str(&format!("  {}\n", line));
        }
        output.push('\n');
    }

    output
}

fn format_truncations_text(results: &[TruncatedStatement], opts: &OutputOptions) -> String {
    let mut output = String::new();

    for result in results {
        let status = if result.truncated {
            format!("truncated {} -> {}", result.original_length, result.length)
        } else {
            format!("{} chars", result.length)
        };
        let status = match (opts.colored, result.truncated) {
            (true, true) => status.yellow().to_string(),
            (true, false) => status.green().to_string(),
            (false, _) => status
        };
        output.push_str(&header(format!("Statement #{}", result.statement), opts));
        output.push_str(&format!(" [{}]\n", status));
        output.push_str(&result.sql);
        output.push_str("\n\n");
    }

    output
}
