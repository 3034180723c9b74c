pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create query parse error with optional position info
pub fn query_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_sql_error("Query parse error", &msg))
}

/// Create error for a serialized node tree that could not be decoded
pub fn input_format_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid node tree input: {}", message.into()))
}

/// Create deparse error
///
/// Raised when the renderer meets a tree it cannot turn back into SQL text.
pub fn deparse_error(message: impl Into<String>) -> AppError {
    AppError::internal(format!("Deparse error: {}", message.into()))
}

/// Create error for a location path that does not fit the tree it is applied
/// to
pub fn truncation_path_error(message: impl Into<String>) -> AppError {
    AppError::internal(format!("Truncation path error: {}", message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str) -> String {
    // sqlparser format: "... at Line: X, Column: Y"
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column: ";

    let line_start = message.find(line_marker)? + line_marker.len();
    let col_start = message[line_start..].find(col_marker)?;
    let line_str = &message[line_start..line_start + col_start];
    let col_num_start = line_start + col_start + col_marker.len();
    let col_end = message[col_num_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(message.len() - col_num_start);
    let col_str = &message[col_num_start..col_num_start + col_end];

    match (line_str.parse(), col_str.parse()) {
        (Ok(line), Ok(column)) => Some(SqlPosition { line, column }),
        _ => None
    }
}
