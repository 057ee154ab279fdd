//! Error types for mysql-qb

use crate::value::SqlValue;
use thiserror::Error;

/// Result type alias for mysql-qb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum QbError {
    /// Statement exported without a target table
    #[error("[{0}] Missing table.")]
    MissingTable(&'static str),

    /// UPDATE exported with no assignments
    #[error("[UpdateQuery] Missing set items.")]
    MissingSetItems,

    /// CREATE TABLE column without a name
    #[error("[CreateTableQuery] Column missing name.")]
    ColumnMissingName,

    /// CREATE TABLE column without a type
    #[error("[CreateTableQuery] Column '{column}' missing type.")]
    ColumnMissingType { column: String },

    /// ORDER BY attached with no columns
    #[error("[SelectQuery] Need to set columns to be ordered by.")]
    EmptyOrderColumns,

    /// Offset set before a limit
    #[error("[SelectQuery] Need to set limit before setting startItem.")]
    LimitRequiredForOffset,

    /// Placeholder count and value count disagree
    #[error("Mismatch between placeholders and values: {placeholders} placeholder(s), {values} value(s)")]
    ParameterCountMismatch { placeholders: usize, values: usize },

    /// The driver rejected a statement
    #[error("Error: {message}.\nQuery: {sql}\nItems: {}", render_params(.params))]
    ExecutionFailed {
        message: String,
        sql: String,
        params: Vec<SqlValue>,
        #[source]
        source: mysql_async::Error,
    },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Value decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

fn render_params(params: &[SqlValue]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl QbError {
    /// Wrap a driver error with the statement that caused it.
    pub fn execution_failed(
        source: mysql_async::Error,
        sql: impl Into<String>,
        params: &[SqlValue],
    ) -> Self {
        Self::ExecutionFailed {
            message: source.to_string(),
            sql: sql.into(),
            params: params.to_vec(),
            source,
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while assembling a statement (before any I/O).
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::MissingTable(_)
                | Self::MissingSetItems
                | Self::ColumnMissingName
                | Self::ColumnMissingType { .. }
                | Self::EmptyOrderColumns
                | Self::LimitRequiredForOffset
                | Self::ParameterCountMismatch { .. }
        )
    }

    /// Check if this is an execution failure reported by the driver
    pub fn is_execution_failed(&self) -> bool {
        matches!(self, Self::ExecutionFailed { .. })
    }

    /// The statement text attached to an execution failure.
    pub fn failed_sql(&self) -> Option<&str> {
        match self {
            Self::ExecutionFailed { sql, .. } => Some(sql),
            _ => None,
        }
    }
}

impl From<mysql_async::UrlError> for QbError {
    fn from(err: mysql_async::UrlError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_are_classified() {
        assert!(QbError::MissingTable("SelectQuery").is_build_error());
        assert!(QbError::LimitRequiredForOffset.is_build_error());
        assert!(
            QbError::ParameterCountMismatch {
                placeholders: 2,
                values: 1
            }
            .is_build_error()
        );
        assert!(!QbError::Connection("refused".into()).is_build_error());
    }

    #[test]
    fn messages_name_the_statement() {
        assert_eq!(
            QbError::MissingTable("DeleteQuery").to_string(),
            "[DeleteQuery] Missing table."
        );
        assert_eq!(
            QbError::ColumnMissingType {
                column: "id".into()
            }
            .to_string(),
            "[CreateTableQuery] Column 'id' missing type."
        );
    }

    #[test]
    fn execution_failed_carries_statement_and_params() {
        let source = mysql_async::Error::Driver(mysql_async::DriverError::PoolDisconnected);
        let err = QbError::execution_failed(
            source,
            "SELECT * FROM users WHERE id = ?",
            &[SqlValue::Int(7), SqlValue::Text("x".into())],
        );
        assert!(err.is_execution_failed());
        assert_eq!(err.failed_sql(), Some("SELECT * FROM users WHERE id = ?"));
        let message = err.to_string();
        assert!(message.contains("Query: SELECT * FROM users WHERE id = ?"));
        assert!(message.contains("Items: 7, x"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
