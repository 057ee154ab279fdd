//! `tracing` output for executed statements.
//!
//! Events are emitted under the `mysql_qb.sql` target so they can be filtered
//! independently from the rest of an application, e.g.
//! `RUST_LOG=mysql_qb.sql=debug`.

use crate::error::QbError;
use crate::qb::StatementKind;
use tracing::Level;

pub(crate) const TARGET: &str = "mysql_qb.sql";

/// Controls how statements are logged before they are sent.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Emit a debug event per statement.
    pub enabled: bool,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that stays silent for successful statements. Failures are still reported.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn before_query(&self, kind: StatementKind, sql: &str, param_count: usize) {
        if !self.enabled || !tracing::enabled!(target: TARGET, Level::DEBUG) {
            return;
        }
        let sql = self.truncate_sql(sql);
        tracing::debug!(
            target: TARGET,
            kind = %kind,
            param_count,
            sql = %sql,
            "executing statement"
        );
    }

    pub(crate) fn query_failed(&self, kind: StatementKind, err: &QbError) {
        let sql = err.failed_sql().map(|s| self.truncate_sql(s));
        tracing::error!(
            target: TARGET,
            kind = %kind,
            sql = sql.as_deref().unwrap_or("-"),
            error = %err,
            "statement failed"
        );
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
