//! Trait definitions for statement builders.

use crate::error::QbResult;
use crate::escape::{Escape, MySqlEscaper};
use crate::result::QueryResult;
use std::fmt;

/// The kind of statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    TableExists,
    /// Hand-written SQL sent through `query()`
    Raw,
}

impl StatementKind {
    /// Name used in error messages and log fields.
    pub fn label(self) -> &'static str {
        match self {
            StatementKind::Select => "SelectQuery",
            StatementKind::Insert => "InsertQuery",
            StatementKind::Update => "UpdateQuery",
            StatementKind::Delete => "DeleteQuery",
            StatementKind::CreateTable => "CreateTableQuery",
            StatementKind::TableExists => "TableExistsQuery",
            StatementKind::Raw => "Query",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base trait for all statement builders.
///
/// `export_with` is the single point where the statement is validated and
/// assembled. It is pure: calling it twice on an unchanged builder yields the
/// same string.
pub trait Statement {
    /// Typed view over the raw response of this statement.
    type Output: From<QueryResult>;

    const KIND: StatementKind;

    /// Build the final SQL, escaping literals with `escaper`.
    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String>;

    /// Build the final SQL with default MySQL escaping.
    fn export(&self) -> QbResult<String> {
        self.export_with(&MySqlEscaper::new())
    }
}

/// Builders that take configuration from a props record.
pub trait Import {
    /// Partial record: a `None` field keeps the builder's current value.
    type Props;

    /// Merge `props` into this builder's configuration.
    ///
    /// A full props record converts into a partial one with every field set,
    /// so importing it replaces the whole configuration.
    fn import(self, props: impl Into<Self::Props>) -> Self;
}

/// Overwrite `slot` when `value` is present.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Append ` WHERE c1 AND c2` when conditions are present.
pub(crate) fn push_where(sql: &mut String, conditions: &[String]) {
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
}

pub(crate) fn require_table(table: &str, kind: StatementKind) -> QbResult<()> {
    if table.is_empty() {
        return Err(crate::error::QbError::MissingTable(kind.label()));
    }
    Ok(())
}
