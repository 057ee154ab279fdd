//! Table existence probe.

use crate::error::QbResult;
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, require_table};
use crate::result::TableExistsResult;
use crate::value::SqlValue;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableExistsProps {
    pub table: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialTableExistsProps {
    pub table: Option<String>,
}

impl From<TableExistsProps> for PartialTableExistsProps {
    fn from(p: TableExistsProps) -> Self {
        Self {
            table: Some(p.table),
        }
    }
}

/// Checks whether a table exists in the connection's current schema.
///
/// The table name is escaped as a string literal because it is compared
/// against `information_schema.tables.table_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExistsBuilder {
    props: TableExistsProps,
}

impl TableExistsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    pub fn props(&self) -> &TableExistsProps {
        &self.props
    }
}

impl Import for TableExistsBuilder {
    type Props = PartialTableExistsProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        merge(&mut self.props.table, props.into().table);
        self
    }
}

impl Statement for TableExistsBuilder {
    type Output = TableExistsResult;

    const KIND: StatementKind = StatementKind::TableExists;

    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String> {
        require_table(&self.props.table, Self::KIND)?;
        let name = escaper.escape(&SqlValue::Text(self.props.table.clone()));
        Ok(format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = {name};"
        ))
    }
}
