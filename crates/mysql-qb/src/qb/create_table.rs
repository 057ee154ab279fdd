//! CREATE TABLE statement builder.

use crate::error::{QbError, QbResult};
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, require_table};
use crate::qb::types::ColumnDef;
use crate::result::CreateTableResult;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTableProps {
    pub table: String,
    pub columns: Vec<ColumnDef>,
    pub if_not_exists: bool,
}

/// [`CreateTableProps`] with every field optional, for [`Import`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialCreateTableProps {
    pub table: Option<String>,
    pub columns: Option<Vec<ColumnDef>>,
    pub if_not_exists: Option<bool>,
}

impl From<CreateTableProps> for PartialCreateTableProps {
    fn from(p: CreateTableProps) -> Self {
        Self {
            table: Some(p.table),
            columns: Some(p.columns),
            if_not_exists: Some(p.if_not_exists),
        }
    }
}

/// CREATE TABLE statement builder.
///
/// ```rust
/// use mysql_qb::qb::{ColumnDef, CreateTableBuilder, Statement};
///
/// let sql = CreateTableBuilder::new()
///     .table("users")
///     .if_not_exists(true)
///     .column(ColumnDef::new("id", "INT").auto_increment().primary_key())
///     .column(ColumnDef::new("name", "VARCHAR(64)").unique())
///     .export()?;
/// assert_eq!(
///     sql,
///     "CREATE TABLE users IF NOT EXISTS (id INT AUTO_INCREMENT PRIMARY KEY NOT NULL, \
///      name VARCHAR(64) UNIQUE NOT NULL);"
/// );
/// # Ok::<(), mysql_qb::QbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTableBuilder {
    props: CreateTableProps,
}

impl CreateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.props.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.props.columns.extend(columns);
        self
    }

    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.props.if_not_exists = if_not_exists;
        self
    }

    pub fn props(&self) -> &CreateTableProps {
        &self.props
    }
}

impl Import for CreateTableBuilder {
    type Props = PartialCreateTableProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        let p = props.into();
        merge(&mut self.props.table, p.table);
        merge(&mut self.props.columns, p.columns);
        merge(&mut self.props.if_not_exists, p.if_not_exists);
        self
    }
}

fn column_sql(column: &ColumnDef) -> QbResult<String> {
    let name = column
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(QbError::ColumnMissingName)?;
    let column_type = column
        .column_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| QbError::ColumnMissingType {
            column: name.to_string(),
        })?;

    let mut def = format!("{name} {column_type}");
    if column.auto_increment {
        def.push_str(" AUTO_INCREMENT");
    }
    if column.primary_key {
        def.push_str(" PRIMARY KEY");
    }
    if column.unique {
        def.push_str(" UNIQUE");
    }
    def.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
    if let Some(default) = column.default.as_deref().filter(|d| !d.is_empty()) {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    Ok(def)
}

impl Statement for CreateTableBuilder {
    type Output = CreateTableResult;

    const KIND: StatementKind = StatementKind::CreateTable;

    fn export_with<E: Escape + ?Sized>(&self, _escaper: &E) -> QbResult<String> {
        let p = &self.props;
        require_table(&p.table, Self::KIND)?;

        let columns = p
            .columns
            .iter()
            .map(column_sql)
            .collect::<QbResult<Vec<_>>>()?;

        let mut sql = format!("CREATE TABLE {}", p.table);
        if p.if_not_exists {
            sql.push_str(" IF NOT EXISTS");
        }
        sql.push_str(&format!(" ({});", columns.join(", ")));
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_missing_table() {
        let err = CreateTableBuilder::new()
            .column(ColumnDef::new("id", "INT"))
            .export()
            .unwrap_err();
        assert!(matches!(err, QbError::MissingTable("CreateTableQuery")));
    }

    #[test]
    fn test_create_table_full_column_token_order() {
        let sql = CreateTableBuilder::new()
            .table("users")
            .column(
                ColumnDef::new("id", "INT")
                    .auto_increment()
                    .primary_key()
                    .unique()
                    .nullable(true)
                    .default_value("0"),
            )
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE users (id INT AUTO_INCREMENT PRIMARY KEY UNIQUE NULL DEFAULT 0);"
        );
    }

    #[test]
    fn test_create_table_column_missing_name_aborts() {
        let err = CreateTableBuilder::new()
            .table("users")
            .column(ColumnDef::new("id", "INT"))
            .column(ColumnDef::default().column_type("TEXT"))
            .export()
            .unwrap_err();
        assert!(matches!(err, QbError::ColumnMissingName));
    }

    #[test]
    fn test_create_table_column_missing_type_aborts() {
        let err = CreateTableBuilder::new()
            .table("users")
            .column(ColumnDef::default().name("email"))
            .export()
            .unwrap_err();
        assert!(matches!(err, QbError::ColumnMissingType { column } if column == "email"));
    }

    #[test]
    fn test_create_table_if_not_exists_toggle() {
        let builder = CreateTableBuilder::new()
            .table("t")
            .columns([ColumnDef::new("a", "INT"), ColumnDef::new("b", "TEXT").nullable(true)]);
        assert_eq!(
            builder.clone().if_not_exists(true).export().unwrap(),
            "CREATE TABLE t IF NOT EXISTS (a INT NOT NULL, b TEXT NULL);"
        );
        assert_eq!(
            builder.if_not_exists(false).export().unwrap(),
            "CREATE TABLE t (a INT NOT NULL, b TEXT NULL);"
        );
    }

    #[test]
    fn test_create_table_string_default() {
        let sql = CreateTableBuilder::new()
            .table("users")
            .column(ColumnDef::new("role", "VARCHAR(16)").default_value("'guest'"))
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE users (role VARCHAR(16) NOT NULL DEFAULT 'guest');"
        );
    }
}
