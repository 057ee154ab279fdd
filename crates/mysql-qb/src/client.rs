//! Generic client trait for unified database access.

use crate::error::QbResult;
use crate::escape::Escape;
use crate::qb::{
    CreateTableBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, StatementKind,
    TableExistsBuilder, UpdateBuilder,
};
use crate::query::{
    CreateTableQuery, DeleteQuery, InsertQuery, Query, SelectQuery, TableExistsQuery, UpdateQuery,
};
use crate::result::QueryResult;
use crate::value::SqlValue;

/// A trait that unifies the pool facade and held connections.
///
/// Code that only builds and runs statements can accept `&impl GenericClient` and
/// work both inside and outside a transaction. Statement factories are provided
/// methods, so every client can start a builder bound to itself:
///
/// ```ignore
/// let users = db.select().from("users").where_("active = 1").await?;
///
/// let conn = db.begin_transaction().await?;
/// conn.update().table("users").set("active = 0").execute().await?;
/// db.commit(conn).await?;
/// ```
pub trait GenericClient: Escape + Send + Sync {
    /// Send one statement and return the raw response.
    ///
    /// When `items` is non-empty, the `?` placeholders of `sql` are substituted
    /// client-side with escaped literals before sending.
    fn query(
        &self,
        sql: &str,
        items: &[SqlValue],
    ) -> impl std::future::Future<Output = QbResult<QueryResult>> + Send;

    /// Same as [`GenericClient::query`], recording which builder produced `sql`.
    ///
    /// The default implementation ignores `kind`.
    fn query_tagged(
        &self,
        kind: StatementKind,
        sql: &str,
        items: &[SqlValue],
    ) -> impl std::future::Future<Output = QbResult<QueryResult>> + Send {
        let _ = kind;
        self.query(sql, items)
    }

    fn select(&self) -> SelectQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, SelectBuilder::new())
    }

    fn insert(&self) -> InsertQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, InsertBuilder::new())
    }

    fn update(&self) -> UpdateQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, UpdateBuilder::new())
    }

    fn delete(&self) -> DeleteQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, DeleteBuilder::new())
    }

    fn create_table(&self) -> CreateTableQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, CreateTableBuilder::new())
    }

    fn table_exists(&self) -> TableExistsQuery<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, TableExistsBuilder::new())
    }
}

/// Substitute `items` into `sql` when any are given.
pub(crate) fn prepare_sql<E: Escape + ?Sized>(
    escaper: &E,
    sql: &str,
    items: &[SqlValue],
) -> QbResult<String> {
    if items.is_empty() {
        Ok(sql.to_string())
    } else {
        escaper.generate_parameterized_query(sql, items)
    }
}
