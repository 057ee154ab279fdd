//! Statements bound to a client.
//!
//! A [`Query`] pairs a builder with the client that will run it. The builder's
//! configuration methods are available directly on the query, and awaiting the
//! query executes it:
//!
//! ```ignore
//! let result = db
//!     .select()
//!     .from("users")
//!     .where_("id = ?")
//!     .set_params([1])
//!     .await?;
//! for row in result.rows() {
//!     println!("{}", row.to_json());
//! }
//! ```

use crate::client::GenericClient;
use crate::error::QbResult;
use crate::qb::{
    ColumnDef, CreateTableBuilder, CreateTableProps, DeleteBuilder, DeleteProps, Import,
    InsertBuilder, InsertProps, Join, Order, SelectBuilder, SelectProps, Statement,
    TableExistsBuilder, TableExistsProps, UpdateBuilder, UpdateProps,
};
use crate::value::SqlValue;
use futures_util::future::BoxFuture;
use std::future::IntoFuture;

pub type SelectQuery<'c, C> = Query<'c, C, SelectBuilder>;
pub type InsertQuery<'c, C> = Query<'c, C, InsertBuilder>;
pub type UpdateQuery<'c, C> = Query<'c, C, UpdateBuilder>;
pub type DeleteQuery<'c, C> = Query<'c, C, DeleteBuilder>;
pub type CreateTableQuery<'c, C> = Query<'c, C, CreateTableBuilder>;
pub type TableExistsQuery<'c, C> = Query<'c, C, TableExistsBuilder>;

/// A statement builder bound to the client that executes it.
#[derive(Debug, Clone)]
#[must_use = "queries do nothing unless executed or awaited"]
pub struct Query<'c, C, S> {
    client: &'c C,
    statement: S,
}

impl<'c, C, S> Query<'c, C, S>
where
    C: GenericClient,
    S: Statement,
{
    pub fn new(client: &'c C, statement: S) -> Self {
        Self { client, statement }
    }

    pub fn statement(&self) -> &S {
        &self.statement
    }

    pub fn into_statement(self) -> S {
        self.statement
    }

    /// Build the final SQL using the bound client's escaping rules.
    pub fn export(&self) -> QbResult<String> {
        self.statement.export_with(self.client)
    }

    /// Export the statement and send it.
    ///
    /// Build errors are returned before the client is touched.
    pub async fn execute(self) -> QbResult<S::Output> {
        let sql = self.export()?;
        let result = self.client.query_tagged(S::KIND, &sql, &[]).await?;
        Ok(S::Output::from(result))
    }
}

impl<'c, C, S> Query<'c, C, S>
where
    C: GenericClient,
    S: Statement + Import,
{
    pub fn import(self, props: impl Into<S::Props>) -> Self {
        self.map(|s| s.import(props))
    }
}

impl<'c, C, S> Query<'c, C, S> {
    fn map(self, f: impl FnOnce(S) -> S) -> Self {
        Self {
            client: self.client,
            statement: f(self.statement),
        }
    }

    fn try_map(self, f: impl FnOnce(S) -> QbResult<S>) -> QbResult<Self> {
        Ok(Self {
            client: self.client,
            statement: f(self.statement)?,
        })
    }
}

impl<'c, C, S> IntoFuture for Query<'c, C, S>
where
    C: GenericClient + 'c,
    S: Statement + Send + 'c,
    S::Output: Send + 'c,
{
    type Output = QbResult<S::Output>;
    type IntoFuture = BoxFuture<'c, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

/// Forward builder configuration methods onto `Query<'c, C, $builder>`.
///
/// `plain` methods return `Self`; `fallible` methods return `QbResult<Self>`.
/// Generic parameters and where clauses are written in brackets.
macro_rules! forward_builder_methods {
    (
        $builder:ty;
        plain { $( $(#[$pm:meta])* fn $p:ident $([$($pg:tt)*])? ($($pa:ident : $pt:ty),*) $(where [$($pw:tt)*])?; )* }
        fallible { $( $(#[$fm:meta])* fn $f:ident ($($fa:ident : $ft:ty),*); )* }
    ) => {
        impl<'c, C> Query<'c, C, $builder>
        where
            C: GenericClient,
        {
            $(
                $(#[$pm])*
                pub fn $p $(<$($pg)*>)? (self, $($pa : $pt),*) -> Self
                $(where $($pw)*)?
                {
                    self.map(|s| s.$p($($pa),*))
                }
            )*

            $(
                $(#[$fm])*
                pub fn $f(self, $($fa : $ft),*) -> QbResult<Self> {
                    self.try_map(|s| s.$f($($fa),*))
                }
            )*
        }
    };
}

forward_builder_methods! {
    SelectBuilder;
    plain {
        fn items[I, T](items: I) where [I: IntoIterator<Item = T>, T: Into<String>];
        fn for_update();
        fn from[T: Into<String>](table: T);
        fn join(join: Join);
        fn joins[I: IntoIterator<Item = Join>](joins: I);
        fn where_[T: Into<String>](condition: T);
        fn where_all[I, T](conditions: I) where [I: IntoIterator<Item = T>, T: Into<String>];
        fn limit(limit: u64);
        fn extra[T: Into<String>](extra: T);
        fn set_params[I, V](params: I) where [I: IntoIterator<Item = V>, V: Into<SqlValue>];
    }
    fallible {
        /// Fails when no limit has been set and `start_item` is non-zero.
        fn start_item(start_item: u64);
        fn order(order: Order);
    }
}

impl<'c, C: GenericClient> SelectQuery<'c, C> {
    pub fn orders(self, orders: impl IntoIterator<Item = Order>) -> QbResult<Self> {
        self.try_map(|s| s.orders(orders))
    }

    pub fn props(&self) -> &SelectProps {
        self.statement.props()
    }
}

forward_builder_methods! {
    InsertBuilder;
    plain {
        fn into[T: Into<String>](table: T);
        fn items[I, K, V](items: I) where [I: IntoIterator<Item = (K, V)>, K: Into<String>, V: Into<SqlValue>];
        fn item[K: Into<String>, V: Into<SqlValue>](column: K, value: V);
    }
    fallible {}
}

impl<'c, C: GenericClient> InsertQuery<'c, C> {
    pub fn props(&self) -> &InsertProps {
        self.statement.props()
    }
}

forward_builder_methods! {
    UpdateBuilder;
    plain {
        fn table[T: Into<String>](table: T);
        fn set[T: Into<String>](assignment: T);
        fn set_all[I, T](assignments: I) where [I: IntoIterator<Item = T>, T: Into<String>];
        fn where_[T: Into<String>](condition: T);
        fn where_all[I, T](conditions: I) where [I: IntoIterator<Item = T>, T: Into<String>];
        fn set_params[I, V](params: I) where [I: IntoIterator<Item = V>, V: Into<SqlValue>];
    }
    fallible {}
}

impl<'c, C: GenericClient> UpdateQuery<'c, C> {
    pub fn props(&self) -> &UpdateProps {
        self.statement.props()
    }
}

forward_builder_methods! {
    DeleteBuilder;
    plain {
        fn from[T: Into<String>](table: T);
        fn where_[T: Into<String>](condition: T);
        fn where_all[I, T](conditions: I) where [I: IntoIterator<Item = T>, T: Into<String>];
        fn set_params[I, V](params: I) where [I: IntoIterator<Item = V>, V: Into<SqlValue>];
    }
    fallible {}
}

impl<'c, C: GenericClient> DeleteQuery<'c, C> {
    pub fn props(&self) -> &DeleteProps {
        self.statement.props()
    }
}

forward_builder_methods! {
    CreateTableBuilder;
    plain {
        fn table[T: Into<String>](table: T);
        fn column(column: ColumnDef);
        fn columns[I: IntoIterator<Item = ColumnDef>](columns: I);
        fn if_not_exists(if_not_exists: bool);
    }
    fallible {}
}

impl<'c, C: GenericClient> CreateTableQuery<'c, C> {
    pub fn props(&self) -> &CreateTableProps {
        self.statement.props()
    }
}

forward_builder_methods! {
    TableExistsBuilder;
    plain {
        fn table[T: Into<String>](table: T);
    }
    fallible {}
}

impl<'c, C: GenericClient> TableExistsQuery<'c, C> {
    pub fn props(&self) -> &TableExistsProps {
        self.statement.props()
    }
}
