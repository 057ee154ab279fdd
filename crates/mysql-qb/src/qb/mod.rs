//! Fluent statement builders for MySQL.
//!
//! Builders are plain values configured through consuming, chained calls.
//! Nothing touches the database here: `export()` assembles the final SQL string
//! and is pure and repeatable. To run a statement, create it from a client
//! (`db.select()`, `conn.update()`, ...) which wraps the builder in a
//! [`Query`](crate::query::Query).
//!
//! # Features
//!
//! - **Fragment based**: WHERE conditions, SET assignments and JOIN clauses are raw SQL fragments
//! - **Positional placeholders**: `?` markers are replaced left to right with escaped literals
//! - **Early validation**: misuse such as an offset without a limit fails at the call site
//! - **Importable**: a serde-deserializable props record can be merged into any builder
//!
//! # Usage
//!
//! ```rust
//! use mysql_qb::qb::{self, Order, Statement};
//!
//! let sql = qb::select()
//!     .from("users")
//!     .where_("status = ?")
//!     .where_(qb::or(["role = 'admin'", "role = 'owner'"]))
//!     .set_params(["active"])
//!     .order(Order::desc(["created_at"]))?
//!     .limit(20)
//!     .export()?;
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM users WHERE status = 'active' AND (role = 'admin' OR role = 'owner') \
//!      ORDER BY created_at DESC LIMIT 0, 20;"
//! );
//!
//! let sql = qb::update()
//!     .table("users")
//!     .set("status = ?")
//!     .where_("id = ?")
//!     .set_params([mysql_qb::SqlValue::from("inactive"), 7.into()])
//!     .export()?;
//! assert_eq!(sql, "UPDATE users SET status = 'inactive' WHERE id = 7;");
//! # Ok::<(), mysql_qb::QbError>(())
//! ```

mod create_table;
mod delete;
mod insert;
mod select;
mod table_exists;
mod traits;
mod types;
mod update;


pub use create_table::{CreateTableBuilder, CreateTableProps, PartialCreateTableProps};
pub use delete::{DeleteBuilder, DeleteProps, PartialDeleteProps};
pub use insert::{InsertBuilder, InsertProps, PartialInsertProps};
pub use select::{PartialSelectProps, SelectBuilder, SelectProps};
pub use table_exists::{PartialTableExistsProps, TableExistsBuilder, TableExistsProps};
pub use traits::{Import, Statement, StatementKind};
pub use types::{ColumnDef, Join, JoinKind, Order, OrderDirection, and, or};
pub use update::{PartialUpdateProps, UpdateBuilder, UpdateProps};

/// Create an empty SELECT builder.
pub fn select() -> SelectBuilder {
    SelectBuilder::new()
}

/// Create an empty INSERT builder.
pub fn insert() -> InsertBuilder {
    InsertBuilder::new()
}

/// Create an empty UPDATE builder.
pub fn update() -> UpdateBuilder {
    UpdateBuilder::new()
}

/// Create an empty DELETE builder.
pub fn delete() -> DeleteBuilder {
    DeleteBuilder::new()
}

pub fn create_table() -> CreateTableBuilder {
    CreateTableBuilder::new()
}

pub fn table_exists() -> TableExistsBuilder {
    TableExistsBuilder::new()
}
