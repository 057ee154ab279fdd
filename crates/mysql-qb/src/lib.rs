//! # mysql-qb
//!
//! A fluent SQL statement builder for MySQL with a thin pooled-connection facade.
//!
//! ## Features
//!
//! - **SQL explicit**: conditions, assignments and joins are written as SQL fragments
//! - **Pure builders**: `export()` assembles the statement without touching the database
//! - **Positional parameters**: `?` placeholders are replaced with driver-escaped literals
//! - **Typed results**: every statement kind resolves to its own result wrapper
//! - **Transaction-friendly**: pass a held `Connection` anywhere a `GenericClient` is expected
//! - **Traced**: statements are logged through `tracing` under the `mysql_qb.sql` target
//!
//! ## Quick start
//!
//! ```ignore
//! use mysql_qb::prelude::*;
//!
//! let db = Database::connect(&DatabaseConfig::from_env()?)?;
//!
//! // SELECT
//! let users = db
//!     .select()
//!     .items(["id", "name"])
//!     .from("users")
//!     .where_("status = ?")
//!     .set_params(["active"])
//!     .order(Order::asc(["name"]))?
//!     .limit(10)
//!     .await?;
//! for row in users.rows() {
//!     let name: String = row.get_as("name")?;
//! }
//!
//! // INSERT
//! let id = db
//!     .insert()
//!     .into("users")
//!     .item("name", "alice")
//!     .item("status", "active")
//!     .await?
//!     .insert_id();
//!
//! // UPDATE inside a transaction
//! let conn = db.begin_transaction().await?;
//! conn.update()
//!     .table("users")
//!     .set("status = ?")
//!     .where_("id = ?")
//!     .set_params([SqlValue::from("inactive"), SqlValue::from(7)])
//!     .await?;
//! db.commit(conn).await?;
//!
//! // DELETE
//! db.delete().from("sessions").where_("expired = 1").await?;
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod escape;
pub mod logging;
pub mod prelude;
pub mod qb;
pub mod query;
pub mod result;
pub mod value;

pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use connection::Connection;
pub use database::Database;
pub use error::{QbError, QbResult};
pub use escape::{Escape, MySqlEscaper, PLACEHOLDER, escape, substitute};
pub use logging::SqlLogger;
pub use query::{
    CreateTableQuery, DeleteQuery, InsertQuery, Query, SelectQuery, TableExistsQuery, UpdateQuery,
};
pub use result::{
    CreateTableResult, DeleteResult, Field, InsertResult, QueryResult, RawResult, ResultHeader,
    ResultRow, RowSet, SelectResult, TableExistsResult, UpdateResult,
};
pub use value::{FromSqlValue, SqlValue};

// Re-export the builders for direct use without a client
pub use qb::{
    ColumnDef, CreateTableBuilder, DeleteBuilder, Import, InsertBuilder, Join, JoinKind, Order,
    OrderDirection, SelectBuilder, Statement, StatementKind, TableExistsBuilder, UpdateBuilder,
    and, or,
};

// Re-export the driver for pool and option types
pub use mysql_async;
