//! Common imports.
//!
//! ```ignore
//! use mysql_qb::prelude::*;
//! ```

pub use crate::client::GenericClient;
pub use crate::config::DatabaseConfig;
pub use crate::connection::Connection;
pub use crate::database::Database;
pub use crate::error::{QbError, QbResult};
pub use crate::escape::Escape;
pub use crate::qb::{ColumnDef, Import, Join, Order, Statement, and, or};
pub use crate::value::{FromSqlValue, SqlValue};
