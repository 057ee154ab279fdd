//! Pool-backed database handle.

use crate::client::GenericClient;
use crate::config::DatabaseConfig;
use crate::connection::Connection;
use crate::error::{QbError, QbResult};
use crate::escape::{Escape, MySqlEscaper};
use crate::logging::{SqlLogger, TARGET};
use crate::qb::StatementKind;
use crate::result::QueryResult;
use crate::value::SqlValue;
use mysql_async::{DriverError, Pool};

/// Entry point for running statements against a MySQL connection pool.
///
/// Each statement executed directly on a `Database` checks out a connection,
/// runs, and releases it. Use [`Database::get_connection`] or
/// [`Database::begin_transaction`] to run several statements on one connection.
///
/// ```ignore
/// let db = Database::connect(&DatabaseConfig::from_env()?)?;
///
/// if !db.table_exists().table("users").await?.exists() {
///     db.create_table()
///         .table("users")
///         .column(ColumnDef::new("id", "INT").auto_increment().primary_key())
///         .column(ColumnDef::new("name", "VARCHAR(64)"))
///         .await?;
/// }
///
/// let id = db.insert().into("users").item("name", "alice").await?.insert_id();
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool,
    escaper: MySqlEscaper,
    logger: SqlLogger,
}

impl Database {
    /// Wrap an existing pool with default escaping and logging.
    pub fn new(pool: Pool) -> Self {
        Self::with_options(pool, MySqlEscaper::new(), SqlLogger::default())
    }

    pub fn with_options(pool: Pool, escaper: MySqlEscaper, logger: SqlLogger) -> Self {
        Self {
            pool,
            escaper,
            logger,
        }
    }

    /// Create a pool from `config`.
    ///
    /// No connection is opened until the first statement runs.
    pub fn connect(config: &DatabaseConfig) -> QbResult<Self> {
        let opts = config.to_opts()?;
        tracing::debug!(
            target: TARGET,
            pool_min = config.pool_min,
            pool_max = config.pool_max,
            "creating connection pool"
        );
        Ok(Self::with_options(
            Pool::new(opts),
            config.escaper(),
            config.logger(),
        ))
    }

    pub fn from_url(url: &str) -> QbResult<Self> {
        Self::connect(&DatabaseConfig::new(url))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Check a connection out of the pool.
    pub async fn get_connection(&self) -> QbResult<Connection> {
        let conn = self.pool.get_conn().await.map_err(checkout_error)?;
        tracing::debug!(target: TARGET, "connection checked out");
        Ok(Connection::with_options(
            conn,
            self.escaper,
            self.logger.clone(),
        ))
    }

    /// Check out a connection and start a transaction on it.
    ///
    /// Finish it with [`Database::commit`] or [`Database::rollback`].
    pub async fn begin_transaction(&self) -> QbResult<Connection> {
        let conn = self.get_connection().await?;
        conn.begin_transaction().await?;
        Ok(conn)
    }

    /// Commit the transaction on `conn` and release it.
    pub async fn commit(&self, conn: Connection) -> QbResult<()> {
        let result = conn.commit().await;
        conn.release();
        result
    }

    /// Roll back the transaction on `conn` and release it.
    pub async fn rollback(&self, conn: Connection) -> QbResult<()> {
        let result = conn.rollback().await;
        conn.release();
        result
    }

    /// Close every pooled connection.
    ///
    /// Waits until all checked-out connections have been released.
    pub async fn close(self) -> QbResult<()> {
        self.pool
            .disconnect()
            .await
            .map_err(|e| QbError::Pool(e.to_string()))?;
        tracing::debug!(target: TARGET, "connection pool closed");
        Ok(())
    }
}

fn checkout_error(err: mysql_async::Error) -> QbError {
    match err {
        mysql_async::Error::Driver(DriverError::PoolDisconnected) => {
            QbError::Pool("pool was disconnected".to_string())
        }
        other => QbError::Connection(other.to_string()),
    }
}

impl Escape for Database {
    fn escape(&self, value: &SqlValue) -> String {
        self.escaper.escape(value)
    }
}

impl GenericClient for Database {
    async fn query(&self, sql: &str, items: &[SqlValue]) -> QbResult<QueryResult> {
        self.query_tagged(StatementKind::Raw, sql, items).await
    }

    async fn query_tagged(
        &self,
        kind: StatementKind,
        sql: &str,
        items: &[SqlValue],
    ) -> QbResult<QueryResult> {
        let conn = self.get_connection().await?;
        let result = conn.query_tagged(kind, sql, items).await;
        conn.release();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::Statement;

    #[test]
    fn checkout_error_classification() {
        let err = checkout_error(mysql_async::Error::Driver(DriverError::PoolDisconnected));
        assert!(matches!(err, QbError::Pool(_)));
    }

    #[tokio::test]
    async fn escaping_follows_config() {
        let config = DatabaseConfig::new("mysql://localhost/db").no_backslash_escapes(true);
        let db = Database::connect(&config).unwrap();
        assert_eq!(db.escape(&SqlValue::from("a'b")), "'a''b'");

        let sql = db
            .select()
            .from("users")
            .where_("name = ?")
            .set_params(["o'neil"])
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE name = 'o''neil';");

        // the bare builder keeps the default backslash style
        let sql = crate::qb::select()
            .from("users")
            .where_("name = ?")
            .set_params(["o'neil"])
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE name = 'o\\'neil';");
        db.close().await.unwrap();
    }
}
