//! A single pooled connection.

use crate::client::{GenericClient, prepare_sql};
use crate::error::{QbError, QbResult};
use crate::escape::{Escape, MySqlEscaper};
use crate::logging::{SqlLogger, TARGET};
use crate::qb::StatementKind;
use crate::result::{Field, QueryResult, RawResult, ResultHeader, ResultRow, RowSet};
use crate::value::SqlValue;
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::prelude::Queryable;
use mysql_async::{Column, Conn, Row, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Charset id MySQL reports for binary strings and blobs.
const BINARY_CHARSET: u16 = 63;

/// A connection checked out of the pool.
///
/// Statements sent through the same `Connection` run one after the other in
/// program order. Dropping the value (or calling [`Connection::release`]) hands
/// the physical connection back to the pool, which resets its session state.
pub struct Connection {
    conn: Mutex<Conn>,
    in_transaction: AtomicBool,
    escaper: MySqlEscaper,
    logger: SqlLogger,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("in_transaction", &self.in_transaction())
            .field("escaper", &self.escaper)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Wrap a driver connection with default escaping and logging.
    pub fn new(conn: Conn) -> Self {
        Self::with_options(conn, MySqlEscaper::new(), SqlLogger::default())
    }

    pub fn with_options(conn: Conn, escaper: MySqlEscaper, logger: SqlLogger) -> Self {
        Self {
            conn: Mutex::new(conn),
            in_transaction: AtomicBool::new(false),
            escaper,
            logger,
        }
    }

    /// Whether `begin_transaction` was called without a matching commit/rollback.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::Acquire)
    }

    pub async fn begin_transaction(&self) -> QbResult<()> {
        self.query_tagged(StatementKind::Raw, "START TRANSACTION", &[])
            .await?;
        self.in_transaction.store(true, Ordering::Release);
        tracing::debug!(target: TARGET, "transaction started");
        Ok(())
    }

    pub async fn commit(&self) -> QbResult<()> {
        self.query_tagged(StatementKind::Raw, "COMMIT", &[]).await?;
        self.in_transaction.store(false, Ordering::Release);
        tracing::debug!(target: TARGET, "transaction committed");
        Ok(())
    }

    pub async fn rollback(&self) -> QbResult<()> {
        self.query_tagged(StatementKind::Raw, "ROLLBACK", &[])
            .await?;
        self.in_transaction.store(false, Ordering::Release);
        tracing::debug!(target: TARGET, "transaction rolled back");
        Ok(())
    }

    /// Return the connection to the pool.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.in_transaction() {
            tracing::warn!(
                target: TARGET,
                "connection released with an open transaction; the pool will roll it back"
            );
        } else {
            tracing::debug!(target: TARGET, "connection released");
        }
    }
}

impl Escape for Connection {
    fn escape(&self, value: &SqlValue) -> String {
        self.escaper.escape(value)
    }
}

impl GenericClient for Connection {
    async fn query(&self, sql: &str, items: &[SqlValue]) -> QbResult<QueryResult> {
        self.query_tagged(StatementKind::Raw, sql, items).await
    }

    async fn query_tagged(
        &self,
        kind: StatementKind,
        sql: &str,
        items: &[SqlValue],
    ) -> QbResult<QueryResult> {
        let sql = prepare_sql(self, sql, items)?;
        self.logger.before_query(kind, &sql, items.len());

        let mut conn = self.conn.lock().await;
        match run_text_query(&mut conn, &sql, items).await {
            Ok(raw) => Ok(QueryResult::new(raw)),
            Err(err) => {
                self.logger.query_failed(kind, &err);
                Err(err)
            }
        }
    }
}

async fn run_text_query(conn: &mut Conn, sql: &str, items: &[SqlValue]) -> QbResult<RawResult> {
    let failed = |e: mysql_async::Error| QbError::execution_failed(e, sql, items);

    let mut result = conn.query_iter(sql).await.map_err(failed)?;
    let columns = result.columns().filter(|c| !c.is_empty());

    let Some(columns) = columns else {
        let header = ResultHeader {
            affected_rows: result.affected_rows(),
            insert_id: result.last_insert_id(),
            warnings: result.warnings(),
            info: result.info().into_owned(),
        };
        result.drop_result().await.map_err(failed)?;
        return Ok(RawResult::Header(header));
    };

    let rows: Vec<Row> = result.collect().await.map_err(failed)?;
    result.drop_result().await.map_err(failed)?;

    let decoders: Vec<ColumnDecoder> = columns.iter().map(ColumnDecoder::from_column).collect();
    let names: Arc<[String]> = decoders.iter().map(|d| d.name.clone()).collect();
    let fields = columns
        .iter()
        .zip(&decoders)
        .map(|(column, decoder)| Field {
            name: decoder.name.clone(),
            table: column.table_str().into_owned(),
            column_type: decoder.column_type,
        })
        .collect();

    let rows = rows
        .into_iter()
        .map(|row| decode_row(row, &decoders, &names))
        .collect::<QbResult<Vec<_>>>()?;

    Ok(RawResult::Rows(RowSet { rows, fields }))
}

fn decode_row(mut row: Row, decoders: &[ColumnDecoder], names: &Arc<[String]>) -> QbResult<ResultRow> {
    let values = decoders
        .iter()
        .enumerate()
        .map(|(i, decoder)| {
            let value = row.take::<Value, usize>(i).unwrap_or(Value::NULL);
            decoder.decode(value)
        })
        .collect::<QbResult<Vec<_>>>()?;
    Ok(ResultRow::new(Arc::clone(names), values))
}

/// What a column's metadata says about how to read its text-protocol values.
#[derive(Debug, Clone)]
struct ColumnDecoder {
    name: String,
    column_type: ColumnType,
    unsigned: bool,
    binary: bool,
}

impl ColumnDecoder {
    fn from_column(column: &Column) -> Self {
        Self {
            name: column.name_str().into_owned(),
            column_type: column.column_type(),
            unsigned: column.flags().contains(ColumnFlags::UNSIGNED_FLAG),
            binary: column.character_set() == BINARY_CHARSET,
        }
    }

    fn decode(&self, value: Value) -> QbResult<SqlValue> {
        let bytes = match value {
            Value::NULL => return Ok(SqlValue::Null),
            Value::Int(v) => return Ok(SqlValue::Int(v)),
            Value::UInt(v) => return Ok(SqlValue::UInt(v)),
            Value::Float(v) => return Ok(SqlValue::Float(f64::from(v))),
            Value::Double(v) => return Ok(SqlValue::Float(v)),
            v @ (Value::Date(..) | Value::Time(..)) => {
                return Ok(SqlValue::Text(v.as_sql(false).trim_matches('\'').to_string()));
            }
            Value::Bytes(bytes) => bytes,
        };

        use ColumnType::*;
        match self.column_type {
            MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
            | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => self.decode_integer(&bytes),
            MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => {
                let text = self.utf8(&bytes)?;
                text.parse::<f64>()
                    .map(SqlValue::Float)
                    .map_err(|e| QbError::decode(&self.name, e.to_string()))
            }
            MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB
            | MYSQL_TYPE_BLOB | MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_STRING
            | MYSQL_TYPE_VARCHAR | MYSQL_TYPE_BIT | MYSQL_TYPE_GEOMETRY
                if self.binary =>
            {
                Ok(SqlValue::Bytes(bytes))
            }
            _ => Ok(match String::from_utf8(bytes) {
                Ok(text) => SqlValue::Text(text),
                Err(e) => SqlValue::Bytes(e.into_bytes()),
            }),
        }
    }

    fn decode_integer(&self, bytes: &[u8]) -> QbResult<SqlValue> {
        let text = self.utf8(bytes)?;
        let parsed = if self.unsigned {
            text.parse::<u64>().map(SqlValue::UInt)
        } else {
            text.parse::<i64>().map(SqlValue::Int)
        };
        parsed.map_err(|e| QbError::decode(&self.name, e.to_string()))
    }

    fn utf8<'a>(&self, bytes: &'a [u8]) -> QbResult<&'a str> {
        std::str::from_utf8(bytes).map_err(|e| QbError::decode(&self.name, e.to_string()))
    }
}
