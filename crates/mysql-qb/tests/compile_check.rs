//! Compile-only tests for the connection and pool facades.
//!
//! These tests verify that key API surfaces compile correctly.
//! They do NOT execute against a database; they only check types and signatures.

#![allow(dead_code)]

use mysql_qb::prelude::*;
use mysql_qb::{
    CreateTableResult, DeleteResult, InsertResult, SelectQuery, SelectResult, TableExistsResult,
    UpdateResult,
};

fn assert_send<T: Send>(_: &T) {}

async fn statements_on_any_client(client: &impl GenericClient) -> QbResult<()> {
    let _: SelectResult = client.select().from("users").await?;
    let _: InsertResult = client.insert().into("users").item("name", "a").await?;
    let _: UpdateResult = client.update().table("users").set("a = 1").await?;
    let _: DeleteResult = client.delete().from("users").await?;
    let _: CreateTableResult = client
        .create_table()
        .table("t")
        .column(ColumnDef::new("id", "INT"))
        .await?;
    let _: TableExistsResult = client.table_exists().table("t").await?;
    let _ = client.query("SELECT 1", &[]).await?;
    Ok(())
}

async fn transaction_flow(db: &Database) -> QbResult<()> {
    let conn = db.begin_transaction().await?;
    statements_on_any_client(&conn).await?;
    if conn.in_transaction() {
        db.commit(conn).await?;
    } else {
        db.rollback(conn).await?;
    }
    Ok(())
}

async fn held_connection(db: &Database) -> QbResult<()> {
    let conn = db.get_connection().await?;
    conn.begin_transaction().await?;
    conn.insert().into("audit").item("event", "login").await?;
    conn.commit().await?;
    conn.release();
    Ok(())
}

fn bound_query_is_send(db: &Database) {
    let query: SelectQuery<'_, Database> = db.select().from("users");
    let fut = std::future::IntoFuture::into_future(query);
    assert_send(&fut);
}

fn pool_access(db: &Database) -> &mysql_qb::mysql_async::Pool {
    db.pool()
}

async fn construct() -> QbResult<()> {
    let db = Database::connect(&DatabaseConfig::new("mysql://localhost/app"))?;
    let from_url = Database::from_url("mysql://localhost/app")?;
    let wrapped = Database::new(db.pool().clone());
    transaction_flow(&wrapped).await?;
    held_connection(&from_url).await?;
    from_url.close().await?;
    Ok(())
}

#[test]
fn facade_signatures_compile() {
    let _ = construct;
    let _ = bound_query_is_send;
    let _ = pool_access;
}
