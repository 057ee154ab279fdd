//! End-to-end checks against a real server. Skipped unless `DATABASE_URL` is set.

use mysql_qb::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

fn database_url() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").ok()
}

fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("{prefix}_{}_{}", std::process::id(), nanos)
}

#[tokio::test]
async fn crud_roundtrip() -> QbResult<()> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL is not set; skipping crud_roundtrip");
        return Ok(());
    };
    let db = Database::connect(&DatabaseConfig::new(url).pool_size(1, 4))?;
    let table = unique_table("mysql_qb_users");

    assert!(!db.table_exists().table(&table).await?.exists());
    db.create_table()
        .table(&table)
        .column(ColumnDef::new("id", "INT").auto_increment().primary_key())
        .column(ColumnDef::new("name", "VARCHAR(64)"))
        .column(ColumnDef::new("score", "INT").nullable(true))
        .await?;
    assert!(db.table_exists().table(&table).await?.exists());

    let inserted = db
        .insert()
        .into(&table)
        .item("name", "o'hara")
        .item("score", 10)
        .await?;
    let id = inserted.insert_id();
    assert_ne!(id, 0);

    let rows = db
        .select()
        .from(&table)
        .where_("id = ?")
        .set_params([id])
        .await?;
    assert_eq!(rows.rows().len(), 1);
    assert_eq!(rows.rows()[0].get_as::<String>("name")?, "o'hara");
    assert_eq!(rows.rows()[0].get_as::<i64>("score")?, 10);

    let updated = db
        .update()
        .table(&table)
        .set("score = score + ?")
        .where_("id = ?")
        .set_params([SqlValue::from(5), SqlValue::from(id)])
        .await?;
    assert_eq!(updated.affected_rows(), 1);

    let conn = db.begin_transaction().await?;
    conn.delete().from(&table).await?;
    db.rollback(conn).await?;
    let rows = db.select().from(&table).await?;
    assert_eq!(rows.rows()[0].get_as::<i64>("score")?, 15);

    db.query(&format!("DROP TABLE {table}"), &[]).await?;
    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn execution_failure_carries_statement() -> QbResult<()> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL is not set; skipping execution_failure_carries_statement");
        return Ok(());
    };
    let db = Database::from_url(&url)?;

    let err = db
        .select()
        .from("mysql_qb_no_such_table")
        .where_("id = ?")
        .set_params([1])
        .await
        .unwrap_err();
    assert!(err.is_execution_failed());
    assert_eq!(
        err.failed_sql(),
        Some("SELECT * FROM mysql_qb_no_such_table WHERE id = 1;")
    );
    assert!(err.to_string().contains("Query: SELECT * FROM mysql_qb_no_such_table"));

    db.close().await?;
    Ok(())
}
