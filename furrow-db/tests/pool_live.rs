//! Database-backed cursor and row-materialization semantics.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p furrow-db -- --ignored

use std::time::Duration;

use furrow_db::{rows, CursorOptions, DatabasePool, DbError, PoolRegistry, PoolSettings};
use serde_json::Value;

async fn live_pool() -> DatabasePool {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    DatabasePool::connect(
        &url,
        Some("live-test"),
        PoolSettings::new()
            .with_min_connections(1)
            .with_max_connections(2)
            .with_acquire_timeout(Duration::from_secs(2)),
    )
    .await
    .expect("pool creation failed")
}

async fn exec(pool: &DatabasePool, opts: CursorOptions, sql: String) {
    pool.with_cursor(opts, |conn| {
        Box::pin(async move {
            sqlx::query(&sql).execute(&mut *conn).await?;
            Ok(())
        })
    })
    .await
    .expect("statement failed");
}

async fn count(pool: &DatabasePool, table: &str) -> i64 {
    let sql = format!("SELECT count(*) FROM {table}");
    pool.with_cursor(CursorOptions::default(), |conn| {
        Box::pin(async move {
            let row: (i64,) = sqlx::query_as(&sql).fetch_one(&mut *conn).await?;
            Ok(row.0)
        })
    })
    .await
    .expect("count failed")
}

#[tokio::test]
#[ignore = "requires database"]
async fn commit_on_close_persists_writes() {
    let pool = live_pool().await;
    let table = format!("furrow_commit_{}", std::process::id());

    exec(
        &pool,
        CursorOptions::commit(),
        format!("CREATE TABLE {table} (id INT PRIMARY KEY)"),
    )
    .await;
    exec(
        &pool,
        CursorOptions::commit(),
        format!("INSERT INTO {table} (id) VALUES (1)"),
    )
    .await;

    assert_eq!(count(&pool, &table).await, 1);

    exec(&pool, CursorOptions::commit(), format!("DROP TABLE {table}")).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn without_the_flag_no_commit_is_issued() {
    let pool = live_pool().await;
    let table = format!("furrow_rollback_{}", std::process::id());

    exec(
        &pool,
        CursorOptions::commit(),
        format!("CREATE TABLE {table} (id INT PRIMARY KEY)"),
    )
    .await;

    // default options: the cursor's transaction rolls back
    exec(
        &pool,
        CursorOptions::default(),
        format!("INSERT INTO {table} (id) VALUES (1)"),
    )
    .await;

    assert_eq!(count(&pool, &table).await, 0);

    exec(&pool, CursorOptions::commit(), format!("DROP TABLE {table}")).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn body_error_still_returns_the_connection() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    // one connection total: a leak would starve the second cursor
    let pool = DatabasePool::connect(
        &url,
        Some("leak-test"),
        PoolSettings::new()
            .with_min_connections(1)
            .with_max_connections(1)
            .with_acquire_timeout(Duration::from_secs(1)),
    )
    .await
    .expect("pool creation failed");

    let err = pool
        .with_cursor(CursorOptions::default(), |conn| {
            Box::pin(async move {
                sqlx::query("SELECT nope FROM furrow_no_such_table")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Sqlx(_)));

    let one = pool
        .with_cursor(CursorOptions::default(), |conn| {
            Box::pin(async move {
                let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&mut *conn).await?;
                Ok(row.0)
            })
        })
        .await
        .expect("connection was not returned to the pool");
    assert_eq!(one, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn documents_materialize_dict_rows() {
    let pool = live_pool().await;

    let doc = pool
        .with_cursor(CursorOptions::default(), |conn| {
            Box::pin(async move {
                let row = sqlx::query(
                    "SELECT 7::int4 AS plots, 'barley'::text AS crop, true AS irrigated, \
                     2.5::float8 AS acres, NULL::text AS notes, \
                     'a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11'::uuid AS id, \
                     '{\"seed\": 12}'::jsonb AS meta",
                )
                .fetch_one(&mut *conn)
                .await?;
                rows::document(&row)
            })
        })
        .await
        .unwrap();

    assert_eq!(doc["plots"], Value::from(7));
    assert_eq!(doc["crop"], Value::from("barley"));
    assert_eq!(doc["irrigated"], Value::Bool(true));
    assert_eq!(doc["acres"], Value::from(2.5));
    assert_eq!(doc["notes"], Value::Null);
    assert_eq!(
        doc["id"],
        Value::from("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11")
    );
    assert_eq!(doc["meta"]["seed"], Value::from(12));
}

#[tokio::test]
#[ignore = "requires database"]
async fn unsupported_column_types_are_named() {
    let pool = live_pool().await;

    let err = pool
        .with_cursor(CursorOptions::default(), |conn| {
            Box::pin(async move {
                let row = sqlx::query("SELECT 1::numeric AS total")
                    .fetch_one(&mut *conn)
                    .await?;
                rows::document(&row).map(|_| ())
            })
        })
        .await
        .unwrap_err();

    match err {
        DbError::UnsupportedColumn { column, type_name } => {
            assert_eq!(column, "total");
            assert_eq!(type_name, "NUMERIC");
        }
        other => panic!("expected UnsupportedColumn, got: {other}"),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn registry_resolves_the_default_key() {
    let registry = PoolRegistry::new();

    let first = registry.database(None).await.expect("resolution failed");
    let second = registry.database(None).await.expect("resolution failed");

    assert_eq!(first.name(), "DATABASE_URL");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}
