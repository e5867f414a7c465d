//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured and
//! accessible, and that pagination windows translate into the expected SQL
//! `LIMIT`/`OFFSET` behaviour. They need a live database and are ignored by
//! default; run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    pagination::PageRequest,
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_page_window_matches_sql_limit_offset() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    let page = PageRequest::new(1, 4, 50)?;
    let (limit, offset) = page.limit_offset();

    let rows = sqlx::query("SELECT n FROM generate_series(0, 9) AS n ORDER BY n LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(&pool)
        .await?;
    let from_sql: Vec<i32> = rows.iter().map(|row| row.get("n")).collect();

    let all: Vec<i32> = (0..10).collect();
    assert_eq!(from_sql, page.window(&all));

    Ok(())
}
