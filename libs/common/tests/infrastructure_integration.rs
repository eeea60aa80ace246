//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured
//! and accessible from the application. They need a running server, so they
//! are ignored by default; run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool};
use common::error::StoreError;
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
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
async fn test_unique_violation_maps_to_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    let mut tx = pool.begin().await?;

    sqlx::query("CREATE TEMPORARY TABLE conflict_probe (name TEXT UNIQUE)")
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO conflict_probe (name) VALUES ('a')")
        .execute(&mut *tx)
        .await?;

    let err = sqlx::query("INSERT INTO conflict_probe (name) VALUES ('a')")
        .execute(&mut *tx)
        .await
        .expect_err("duplicate insert must fail");

    assert!(matches!(StoreError::from(err), StoreError::Conflict(_)));
    Ok(())
}
