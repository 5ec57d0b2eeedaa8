//! Database connection pool and repositories.

pub mod rule_config;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Create a database connection pool.
pub async fn connect(conn_str: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(conn_str).await
}

/// Test database connection.
pub async fn test_connection(conn: &DatabaseConnection) -> Result<(), DbErr> {
    conn.ping().await
}
