//! Data access for the SmartPack booking service.
//!
//! Pool creation, embedded migrations, row models, and repositories. The
//! repositories own the transactional validate-then-mutate sequences the
//! workflow requires: booking and asset rows are locked with
//! `SELECT ... FOR UPDATE` so the status guard and the status mutation are
//! atomic with respect to each row.

use std::time::Duration;

pub mod error;
pub mod models;
pub mod repositories;

pub use error::DbError;

/// Database connection pool. All repositories take `&DbPool` (or a
/// transaction started from one).
pub type DbPool = sqlx::PgPool;

/// Embedded migrations, applied on startup and by `#[sqlx::test]`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
