//! Connection pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use naxml_model::{NaxmlError, Result};

/// Build a `PgPool` from a connection string, sizing it from
/// `NAXML_DB_MAX_CONNECTIONS`/`NAXML_DB_MIN_CONNECTIONS` (falling back to the
/// number of CPUs) and pinning the session `search_path` so unqualified
/// table names resolve without the caller having to qualify every query.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let max_connections = std::env::var("NAXML_DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or_else(|| num_cpus::get() as u32);

    let min_connections = std::env::var("NAXML_DB_MIN_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(2);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .max_lifetime(Duration::from_secs(1800))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                let _ = sqlx::query("SET search_path = naxml, public").execute(conn).await;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| NaxmlError::Database(format!("connection failed: {e}")))?;

    info!(max_connections, min_connections, "database pool initialized");
    Ok(pool)
}

/// Apply pending migrations. Kept separate from `connect` so a read replica
/// or a test harness can open a pool without also trying to migrate it.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| NaxmlError::Database(format!("migration failed: {e}")))
}
