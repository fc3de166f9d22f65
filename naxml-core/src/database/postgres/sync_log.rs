use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use naxml_model::sync::SyncLog;
use naxml_model::{NaxmlError, Result};

use crate::database::ports::SyncLogRepository;

#[derive(Clone)]
pub struct PostgresSyncLogRepository {
    pool: PgPool,
}

impl PostgresSyncLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncLogRepository for PostgresSyncLogRepository {
    async fn record(&self, log: &SyncLog) -> Result<()> {
        sqlx::query(
            r#"
            insert into naxml.sync_log
                (id, integration_id, started_at, completed_at, categories, outcome)
            values ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(log.id.as_uuid())
        .bind(log.integration_id.as_uuid())
        .bind(log.started_at)
        .bind(log.completed_at)
        .bind(Json(&log.categories))
        .bind(log.outcome)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}
