use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use naxml_model::ids::AuditRecordId;
use naxml_model::sync::{AuditRecord, AuditStatus};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::AuditRecordRepository;

#[derive(Clone)]
pub struct PostgresAuditRecordRepository {
    pool: PgPool,
}

impl PostgresAuditRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRecordRepository for PostgresAuditRecordRepository {
    async fn create(&self, record: &AuditRecord) -> Result<()> {
        sqlx::query(
            r#"
            insert into naxml.audit_record
                (id, exchange_id, store_id, exchange_type, direction, data_category,
                 source_system, destination_system, contains_pii, contains_financial,
                 status, record_count, data_size, file_hash, retention_policy,
                 retention_expires_at, created_at, updated_at)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.exchange_id)
        .bind(record.store_id.as_uuid())
        .bind(record.exchange_type)
        .bind(record.direction)
        .bind(&record.data_category)
        .bind(&record.source_system)
        .bind(&record.destination_system)
        .bind(record.contains_pii)
        .bind(record.contains_financial)
        .bind(record.status)
        .bind(record.record_count)
        .bind(record.data_size)
        .bind(&record.file_hash)
        .bind(&record.retention_policy)
        .bind(record.retention_expires_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::AuditCreationFailed(e.to_string()))?;

        Ok(())
    }

    async fn transition(
        &self,
        id: AuditRecordId,
        next: AuditStatus,
        record_count: Option<i32>,
        data_size: Option<i64>,
    ) -> Result<()> {
        // The lattice check happens in-process (AuditStatus::can_transition_to)
        // before this is called; the WHERE clause below is a second,
        // storage-level guard against a concurrent writer racing the same row.
        let allowed_prior: &[AuditStatus] = match next {
            AuditStatus::Processing => &[AuditStatus::Pending],
            AuditStatus::Success | AuditStatus::Failed | AuditStatus::Partial => {
                &[AuditStatus::Processing]
            }
            AuditStatus::Pending => &[],
        };

        let rows = sqlx::query(
            r#"
            update naxml.audit_record
            set status = $2, record_count = coalesce($3, record_count),
                data_size = coalesce($4, data_size), updated_at = now()
            where id = $1 and status = any($5)
            "#,
        )
        .bind(id.as_uuid())
        .bind(next)
        .bind(record_count)
        .bind(data_size)
        .bind(allowed_prior)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        if rows.rows_affected() == 0 {
            return Err(NaxmlError::Database(format!(
                "audit record {id} is not in a state that can transition to {next:?}"
            )));
        }

        Ok(())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let rows = sqlx::query(
            r#"
            delete from naxml.audit_record
            where status in ('SUCCESS', 'FAILED', 'PARTIAL') and retention_expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.rows_affected())
    }

    async fn record_file_hash(&self, id: AuditRecordId, file_hash: &str) -> Result<()> {
        sqlx::query("update naxml.audit_record set file_hash = $2, updated_at = now() where id = $1")
            .bind(id.as_uuid())
            .bind(file_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}
