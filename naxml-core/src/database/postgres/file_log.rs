//! `FileLogRepository` backed by Postgres.
//!
//! Uses `sqlx::query_as` against a local `FromRow` row type rather than the
//! `query!`/`query_as!` macros: those need either a live database or a
//! committed `.sqlx` offline cache at build time, which this workspace
//! doesn't carry (see DESIGN.md).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use naxml_model::file_log::{FileDirection, FileLog, FileStatus};
use naxml_model::ids::{FileLogId, StoreId};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::FileLogRepository;

#[derive(sqlx::FromRow)]
struct FileLogRow {
    id: uuid::Uuid,
    store_id: uuid::Uuid,
    file_hash: String,
    file_name: String,
    file_type: String,
    direction: FileDirection,
    status: FileStatus,
    size: i64,
    processing_ms: Option<i64>,
    record_count: Option<i32>,
    error_code: Option<String>,
    error_message: Option<String>,
    source_path: Option<String>,
    processed_path: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl From<FileLogRow> for FileLog {
    fn from(r: FileLogRow) -> Self {
        FileLog {
            id: FileLogId(r.id),
            store_id: StoreId(r.store_id),
            file_hash: r.file_hash,
            file_name: r.file_name,
            file_type: r.file_type,
            direction: r.direction,
            status: r.status,
            size: r.size,
            processing_ms: r.processing_ms,
            record_count: r.record_count,
            error_code: r.error_code,
            error_message: r.error_message,
            source_path: r.source_path,
            processed_path: r.processed_path,
            created_at: r.created_at,
            processed_at: r.processed_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresFileLogRepository {
    pool: PgPool,
}

impl PostgresFileLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileLogRepository for PostgresFileLogRepository {
    async fn find_by_hash(&self, store_id: StoreId, file_hash: &str) -> Result<Option<FileLog>> {
        // More than one row can carry this hash (a duplicate-filename
        // SKIPPED row, a sync-cycle re-pass, a stale FAILED attempt). A
        // terminal SUCCESS/PARTIAL row always wins so callers checking
        // "was this content already projected" get a stable answer; absent
        // one, the most recent row is still useful to the watcher's own
        // any-hit-is-a-duplicate check.
        let row: Option<FileLogRow> = sqlx::query_as(
            r#"
            select id, store_id, file_hash, file_name, file_type, direction, status,
                   size, processing_ms, record_count, error_code, error_message,
                   source_path, processed_path, created_at, processed_at
            from naxml.file_log
            where store_id = $1 and file_hash = $2
            order by case when status in ('SUCCESS', 'PARTIAL') then 0 else 1 end, created_at desc
            limit 1
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(file_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(FileLog::from))
    }

    async fn create(&self, log: &FileLog) -> Result<()> {
        sqlx::query(
            r#"
            insert into naxml.file_log
                (id, store_id, file_hash, file_name, file_type, direction, status,
                 size, processing_ms, record_count, error_code, error_message,
                 source_path, processed_path, created_at, processed_at)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(log.id.as_uuid())
        .bind(log.store_id.as_uuid())
        .bind(&log.file_hash)
        .bind(&log.file_name)
        .bind(&log.file_type)
        .bind(log.direction)
        .bind(log.status)
        .bind(log.size)
        .bind(log.processing_ms)
        .bind(log.record_count)
        .bind(&log.error_code)
        .bind(&log.error_message)
        .bind(&log.source_path)
        .bind(&log.processed_path)
        .bind(log.created_at)
        .bind(log.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update_status(
        &self,
        id: FileLogId,
        status: FileStatus,
        processing_ms: Option<i64>,
        record_count: Option<i32>,
        error_code: Option<String>,
        error_message: Option<String>,
        processed_path: Option<String>,
        processed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            update naxml.file_log
            set status = $2, processing_ms = $3, record_count = $4,
                error_code = $5, error_message = $6, processed_path = $7, processed_at = $8
            where id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status)
        .bind(processing_ms)
        .bind(record_count)
        .bind(error_code)
        .bind(error_message)
        .bind(processed_path)
        .bind(processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}
