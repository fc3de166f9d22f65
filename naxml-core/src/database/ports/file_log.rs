//! At-most-once bookkeeping per `(store_id, file_hash)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use naxml_model::file_log::{FileLog, FileStatus};
use naxml_model::ids::{FileLogId, StoreId};
use naxml_model::Result;

#[async_trait]
pub trait FileLogRepository: Send + Sync {
    /// Idempotency check: a hit here means the file was already processed
    /// (or is being processed) and the watcher should skip it.
    async fn find_by_hash(&self, store_id: StoreId, file_hash: &str) -> Result<Option<FileLog>>;

    async fn create(&self, log: &FileLog) -> Result<()>;

    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<()>;
}
