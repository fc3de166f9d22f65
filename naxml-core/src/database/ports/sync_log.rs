//! Sync-cycle result persistence, separate from `AuditRecordRepository`:
//! one row per completed cycle, not per exchange.

use async_trait::async_trait;

use naxml_model::sync::SyncLog;
use naxml_model::Result;

#[async_trait]
pub trait SyncLogRepository: Send + Sync {
    async fn record(&self, log: &SyncLog) -> Result<()>;
}
