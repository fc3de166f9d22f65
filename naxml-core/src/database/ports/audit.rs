//! Audit trail persistence: record-then-act, monotone status
//! lattice, and retention sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use naxml_model::ids::AuditRecordId;
use naxml_model::sync::{AuditRecord, AuditStatus};
use naxml_model::Result;

#[async_trait]
pub trait AuditRecordRepository: Send + Sync {
    /// Must succeed before any side effect of the exchange it covers is
    /// attempted.
    async fn create(&self, record: &AuditRecord) -> Result<()>;

    /// Rejects a transition outside `AuditStatus::can_transition_to` at the
    /// storage layer too, not just in-process, since retries can race.
    async fn transition(
        &self,
        id: AuditRecordId,
        next: AuditStatus,
        record_count: Option<i32>,
        data_size: Option<i64>,
    ) -> Result<()>;

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Fills in a hash discovered only after the exchange it covers ran its
    /// course — an exported file's content hash isn't known until it's
    /// written, unlike an inbound file's, which is known before the audit
    /// record is even opened.
    async fn record_file_hash(&self, id: AuditRecordId, file_hash: &str) -> Result<()>;
}
