//! `AuditRecorder`: a thin "record-then-act" wrapper around
//! `AuditRecordRepository`.
//!
//! Creating the audit record happens before any projection side effect; if
//! creation fails, the caller must not touch projected tables. Status
//! transitions are checked against `AuditStatus::can_transition_to`
//! in-process before the repository is asked to persist them, so a
//! programming error never reaches the database as an illegal transition.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use naxml_model::ids::{AuditRecordId, StoreId};
use naxml_model::sync::{AuditRecord, AuditStatus, Direction, ExchangeType};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::AuditRecordRepository;

/// Default retention window for terminal audit records.
pub const DEFAULT_RETENTION_DAYS: i64 = 365;

#[derive(Clone)]
pub struct AuditRecorder {
    repo: Arc<dyn AuditRecordRepository>,
    retention_days: i64,
}

/// Inputs needed to open a new audit record, independent of storage.
pub struct NewAuditRecord {
    pub exchange_id: String,
    pub store_id: StoreId,
    pub exchange_type: ExchangeType,
    pub direction: Direction,
    pub data_category: String,
    pub source_system: Option<String>,
    pub destination_system: Option<String>,
    pub contains_pii: bool,
    pub contains_financial: bool,
    pub file_hash: Option<String>,
    pub retention_policy: String,
}

impl AuditRecorder {
    /// `retention_days` governs every record this recorder opens; pass the
    /// deployment's configured `NAXML_AUDIT_RETENTION_DAYS`
    /// (`naxml_config::Config::audit_retention_days`), or
    /// [`DEFAULT_RETENTION_DAYS`] when no config layer is involved (tests).
    pub fn new(repo: Arc<dyn AuditRecordRepository>, retention_days: i64) -> Self {
        Self { repo, retention_days }
    }

    /// Open a `PENDING` audit record. This is a precondition for any
    /// projection work, not a side-effect wrapped around it.
    pub async fn open(&self, input: NewAuditRecord) -> Result<AuditRecord> {
        let now = Utc::now();
        let record = AuditRecord {
            id: AuditRecordId::new(),
            exchange_id: input.exchange_id,
            store_id: input.store_id,
            exchange_type: input.exchange_type,
            direction: input.direction,
            data_category: input.data_category,
            source_system: input.source_system,
            destination_system: input.destination_system,
            contains_pii: input.contains_pii,
            contains_financial: input.contains_financial,
            status: AuditStatus::Pending,
            record_count: None,
            data_size: None,
            file_hash: input.file_hash,
            retention_policy: input.retention_policy,
            retention_expires_at: now + Duration::days(self.retention_days),
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&record).await.map_err(|e| {
            NaxmlError::AuditCreationFailed(e.to_string())
        })?;

        Ok(record)
    }

    pub async fn mark_processing(&self, record: &AuditRecord) -> Result<()> {
        self.transition(record, AuditStatus::Processing, None, None).await
    }

    pub async fn mark_success(
        &self,
        record: &AuditRecord,
        record_count: i32,
        data_size: i64,
    ) -> Result<()> {
        self.transition(record, AuditStatus::Success, Some(record_count), Some(data_size))
            .await
    }

    pub async fn mark_failed(&self, record: &AuditRecord) -> Result<()> {
        self.transition(record, AuditStatus::Failed, None, None).await
    }

    pub async fn mark_partial(
        &self,
        record: &AuditRecord,
        record_count: i32,
        data_size: i64,
    ) -> Result<()> {
        self.transition(record, AuditStatus::Partial, Some(record_count), Some(data_size))
            .await
    }

    /// Fills in a hash only known once the exchange finished, e.g. an
    /// exported file's content hash. Independent of the status lattice.
    pub async fn record_file_hash(&self, record: &AuditRecord, file_hash: &str) -> Result<()> {
        self.repo.record_file_hash(record.id, file_hash).await
    }

    async fn transition(
        &self,
        record: &AuditRecord,
        next: AuditStatus,
        record_count: Option<i32>,
        data_size: Option<i64>,
    ) -> Result<()> {
        if !record.status.can_transition_to(next) {
            return Err(NaxmlError::Internal(format!(
                "illegal audit transition {:?} -> {next:?} for {}",
                record.status, record.id
            )));
        }

        self.repo
            .transition(record.id, next, record_count, data_size)
            .await
    }

    /// Delete terminal records past their retention window. Intended to be
    /// called on a periodic schedule by the server, not per file.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let swept = self.repo.sweep_expired(now).await?;
        debug!(swept, "audit retention sweep complete");
        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always succeeds; exists only to prove the in-process transition
    /// guard rejects an illegal move before the repository is ever asked.
    struct AlwaysOkRepo;

    #[async_trait::async_trait]
    impl AuditRecordRepository for AlwaysOkRepo {
        async fn create(&self, _record: &AuditRecord) -> Result<()> {
            Ok(())
        }

        async fn transition(
            &self,
            _id: AuditRecordId,
            _next: AuditStatus,
            _record_count: Option<i32>,
            _data_size: Option<i64>,
        ) -> Result<()> {
            Ok(())
        }

        async fn sweep_expired(&self, _now: DateTime<Utc>) -> Result<u64> {
            Ok(0)
        }

        async fn record_file_hash(&self, _id: AuditRecordId, _file_hash: &str) -> Result<()> {
            Ok(())
        }
    }

    fn pending_record() -> AuditRecord {
        let now = Utc::now();
        AuditRecord {
            id: AuditRecordId::new(),
            exchange_id: "fgm-001".to_string(),
            store_id: StoreId::new(),
            exchange_type: ExchangeType::FileImport,
            direction: Direction::Inbound,
            data_category: "fuel_sales".to_string(),
            source_system: None,
            destination_system: None,
            contains_pii: false,
            contains_financial: true,
            status: AuditStatus::Pending,
            record_count: None,
            data_size: None,
            file_hash: None,
            retention_policy: "standard-90d".to_string(),
            retention_expires_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn pending_to_processing_is_allowed() {
        let recorder = AuditRecorder::new(Arc::new(AlwaysOkRepo), DEFAULT_RETENTION_DAYS);
        let record = pending_record();
        assert!(recorder.mark_processing(&record).await.is_ok());
    }

    #[tokio::test]
    async fn pending_to_success_is_rejected_even_though_the_repo_would_allow_it() {
        let recorder = AuditRecorder::new(Arc::new(AlwaysOkRepo), DEFAULT_RETENTION_DAYS);
        let record = pending_record();
        let err = recorder.mark_success(&record, 10, 1024).await.unwrap_err();
        assert!(matches!(err, NaxmlError::Internal(_)));
    }

    #[tokio::test]
    async fn terminal_to_anything_is_rejected() {
        let recorder = AuditRecorder::new(Arc::new(AlwaysOkRepo), DEFAULT_RETENTION_DAYS);
        let mut record = pending_record();
        record.status = AuditStatus::Success;
        assert!(recorder.mark_failed(&record).await.is_err());
    }

    #[tokio::test]
    async fn open_sets_retention_window_from_configured_days() {
        let recorder = AuditRecorder::new(Arc::new(AlwaysOkRepo), 30);
        let record = recorder
            .open(NewAuditRecord {
                exchange_id: "fgm-002".to_string(),
                store_id: StoreId::new(),
                exchange_type: ExchangeType::FileImport,
                direction: Direction::Inbound,
                data_category: "fuel_sales".to_string(),
                source_system: None,
                destination_system: None,
                contains_pii: false,
                contains_financial: true,
                file_hash: Some("abc123".to_string()),
                retention_policy: "standard-30d".to_string(),
            })
            .await
            .unwrap();
        let window = record.retention_expires_at - record.created_at;
        assert_eq!(window.num_days(), 30);
    }
}
