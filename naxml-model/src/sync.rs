//! Audit trail (`AuditRecord`) and sync-cycle reporting types.

use chrono::{DateTime, Utc};

use crate::ids::{AuditRecordId, IntegrationId, StoreId, SyncLogId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ExchangeType {
    FileImport,
    FileExport,
    SyncOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AuditStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Partial,
}

impl AuditStatus {
    /// The status lattice is monotone: PENDING -> PROCESSING -> terminal.
    /// Once terminal, no further transition is legal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuditStatus::Success | AuditStatus::Failed | AuditStatus::Partial)
    }

    pub fn can_transition_to(&self, next: AuditStatus) -> bool {
        use AuditStatus::*;
        match (self, next) {
            (Pending, Processing) => true,
            (Processing, Success | Failed | Partial) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditRecord {
    pub id: AuditRecordId,
    pub exchange_id: String,
    pub store_id: StoreId,
    pub exchange_type: ExchangeType,
    pub direction: Direction,
    pub data_category: String,
    pub source_system: Option<String>,
    pub destination_system: Option<String>,
    pub contains_pii: bool,
    pub contains_financial: bool,
    pub status: AuditStatus,
    pub record_count: Option<i32>,
    pub data_size: Option<i64>,
    pub file_hash: Option<String>,
    pub retention_policy: String,
    pub retention_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status.is_terminal() && now >= self.retention_expires_at
    }
}

/// Outcome of a sync cycle for a single entity category: counts of rows
/// received, created, updated, and deactivated, plus any per-row errors.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySyncResult {
    pub category: String,
    pub received: u32,
    pub created: u32,
    pub updated: u32,
    pub deactivated: u32,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SyncOutcome {
    Success,
    PartialSuccess,
    Failed,
}

impl SyncOutcome {
    /// A cycle is `SUCCESS` if zero errors, `PARTIAL_SUCCESS` if at least
    /// one category has results alongside errors, `FAILED` if every
    /// attempted category errored without results.
    pub fn aggregate(categories: &[CategorySyncResult]) -> SyncOutcome {
        let any_errors = categories.iter().any(|c| !c.errors.is_empty());
        if !any_errors {
            return SyncOutcome::Success;
        }
        let any_results = categories
            .iter()
            .any(|c| c.created + c.updated + c.deactivated > 0);
        if any_results {
            SyncOutcome::PartialSuccess
        } else {
            SyncOutcome::Failed
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncLog {
    pub id: SyncLogId,
    pub integration_id: IntegrationId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub categories: Vec<CategorySyncResult>,
    pub outcome: SyncOutcome,
}

impl SyncLog {
    pub fn next_sync_at(&self, sync_interval_mins: i32) -> DateTime<Utc> {
        self.completed_at + chrono::Duration::minutes(sync_interval_mins.max(1) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(created: u32, errors: usize) -> CategorySyncResult {
        CategorySyncResult {
            category: "departments".into(),
            received: created,
            created,
            updated: 0,
            deactivated: 0,
            errors: vec!["x".to_string(); errors],
        }
    }

    #[test]
    fn success_when_no_errors() {
        assert_eq!(SyncOutcome::aggregate(&[cat(3, 0)]), SyncOutcome::Success);
    }

    #[test]
    fn partial_when_results_and_errors_coexist() {
        assert_eq!(
            SyncOutcome::aggregate(&[cat(3, 1)]),
            SyncOutcome::PartialSuccess
        );
    }

    #[test]
    fn failed_when_all_errors_no_results() {
        assert_eq!(SyncOutcome::aggregate(&[cat(0, 2)]), SyncOutcome::Failed);
    }

    #[test]
    fn audit_status_lattice_rejects_skip() {
        assert!(!AuditStatus::Pending.can_transition_to(AuditStatus::Success));
        assert!(AuditStatus::Pending.can_transition_to(AuditStatus::Processing));
        assert!(AuditStatus::Processing.can_transition_to(AuditStatus::Success));
    }
}
