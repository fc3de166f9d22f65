//! `FileLog`: at-most-once bookkeeping per `(store_id, file_hash)`.

use chrono::{DateTime, Utc};

use crate::ids::{FileLogId, StoreId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FileStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Partial,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FileDirection {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileLog {
    pub id: FileLogId,
    pub store_id: StoreId,
    pub file_hash: String,
    pub file_name: String,
    pub file_type: String,
    pub direction: FileDirection,
    pub status: FileStatus,
    pub size: i64,
    pub processing_ms: Option<i64>,
    pub record_count: Option<i32>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub source_path: Option<String>,
    pub processed_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl FileLog {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            FileStatus::Success | FileStatus::Failed | FileStatus::Partial | FileStatus::Skipped
        )
    }
}
