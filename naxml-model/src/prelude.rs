//! Convenience re-exports for downstream crates.

pub use crate::document::{
    AcknowledgmentDoc, DocumentKind, FgmDetail, FgmDetailBody, FgmPositionSummary, FgmPriceTier,
    FgmTenderSummary, FgmTotals, FpmDetail, FpmReading, FuelGradeMovementDoc,
    FuelProductMovementDoc, MaintenanceAction, MaintenanceDocument, MaintenanceEntity,
    MaintenanceHeader, MaintenanceMode, MiscSummaryMovementDoc, MovementHeader, MsmDetail,
    MsmTotals, NaxmlDocument, PosEventType, RawLineItem, RawTax, RawTender, TransactionDocument,
    TransactionHeader, TransactionTotals,
};
pub use crate::entities::{derive_local_code, slugify, Department, TaxRate, TenderType};
pub use crate::error::{NaxmlError, Result};
pub use crate::file_log::{FileDirection, FileLog, FileStatus};
pub use crate::fuel::{
    DaySummary, FuelGrade, FuelPosition, FuelProductType, FuelTenderType, MeterReading,
    ReadingType, ShiftFuelSummary,
};
pub use crate::ids::{
    AuditRecordId, CompanyId, FileLogId, IntegrationId, ShiftId, StoreId, TransactionId, UserId,
};
pub use crate::pos_integration::{
    clamp_poll_interval, POSIntegration, DEFAULT_POLL_INTERVAL_SECONDS, MAX_POLL_INTERVAL_SECONDS,
    MIN_POLL_INTERVAL_SECONDS,
};
pub use crate::shift_user::{Shift, User, UserRole};
pub use crate::sync::{
    AuditRecord, AuditStatus, CategorySyncResult, Direction, ExchangeType, SyncLog, SyncOutcome,
};
pub use crate::transaction::{
    derive_public_id, LineItem, LineItemType, Payment, PosTransactionType, Transaction,
};
pub use crate::vendor::{ConnectionMode, PosSource, PosType};
