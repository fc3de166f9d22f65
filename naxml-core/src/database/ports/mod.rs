//! Port traits: the behavior the service layer depends on, independent of
//! the storage engine behind it.

pub mod audit;
pub mod file_log;
pub mod fuel;
pub mod integration;
pub mod reference_entities;
pub mod shift_user;
pub mod sync_log;
pub mod transaction;

pub use audit::AuditRecordRepository;
pub use file_log::FileLogRepository;
pub use fuel::{DaySummaryRepository, FuelSummaryRepository};
pub use integration::IntegrationRepository;
pub use reference_entities::{
    DepartmentRepository, FuelGradeRepository, FuelPositionRepository, TaxRateRepository,
    TenderTypeRepository,
};
pub use shift_user::{ShiftRepository, UserRepository};
pub use sync_log::SyncLogRepository;
pub use transaction::TransactionRepository;
