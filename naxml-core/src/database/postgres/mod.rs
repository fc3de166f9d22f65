//! Postgres implementations of the `database::ports` traits.

pub mod audit;
pub mod file_log;
pub mod fuel;
pub mod integration;
pub mod reference_entities;
pub mod shift_user;
pub mod sync_log;
pub mod transaction;

pub use audit::PostgresAuditRecordRepository;
pub use file_log::PostgresFileLogRepository;
pub use fuel::{PostgresDaySummaryRepository, PostgresFuelSummaryRepository};
pub use integration::PostgresIntegrationRepository;
pub use reference_entities::{
    PostgresDepartmentRepository, PostgresFuelGradeRepository, PostgresFuelPositionRepository,
    PostgresTaxRateRepository, PostgresTenderTypeRepository,
};
pub use shift_user::{PostgresShiftRepository, PostgresUserRepository};
pub use sync_log::PostgresSyncLogRepository;
pub use transaction::PostgresTransactionRepository;
