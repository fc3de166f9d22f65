//! Maintenance-synced reference data repositories.

use async_trait::async_trait;

use naxml_model::entities::{Department, TaxRate, TenderType};
use naxml_model::fuel::{FuelGrade, FuelPosition};
use naxml_model::ids::{CompanyId, StoreId};
use naxml_model::Result;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<Department>>;
    async fn upsert_many(&self, rows: &[Department]) -> Result<()>;
    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()>;
}

#[async_trait]
pub trait TenderTypeRepository: Send + Sync {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<TenderType>>;
    async fn upsert_many(&self, rows: &[TenderType]) -> Result<()>;
    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()>;
}

#[async_trait]
pub trait TaxRateRepository: Send + Sync {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<TaxRate>>;
    async fn upsert_many(&self, rows: &[TaxRate]) -> Result<()>;
    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()>;
}

#[async_trait]
pub trait FuelGradeRepository: Send + Sync {
    async fn find_all(&self, company_id: CompanyId) -> Result<Vec<FuelGrade>>;
    async fn upsert_many(&self, rows: &[FuelGrade]) -> Result<()>;
}

#[async_trait]
pub trait FuelPositionRepository: Send + Sync {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<FuelPosition>>;
    async fn upsert_many(&self, rows: &[FuelPosition]) -> Result<()>;
}
