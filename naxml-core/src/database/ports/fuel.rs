//! Fuel movement projections: shift-scoped summaries and the store's
//! rolling day summary.

use async_trait::async_trait;
use chrono::NaiveDate;

use naxml_model::fuel::{DaySummary, ShiftFuelSummary};
use naxml_model::ids::StoreId;
use naxml_model::Result;

#[async_trait]
pub trait FuelSummaryRepository: Send + Sync {
    async fn upsert_many(&self, rows: &[ShiftFuelSummary]) -> Result<()>;
}

#[async_trait]
pub trait DaySummaryRepository: Send + Sync {
    async fn get_or_create(&self, store_id: StoreId, business_date: NaiveDate) -> Result<DaySummary>;
    async fn save(&self, summary: &DaySummary) -> Result<()>;
}
