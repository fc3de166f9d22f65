//! Fuel-domain entities: FuelGrade, FuelPosition, ShiftFuelSummary,
//! MeterReading, DaySummary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::ids::{CompanyId, StoreId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FuelProductType {
    Gasoline,
    Diesel,
    Def,
    Kerosene,
    Other,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelGrade {
    pub company_id: CompanyId,
    pub grade_id: String,
    pub name: String,
    pub product_type: FuelProductType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelPosition {
    pub store_id: StoreId,
    pub position_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tender-type mapping for fuel movement detail records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FuelTenderType {
    Cash,
    OutsideCredit,
    OutsideDebit,
    InsideCredit,
    InsideDebit,
    Fleet,
    Other,
}

impl FuelTenderType {
    /// Maps the FGM tender-summary `tender` code allowlist onto the enum.
    /// Any value outside the allowlist maps to `Other`.
    pub fn from_fgm_code(code: &str) -> FuelTenderType {
        match code {
            "cash" => FuelTenderType::Cash,
            "outsideCredit" => FuelTenderType::OutsideCredit,
            "outsideDebit" => FuelTenderType::OutsideDebit,
            "insideCredit" => FuelTenderType::InsideCredit,
            "insideDebit" => FuelTenderType::InsideDebit,
            "fleet" => FuelTenderType::Fleet,
            _ => FuelTenderType::Other,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftFuelSummary {
    pub shift_summary_id: String,
    pub store_id: StoreId,
    pub fuel_grade_id: String,
    pub tender_type: FuelTenderType,
    pub volume: Decimal,
    pub amount: Decimal,
    pub discounts: Decimal,
    pub source_file_hash: String,
    pub business_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReadingType {
    Close,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterReading {
    pub store_id: StoreId,
    pub position_id: String,
    pub product_id: String,
    pub business_date: NaiveDate,
    pub reading_type: ReadingType,
    pub cumulative_volume: Decimal,
    pub cumulative_amount: Decimal,
    pub source_file_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DaySummary {
    pub store_id: StoreId,
    pub business_date: NaiveDate,
    pub fuel_sales: Decimal,
    pub fuel_gallons: Decimal,
    pub merchandise_sales: Decimal,
    pub net_sales: Decimal,
    pub gross_sales: Decimal,
    pub tax_total: Decimal,
    pub transaction_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DaySummary {
    pub fn empty(store_id: StoreId, business_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            store_id,
            business_date,
            fuel_sales: Decimal::ZERO,
            fuel_gallons: Decimal::ZERO,
            merchandise_sales: Decimal::ZERO,
            net_sales: Decimal::ZERO,
            gross_sales: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            transaction_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fgm_tender_allowlist_maps_known_codes() {
        assert_eq!(FuelTenderType::from_fgm_code("cash"), FuelTenderType::Cash);
        assert_eq!(
            FuelTenderType::from_fgm_code("outsideCredit"),
            FuelTenderType::OutsideCredit
        );
        assert_eq!(FuelTenderType::from_fgm_code("fleet"), FuelTenderType::Fleet);
    }

    #[test]
    fn fgm_tender_unknown_code_maps_to_other() {
        assert_eq!(FuelTenderType::from_fgm_code("giftCard"), FuelTenderType::Other);
    }
}
