//! Typed NAXML document variants — the parser's output.
//!
//! The generic attributed tree produced by the XML reader lives only inside
//! `naxml-core`'s reader stage; everything downstream of detection works with
//! these tagged document variants.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// The document kinds the adapter layer's filename-classification table and
/// the parser's root-element detection both recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DocumentKind {
    TransactionDocument,
    DepartmentMaintenance,
    TenderMaintenance,
    TaxRateMaintenance,
    PriceBookMaintenance,
    EmployeeMaintenance,
    FuelGradeMovement,
    FuelProductMovement,
    MiscellaneousSummaryMovement,
    TaxLevelMovement,
    MerchandiseCodeMovement,
    ItemSalesMovement,
    TankProductMovement,
    PosJournal,
    Acknowledgment,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::TransactionDocument => "TransactionDocument",
            DocumentKind::DepartmentMaintenance => "DepartmentMaintenance",
            DocumentKind::TenderMaintenance => "TenderMaintenance",
            DocumentKind::TaxRateMaintenance => "TaxRateMaintenance",
            DocumentKind::PriceBookMaintenance => "PriceBookMaintenance",
            DocumentKind::EmployeeMaintenance => "EmployeeMaintenance",
            DocumentKind::FuelGradeMovement => "FuelGradeMovement",
            DocumentKind::FuelProductMovement => "FuelProductMovement",
            DocumentKind::MiscellaneousSummaryMovement => "MiscellaneousSummaryMovement",
            DocumentKind::TaxLevelMovement => "TaxLevelMovement",
            DocumentKind::MerchandiseCodeMovement => "MerchandiseCodeMovement",
            DocumentKind::ItemSalesMovement => "ItemSalesMovement",
            DocumentKind::TankProductMovement => "TankProductMovement",
            DocumentKind::PosJournal => "POSJournal",
            DocumentKind::Acknowledgment => "Acknowledgment",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported NAXML schema versions. Anything else is a
/// warning-only "version drift" condition; parsing proceeds assuming 3.4.
pub const SUPPORTED_VERSIONS: &[&str] = &["3.2", "3.4", "4.0"];
pub const DEFAULT_VERSION: &str = "3.4";

// ---------------------------------------------------------------------
// Transaction / POSJournal
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosEventType {
    Sale,
    Refund,
    VoidSale,
    NoSale,
    PaidOut,
    PaidIn,
    SafeDrop,
    EndOfShift,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionHeader {
    pub store: String,
    pub terminal: Option<String>,
    pub pos_transaction_id: String,
    pub business_date: NaiveDate,
    pub transaction_date: DateTime<Utc>,
    pub event_type: PosEventType,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawLineItem {
    pub line_number: i32,
    pub item_code: String,
    pub department_code: String,
    /// `itemType` raw tag when present (`"tax"`, `"tender"`, or absent);
    /// tax/tender lines are filtered out of the projected line items and
    /// represented on totals/Payments instead.
    pub item_type: Option<String>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub extended_price: Decimal,
    pub tax_code: Option<String>,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub modifier_codes: Vec<String>,
    pub is_void: bool,
    pub is_refund: bool,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTender {
    pub code: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub reference: Option<String>,
    pub card_type: Option<String>,
    pub card_last4: Option<String>,
    pub change_given: Option<Decimal>,
    /// Change-return lines (`isChange = true`) are excluded from Payments.
    pub is_change: bool,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTax {
    pub code: String,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
    pub tax_rate: Decimal,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    pub discount_total: Decimal,
    pub change_due: Decimal,
    pub item_count: i32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionDocument {
    pub header: TransactionHeader,
    pub line_items: Vec<RawLineItem>,
    pub tenders: Vec<RawTender>,
    pub taxes: Vec<RawTax>,
    pub totals: TransactionTotals,
    pub is_training_mode: bool,
    pub is_outside_sale: bool,
    pub is_offline: bool,
    pub is_suspended: bool,
    pub linked_transaction_pos_id: Option<String>,
}

// ---------------------------------------------------------------------
// Maintenance documents
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaintenanceMode {
    Full,
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaintenanceAction {
    Add,
    Update,
    Delete,
    AddUpdate,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintenanceHeader {
    pub store: String,
    pub maintenance_date: NaiveDate,
    pub mode: MaintenanceMode,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintenanceEntity {
    pub pos_code: String,
    pub description: String,
    pub is_taxable: Option<bool>,
    pub is_electronic: Option<bool>,
    pub rate: Option<Decimal>,
    pub action: MaintenanceAction,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintenanceDocument {
    pub header: MaintenanceHeader,
    pub entities: Vec<MaintenanceEntity>,
}

// ---------------------------------------------------------------------
// Movement report header shared by FGM / FPM / MSM
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementHeader {
    pub report_sequence: Option<String>,
    pub primary_period: i32,
    pub secondary_period: Option<i32>,
    pub business_date: NaiveDate,
    pub begin: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub register: Option<String>,
    pub cashier: Option<String>,
    pub till: Option<String>,
}

impl MovementHeader {
    /// `PrimaryReportPeriod = 98` marks a shift-close report.
    pub fn is_shift_close(&self) -> bool {
        self.primary_period == 98
    }

    /// `PrimaryReportPeriod = 2` marks a day-close report.
    pub fn is_day_close(&self) -> bool {
        self.primary_period == 2
    }
}

// ---------------------------------------------------------------------
// FuelGradeMovement
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FgmTotals {
    pub sales_volume: Decimal,
    pub sales_amount: Decimal,
    pub discounts: Decimal,
    pub count: i32,
    pub tax_exempt: Decimal,
    pub dispenser_discount: Decimal,
    pub pump_test_volume: Option<Decimal>,
    pub pump_test_amount: Option<Decimal>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FgmTenderSummary {
    pub tender_code: String,
    pub sub_code: Option<String>,
    pub sell_price: Option<Decimal>,
    pub service_level: Option<String>,
    pub totals: FgmTotals,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FgmPriceTier {
    pub tier_code: String,
    pub totals: FgmTotals,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FgmPositionSummary {
    pub position_id: String,
    pub non_resettable_totals: Option<FgmTotals>,
    /// A detail may carry more than one price tier (regular/plus/premium);
    /// see DESIGN.md for how these fold into a single summary row.
    pub tiers: Vec<FgmPriceTier>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FgmDetailBody {
    Tender(FgmTenderSummary),
    Position(FgmPositionSummary),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FgmDetail {
    pub fuel_grade_id: String,
    pub body: FgmDetailBody,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelGradeMovementDoc {
    pub header: MovementHeader,
    pub details: Vec<FgmDetail>,
}

// ---------------------------------------------------------------------
// FuelProductMovement
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FpmReading {
    pub fuel_position_id: String,
    pub cumulative_volume: Decimal,
    pub cumulative_amount: Decimal,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FpmDetail {
    pub fuel_product_id: String,
    pub rows: Vec<FpmReading>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelProductMovementDoc {
    pub header: MovementHeader,
    pub details: Vec<FpmDetail>,
}

// ---------------------------------------------------------------------
// MiscellaneousSummaryMovement
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MsmTotals {
    /// For `code = fuelSalesByGrade` this field holds *volume*, not a
    /// transaction count.
    pub amount: Decimal,
    pub count: Decimal,
    pub tender: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MsmDetail {
    pub summary_code: String,
    pub sub_code: Option<String>,
    pub modifier: Option<String>,
    pub register: Option<String>,
    pub cashier: Option<String>,
    pub till: Option<String>,
    pub totals: MsmTotals,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MiscSummaryMovementDoc {
    pub header: MovementHeader,
    pub details: Vec<MsmDetail>,
}

// ---------------------------------------------------------------------
// Acknowledgment
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcknowledgmentDoc {
    pub referenced_exchange_id: String,
    pub status: String,
}

// ---------------------------------------------------------------------
// The top-level sum type
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NaxmlDocument {
    Transaction(TransactionDocument),
    PosJournal(TransactionDocument),
    DepartmentMaint(MaintenanceDocument),
    TenderMaint(MaintenanceDocument),
    TaxRateMaint(MaintenanceDocument),
    PriceBookMaint(MaintenanceDocument),
    EmployeeMaint(MaintenanceDocument),
    FuelGradeMovement(FuelGradeMovementDoc),
    FuelProductMovement(FuelProductMovementDoc),
    MiscellaneousSummaryMovement(MiscSummaryMovementDoc),
    Acknowledgment(AcknowledgmentDoc),
}

impl NaxmlDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            NaxmlDocument::Transaction(_) => DocumentKind::TransactionDocument,
            NaxmlDocument::PosJournal(_) => DocumentKind::PosJournal,
            NaxmlDocument::DepartmentMaint(_) => DocumentKind::DepartmentMaintenance,
            NaxmlDocument::TenderMaint(_) => DocumentKind::TenderMaintenance,
            NaxmlDocument::TaxRateMaint(_) => DocumentKind::TaxRateMaintenance,
            NaxmlDocument::PriceBookMaint(_) => DocumentKind::PriceBookMaintenance,
            NaxmlDocument::EmployeeMaint(_) => DocumentKind::EmployeeMaintenance,
            NaxmlDocument::FuelGradeMovement(_) => DocumentKind::FuelGradeMovement,
            NaxmlDocument::FuelProductMovement(_) => DocumentKind::FuelProductMovement,
            NaxmlDocument::MiscellaneousSummaryMovement(_) => {
                DocumentKind::MiscellaneousSummaryMovement
            }
            NaxmlDocument::Acknowledgment(_) => DocumentKind::Acknowledgment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_period_classifies_shift_vs_day() {
        let mut header = MovementHeader {
            report_sequence: None,
            primary_period: 98,
            secondary_period: None,
            business_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            begin: None,
            end: None,
            register: None,
            cashier: None,
            till: None,
        };
        assert!(header.is_shift_close());
        header.primary_period = 2;
        assert!(header.is_day_close());
    }
}
