//! The seam between a POS vendor dialect and the ingestion core.
//!
//! `PosAdapter` is deliberately small: per-document extraction lives on two
//! optional capability traits (`FuelSalesSync`, `PjrExtraction`) rather than
//! one monolithic interface, so a vendor that never emits `FuelGradeMovement`
//! documents (few do outside fuel sites) need not implement a no-op. Callers
//! dynamic-dispatch on `PosType` to the concrete adapter and then probe
//! `capabilities()` before downcasting to the optional traits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use naxml_model::document::{
    DocumentKind, FuelGradeMovementDoc, MaintenanceDocument, MiscSummaryMovementDoc,
    TransactionDocument,
};
use naxml_model::entities::{Department, PriceBookItem, TaxRate, TenderType};
use naxml_model::fuel::ShiftFuelSummary;
use naxml_model::ids::StoreId;
use naxml_model::vendor::PosType;
use naxml_model::Result;

/// What a given vendor adapter can extract. The filename-classification
/// table in `naxml-core` uses this to decide which movement reports are
/// even worth routing to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterCapabilities {
    pub supports_pos_journal: bool,
    pub supports_fuel_grade_movement: bool,
    pub supports_misc_summary_movement: bool,
    pub generates_acknowledgments: bool,
}

/// The exchange-root subpaths a vendor's file layout uses, e.g. Gilbarco's
/// `BOOutbox`/`BOInbox` vs. Verifone's `Out`/`In`.
#[derive(Debug, Clone, Copy)]
pub struct ExchangePaths {
    pub outbox: &'static str,
    pub inbox: &'static str,
    pub archive: &'static str,
    pub error: &'static str,
}

/// Result of probing an integration's exchange root, mirroring the
/// connection-test response the back-office UI surfaces:
/// `{success, message, posVersion, latencyMs, errorCode?, preview?}`.
#[derive(Debug, Clone)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    pub pos_version: Option<String>,
    pub latency_ms: u64,
    pub error_code: Option<String>,
    pub preview: Option<String>,
}

/// A maintenance document written to a vendor's inbox: the path it landed
/// at and the content hash recorded on the resulting audit record.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub file_hash: String,
    pub size: u64,
}

/// Common interface every vendor adapter implements. The registry in
/// `naxml-core::vendor` maps a `PosType` to a fixed implementation of this
/// trait rather than probing capabilities at runtime; `FuelSalesSync` and
/// `PjrExtraction` stay separate capability traits because not every vendor
/// emits those document kinds.
#[async_trait]
pub trait PosAdapter: Send + Sync {
    fn pos_type(&self) -> PosType;

    fn capabilities(&self) -> AdapterCapabilities;

    /// Map a bare filename to the document kind it's expected to contain,
    /// per this vendor's naming convention. Returns `None` for filenames
    /// the adapter doesn't recognize at all.
    fn classify_filename(&self, filename: &str) -> Option<DocumentKind>;

    /// This vendor's exchange-root subpath layout.
    fn exchange_paths(&self) -> ExchangePaths;

    /// Confirms an integration's outbox directory (its already-resolved
    /// `export_path`, not a root this adapter still has to join a subpath
    /// onto) is reachable. File exchange has no handshake to perform, so
    /// this checks the filesystem rather than a live POS endpoint.
    async fn test_connection(&self, outbox: &Path) -> Result<ConnectionTestResult>;

    /// Vendor-specific normalization hook for an inbound department
    /// maintenance document, applied before the core projects it. Most
    /// vendors' dialect already matches the shared `MaintenanceDocument`
    /// shape and return `doc` unchanged.
    async fn sync_departments(&self, doc: MaintenanceDocument) -> Result<MaintenanceDocument>;

    async fn sync_tender_types(&self, doc: MaintenanceDocument) -> Result<MaintenanceDocument>;

    async fn sync_cashiers(&self, doc: MaintenanceDocument) -> Result<MaintenanceDocument>;

    async fn sync_tax_rates(&self, doc: MaintenanceDocument) -> Result<MaintenanceDocument>;

    /// Baseline acceptance hook for inbound transaction documents, applied
    /// after `PjrExtraction::normalize_transaction` when a vendor implements
    /// that optional capability.
    async fn import_transactions(&self, doc: TransactionDocument) -> Result<TransactionDocument>;

    /// Builds this vendor's department-maintenance export document from
    /// `rows` and writes it into `inbox` (an integration's already-resolved
    /// `import_path`).
    async fn export_departments(
        &self,
        inbox: &Path,
        rows: &[Department],
        store_location_id: Option<&str>,
    ) -> Result<ExportedDocument>;

    async fn export_tender_types(
        &self,
        inbox: &Path,
        rows: &[TenderType],
        store_location_id: Option<&str>,
    ) -> Result<ExportedDocument>;

    async fn export_tax_rates(
        &self,
        inbox: &Path,
        rows: &[TaxRate],
        store_location_id: Option<&str>,
    ) -> Result<ExportedDocument>;

    async fn export_price_book(
        &self,
        inbox: &Path,
        rows: &[PriceBookItem],
        store_location_id: Option<&str>,
    ) -> Result<ExportedDocument>;
}

/// Adapters for vendors that emit `FuelGradeMovement` reports implement this
/// to turn a parsed document into shift-scoped fuel sales rows.
#[async_trait]
pub trait FuelSalesSync: PosAdapter {
    async fn extract_fuel_sales(
        &self,
        doc: &FuelGradeMovementDoc,
        store_id: StoreId,
        source_file_hash: &str,
    ) -> Result<Vec<ShiftFuelSummary>>;
}

/// Adapters for vendors that emit POS-journal / transaction documents
/// implement this as a hook for vendor-specific normalization before the
/// document reaches the Projector's transaction ingest (shift/cashier
/// resolution and final row assembly are store-context operations and stay
/// in the core, not the adapter).
#[async_trait]
pub trait PjrExtraction: PosAdapter {
    async fn normalize_transaction(&self, doc: TransactionDocument) -> Result<TransactionDocument>;
}

/// Adapters that also want a say in miscellaneous-summary handling (e.g. to
/// reinterpret vendor-specific summary codes before projection) implement
/// this; most vendors can rely on the core's default summary-code table.
#[async_trait]
pub trait MiscSummarySync: PosAdapter {
    async fn reinterpret_summary(&self, doc: &mut MiscSummaryMovementDoc) -> Result<()>;
}
