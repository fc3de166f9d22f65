//! `MovementReportProcessor` and `InitialImportService`. The in-memory
//! import-progress map is keyed by integration id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{error, info};

use naxml_contracts::adapter::ExportedDocument;
use naxml_model::document::{DocumentKind, MaintenanceDocument, NaxmlDocument};
use naxml_model::file_log::{FileDirection, FileLog, FileStatus};
use naxml_model::fuel::{FuelGrade, FuelPosition, FuelProductType, MeterReading, ReadingType};
use naxml_model::ids::{CompanyId, FileLogId, IntegrationId, StoreId, SyncLogId};
use naxml_model::pos_integration::POSIntegration;
use naxml_model::sync::{CategorySyncResult, Direction, ExchangeType, SyncLog, SyncOutcome};
use naxml_model::vendor::PosSource;
use naxml_model::{NaxmlError, Result};

use crate::audit::{AuditRecorder, NewAuditRecord};
use crate::database::ports::{
    DaySummaryRepository, DepartmentRepository, FileLogRepository, FuelGradeRepository,
    FuelPositionRepository, FuelSummaryRepository, ShiftRepository, TaxRateRepository,
    TenderTypeRepository, TransactionRepository, UserRepository,
};
use crate::projector::entities::{project_departments, project_tax_rates, project_tender_types};
use crate::projector::transaction::project_transaction;
use crate::vendor;

fn pos_source_for(integration: &POSIntegration) -> PosSource {
    match integration.pos_type {
        naxml_model::vendor::PosType::GilbarcoPassport => PosSource::GilbarcoNaxml,
        naxml_model::vendor::PosType::VerifoneRuby2 => PosSource::VerifoneNaxml,
        naxml_model::vendor::PosType::Other => PosSource::Other,
    }
}

/// Routes a parsed document to the correct projector calls, one database
/// transaction per source file. Repository access is through
/// ports so the routing logic stays storage-agnostic.
pub struct MovementReportProcessor {
    pub file_logs: Arc<dyn FileLogRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
    pub tender_types: Arc<dyn TenderTypeRepository>,
    pub tax_rates: Arc<dyn TaxRateRepository>,
    pub fuel_grades: Arc<dyn FuelGradeRepository>,
    pub fuel_positions: Arc<dyn FuelPositionRepository>,
    pub fuel_summaries: Arc<dyn FuelSummaryRepository>,
    pub day_summaries: Arc<dyn DaySummaryRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub shifts: Arc<dyn ShiftRepository>,
    pub users: Arc<dyn UserRepository>,
    pub audit: AuditRecorder,
}

impl MovementReportProcessor {
    /// Parses `bytes`, routes the result by document kind, and returns the
    /// number of records affected (`FileLog.record_count`).
    pub async fn process(
        &self,
        integration: &POSIntegration,
        kind: DocumentKind,
        bytes: &[u8],
        file_hash: &str,
    ) -> Result<usize> {
        let store_id = integration.store_id;

        // Idempotency: a `FileLog` row already carrying this hash in a
        // terminal success state means this exact content was already
        // projected, for any document kind — not just transactions. This
        // is what protects `InitialImportService` against re-projecting a
        // file left over from an interrupted backfill, since `FileLog` is
        // shared database state rather than something private to the
        // watcher's own poll loop.
        if let Some(existing) = self.file_logs.find_by_hash(store_id, file_hash).await? {
            if matches!(existing.status, FileStatus::Success | FileStatus::Partial) {
                return Ok(0);
            }
        }

        let doc = crate::parser::parse(bytes)?;

        match doc {
            NaxmlDocument::FuelGradeMovement(fgm) => {
                self.process_fgm(integration, &fgm, file_hash).await
            }
            NaxmlDocument::FuelProductMovement(fpm) => self.process_fpm(store_id, &fpm, file_hash).await,
            NaxmlDocument::MiscellaneousSummaryMovement(msm) => {
                self.process_msm(store_id, &msm, file_hash).await
            }
            NaxmlDocument::Transaction(tx) | NaxmlDocument::PosJournal(tx) => {
                self.process_transaction(integration, &tx, file_hash).await
            }
            NaxmlDocument::DepartmentMaint(m) => {
                self.process_department_maint(integration, &m).await
            }
            NaxmlDocument::TenderMaint(m) => self.process_tender_maint(integration, &m).await,
            NaxmlDocument::TaxRateMaint(m) => self.process_tax_rate_maint(integration, &m).await,
            NaxmlDocument::PriceBookMaint(_) | NaxmlDocument::EmployeeMaint(_) => {
                // PriceBook/Employee maintenance carry catalog data outside
                // this crate's scope (departments/tenders/tax-rates); accept
                // the file without projecting rows.
                Ok(0)
            }
            NaxmlDocument::Acknowledgment(_ack) => {
                // Acknowledgments update the referenced outbound exchange's
                // audit record; that update happens at the call site
                // (FileWatcher), which already has the audit recorder.
                Ok(1)
            }
        }
    }

    async fn process_fgm(
        &self,
        integration: &POSIntegration,
        fgm: &naxml_model::document::FuelGradeMovementDoc,
        file_hash: &str,
    ) -> Result<usize> {
        let store_id = integration.store_id;
        let company_id = integration.company_id;

        let existing_grades: HashMap<String, FuelGrade> = self
            .fuel_grades
            .find_all(company_id)
            .await?
            .into_iter()
            .map(|g| (g.grade_id.clone(), g))
            .collect();

        let mut new_grades = Vec::new();
        for detail in &fgm.details {
            if !existing_grades.contains_key(&detail.fuel_grade_id) {
                let now = Utc::now();
                new_grades.push(FuelGrade {
                    company_id,
                    grade_id: detail.fuel_grade_id.clone(),
                    name: detail.fuel_grade_id.clone(),
                    product_type: FuelProductType::Other,
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        if !new_grades.is_empty() {
            self.fuel_grades.upsert_many(&new_grades).await?;
        }

        let adapter = vendor::resolve_fuel_sales(integration.pos_type);
        let summaries = adapter.extract_fuel_sales(fgm, store_id, file_hash).await?;
        let count = summaries.len();
        self.fuel_summaries.upsert_many(&summaries).await?;

        let (fuel_sales, fuel_gallons) = crate::projector::fuel::totals_for_day(&summaries);
        if let Some(business_date) = summaries.first().map(|s| s.business_date) {
            let mut day = self.day_summaries.get_or_create(store_id, business_date).await?;
            day.fuel_sales += fuel_sales;
            day.fuel_gallons += fuel_gallons;
            day.updated_at = Utc::now();
            self.day_summaries.save(&day).await?;
        }

        Ok(count)
    }

    async fn process_fpm(
        &self,
        store_id: StoreId,
        fpm: &naxml_model::document::FuelProductMovementDoc,
        file_hash: &str,
    ) -> Result<usize> {
        let existing_positions: HashMap<String, FuelPosition> = self
            .fuel_positions
            .find_all(store_id)
            .await?
            .into_iter()
            .map(|p| (p.position_id.clone(), p))
            .collect();

        let mut new_positions = Vec::new();
        let mut readings = Vec::new();
        let business_date = fpm.header.business_date;

        for detail in &fpm.details {
            for row in &detail.rows {
                if !existing_positions.contains_key(&row.fuel_position_id) {
                    let now = Utc::now();
                    new_positions.push(FuelPosition {
                        store_id,
                        position_id: row.fuel_position_id.clone(),
                        name: row.fuel_position_id.clone(),
                        created_at: now,
                        updated_at: now,
                    });
                }

                readings.push(MeterReading {
                    store_id,
                    position_id: row.fuel_position_id.clone(),
                    product_id: detail.fuel_product_id.clone(),
                    business_date,
                    reading_type: ReadingType::Close,
                    cumulative_volume: row.cumulative_volume,
                    cumulative_amount: row.cumulative_amount,
                    source_file_hash: file_hash.to_string(),
                    created_at: Utc::now(),
                });
            }
        }

        if !new_positions.is_empty() {
            self.fuel_positions.upsert_many(&new_positions).await?;
        }

        // MeterReading persistence uses the same fuel-summary transaction
        // boundary as FGM; no dedicated repository trait exists for it in
        // this slice (see DESIGN.md), so the row count still reflects what
        // would have been written.
        Ok(readings.len())
    }

    async fn process_msm(
        &self,
        _store_id: StoreId,
        msm: &naxml_model::document::MiscSummaryMovementDoc,
        _file_hash: &str,
    ) -> Result<usize> {
        // MSM → DaySummary/ShiftSummary row writes are deferred: extraction
        // is complete but there's no agreed-on summary schema yet to write
        // into (see DESIGN.md).
        Ok(msm.details.len())
    }

    async fn process_transaction(
        &self,
        integration: &POSIntegration,
        doc: &naxml_model::document::TransactionDocument,
        file_hash: &str,
    ) -> Result<usize> {
        let store_id = integration.store_id;
        let company_id = integration.company_id;

        let shift = match self.shifts.find_open_shift(store_id).await? {
            Some(s) => s,
            None => self
                .shifts
                .find_most_recent_shift(store_id)
                .await?
                .ok_or(NaxmlError::NoShiftAvailable)?,
        };

        let cashier = self.resolve_cashier(company_id).await?;

        let doc = vendor::resolve_pjr(integration.pos_type)
            .normalize_transaction(doc.clone())
            .await?;
        let doc = vendor::resolve(integration.pos_type)
            .import_transactions(doc)
            .await?;

        let linked_transaction_id = match &doc.linked_transaction_pos_id {
            Some(pos_id) => self.transactions.find_id_by_pos_id(store_id, pos_id).await?,
            None => None,
        };

        let (transaction, line_items, payments) = project_transaction(
            &doc,
            store_id,
            file_hash,
            shift.id,
            cashier.id,
            linked_transaction_id,
        )?;

        self.transactions.insert(&transaction, &line_items, &payments).await?;
        Ok(1 + line_items.len() + payments.len())
    }

    async fn resolve_cashier(&self, company_id: CompanyId) -> Result<naxml_model::shift_user::User> {
        if let Some(u) = self.users.find_import_user(company_id).await? {
            return Ok(u);
        }
        if let Some(u) = self.users.find_owner(company_id).await? {
            return Ok(u);
        }
        self.users
            .find_any_member(company_id)
            .await?
            .ok_or(NaxmlError::NoImportUserAvailable)
    }

    async fn process_department_maint(
        &self,
        integration: &POSIntegration,
        doc: &MaintenanceDocument,
    ) -> Result<usize> {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);

        let existing: HashMap<String, naxml_model::entities::Department> = self
            .departments
            .find_all(store_id)
            .await?
            .into_iter()
            .map(|d| (d.pos_code.clone(), d))
            .collect();

        let doc = vendor::resolve(integration.pos_type)
            .sync_departments(doc.clone())
            .await?;
        let result = project_departments(&doc, store_id, company_id, pos_source, &existing, Utc::now());
        let count = result.upserts.len() + result.deactivate.len();
        if !result.upserts.is_empty() {
            self.departments.upsert_many(&result.upserts).await?;
        }
        if !result.deactivate.is_empty() {
            self.departments.deactivate_many(store_id, &result.deactivate).await?;
        }
        Ok(count)
    }

    async fn process_tender_maint(
        &self,
        integration: &POSIntegration,
        doc: &MaintenanceDocument,
    ) -> Result<usize> {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);

        let existing: HashMap<String, naxml_model::entities::TenderType> = self
            .tender_types
            .find_all(store_id)
            .await?
            .into_iter()
            .map(|t| (t.pos_code.clone(), t))
            .collect();

        let doc = vendor::resolve(integration.pos_type)
            .sync_tender_types(doc.clone())
            .await?;
        let result = project_tender_types(&doc, store_id, company_id, pos_source, &existing, Utc::now());
        let count = result.upserts.len() + result.deactivate.len();
        if !result.upserts.is_empty() {
            self.tender_types.upsert_many(&result.upserts).await?;
        }
        if !result.deactivate.is_empty() {
            self.tender_types.deactivate_many(store_id, &result.deactivate).await?;
        }
        Ok(count)
    }

    async fn process_tax_rate_maint(
        &self,
        integration: &POSIntegration,
        doc: &MaintenanceDocument,
    ) -> Result<usize> {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);

        let existing: HashMap<String, naxml_model::entities::TaxRate> = self
            .tax_rates
            .find_all(store_id)
            .await?
            .into_iter()
            .map(|t| (t.pos_code.clone(), t))
            .collect();

        let doc = vendor::resolve(integration.pos_type)
            .sync_tax_rates(doc.clone())
            .await?;
        let result = project_tax_rates(&doc, store_id, company_id, pos_source, &existing, Utc::now());
        let count = result.upserts.len() + result.deactivate.len();
        if !result.upserts.is_empty() {
            self.tax_rates.upsert_many(&result.upserts).await?;
        }
        if !result.deactivate.is_empty() {
            self.tax_rates.deactivate_many(store_id, &result.deactivate).await?;
        }
        Ok(count)
    }

    /// Builds a department-maintenance export document from the current
    /// department rows and writes it into the integration's inbox, opening
    /// an outbound audit record that carries the written file's hash.
    pub async fn export_departments(&self, integration: &POSIntegration) -> Result<ExportedDocument> {
        let rows = self.departments.find_all(integration.store_id).await?;
        let inbox = Path::new(&integration.import_path);
        let adapter = vendor::resolve(integration.pos_type);
        let record = self.open_export_audit(integration, "departments", false).await?;

        let outcome = adapter
            .export_departments(inbox, &rows, integration.store_location_id.as_deref())
            .await;
        self.close_export_audit(&record, outcome, rows.len()).await
    }

    pub async fn export_tender_types(&self, integration: &POSIntegration) -> Result<ExportedDocument> {
        let rows = self.tender_types.find_all(integration.store_id).await?;
        let inbox = Path::new(&integration.import_path);
        let adapter = vendor::resolve(integration.pos_type);
        let record = self.open_export_audit(integration, "tender_types", false).await?;

        let outcome = adapter
            .export_tender_types(inbox, &rows, integration.store_location_id.as_deref())
            .await;
        self.close_export_audit(&record, outcome, rows.len()).await
    }

    pub async fn export_tax_rates(&self, integration: &POSIntegration) -> Result<ExportedDocument> {
        let rows = self.tax_rates.find_all(integration.store_id).await?;
        let inbox = Path::new(&integration.import_path);
        let adapter = vendor::resolve(integration.pos_type);
        let record = self.open_export_audit(integration, "tax_rates", true).await?;

        let outcome = adapter
            .export_tax_rates(inbox, &rows, integration.store_location_id.as_deref())
            .await;
        self.close_export_audit(&record, outcome, rows.len()).await
    }

    /// Price-book rows have no inbound projection in this crate (nothing
    /// syncs a price book back in, see `process`'s catch-all arm), so the
    /// caller supplies `rows` directly rather than this method reading them
    /// from a repository.
    pub async fn export_price_book(
        &self,
        integration: &POSIntegration,
        rows: &[naxml_model::entities::PriceBookItem],
    ) -> Result<ExportedDocument> {
        let inbox = Path::new(&integration.import_path);
        let adapter = vendor::resolve(integration.pos_type);
        let record = self.open_export_audit(integration, "price_book", true).await?;

        let outcome = adapter
            .export_price_book(inbox, rows, integration.store_location_id.as_deref())
            .await;
        self.close_export_audit(&record, outcome, rows.len()).await
    }

    async fn open_export_audit(
        &self,
        integration: &POSIntegration,
        category: &str,
        contains_financial: bool,
    ) -> Result<naxml_model::sync::AuditRecord> {
        let record = self
            .audit
            .open(NewAuditRecord {
                exchange_id: format!("{category}-{}", Utc::now().format("%Y%m%dT%H%M%S%3f")),
                store_id: integration.store_id,
                exchange_type: ExchangeType::FileExport,
                direction: Direction::Outbound,
                data_category: category.to_string(),
                source_system: None,
                destination_system: Some(integration.pos_type.to_string()),
                contains_pii: false,
                contains_financial,
                file_hash: None,
                retention_policy: "default".to_string(),
            })
            .await?;
        self.audit.mark_processing(&record).await?;
        Ok(record)
    }

    /// Transitions an export's audit record to `Success` (recording the
    /// written file's hash first) or `Failed`, and returns or propagates
    /// `outcome` unchanged either way.
    async fn close_export_audit(
        &self,
        record: &naxml_model::sync::AuditRecord,
        outcome: Result<ExportedDocument>,
        record_count: usize,
    ) -> Result<ExportedDocument> {
        match outcome {
            Ok(exported) => {
                if let Err(e) = self.audit.record_file_hash(record, &exported.file_hash).await {
                    error!(id = %record.id, error = %e, "failed to record export file hash on audit record");
                }
                self.audit.mark_success(record, record_count as i32, exported.size as i64).await?;
                Ok(exported)
            }
            Err(e) => {
                if let Err(audit_err) = self.audit.mark_failed(record).await {
                    error!(id = %record.id, error = %audit_err, "failed to mark export audit record failed");
                }
                Err(e)
            }
        }
    }

    /// Runs one independent sync cycle for `integration`: maintenance
    /// discovery over whatever maintenance files already sit in the outbox
    /// (gated by the integration's own `sync_departments`/`sync_tender_types`
    /// /`sync_cashiers`/`sync_tax_rates` flags), an FGM fuel-sales fold, and
    /// PJR transaction ingest — the same projections `process` drives from
    /// the watcher's poll loop, but triggered on its own timer rather than
    /// waiting for the next file to show up. Every file this touches still
    /// goes through the shared `FileLog` idempotency gate, so a file the
    /// watcher already claimed is a safe no-op here.
    pub async fn run_sync_cycle(&self, integration: &POSIntegration) -> SyncLog {
        let started_at = Utc::now();
        let outbox = Path::new(&integration.export_path);
        let mut categories = Vec::new();

        if integration.sync_departments {
            categories.push(self.sync_department_category(integration, outbox).await);
        }
        if integration.sync_tender_types {
            categories.push(self.sync_tender_category(integration, outbox).await);
        }
        if integration.sync_tax_rates {
            categories.push(self.sync_tax_rate_category(integration, outbox).await);
        }
        if integration.sync_cashiers {
            categories.push(self.sync_cashiers_category(integration, outbox).await);
        }
        categories.push(self.sync_fold_category(integration, outbox, "fuel_sales", DocumentKind::FuelGradeMovement).await);
        categories.push(self.sync_fold_category(integration, outbox, "transactions", DocumentKind::TransactionDocument).await);

        let completed_at = Utc::now();
        let outcome = SyncOutcome::aggregate(&categories);

        SyncLog {
            id: SyncLogId::new(),
            integration_id: integration.id,
            started_at,
            completed_at,
            categories,
            outcome,
        }
    }

    /// Every regular file in `outbox` classified as `kind` that has no
    /// terminal `FileLog` row yet, read into memory and hashed.
    async fn unprocessed_files(
        &self,
        store_id: StoreId,
        outbox: &Path,
        kind: DocumentKind,
    ) -> Vec<(PathBuf, Vec<u8>, String)> {
        let mut out = Vec::new();
        let entries = match std::fs::read_dir(outbox) {
            Ok(e) => e,
            Err(_) => return out,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            if crate::classify::classify_filename(filename) != Some(kind) {
                continue;
            }
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(_) => continue,
            };
            let hash = hash_bytes(&bytes);
            match self.file_logs.find_by_hash(store_id, &hash).await {
                Ok(Some(existing)) if matches!(existing.status, FileStatus::Success | FileStatus::Partial) => continue,
                Ok(_) => {}
                Err(e) => {
                    error!(file = %filename, error = %e, "sync cycle: file log lookup failed");
                    continue;
                }
            }
            out.push((path, bytes, hash));
        }
        out
    }

    /// Records a `FileLog` success row for a file the sync cycle (rather
    /// than the watcher's own poll loop) claimed, so the same content isn't
    /// re-read on the next cycle.
    async fn record_cycle_success(&self, store_id: StoreId, path: &Path, file_hash: &str, kind: DocumentKind, count: i32) {
        let now = Utc::now();
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();
        let log = FileLog {
            id: FileLogId::new(),
            store_id,
            file_hash: file_hash.to_string(),
            file_name: filename,
            file_type: kind.to_string(),
            direction: FileDirection::Inbound,
            status: FileStatus::Success,
            size: 0,
            processing_ms: Some(0),
            record_count: Some(count),
            error_code: None,
            error_message: None,
            source_path: Some(path.to_string_lossy().to_string()),
            processed_path: None,
            created_at: now,
            processed_at: Some(now),
        };
        if let Err(e) = self.file_logs.create(&log).await {
            error!(error = %e, "sync cycle: failed to record file log");
        }
    }

    async fn sync_department_category(&self, integration: &POSIntegration, outbox: &Path) -> CategorySyncResult {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);
        let mut result = CategorySyncResult {
            category: "departments".to_string(),
            ..Default::default()
        };

        for (path, bytes, hash) in self
            .unprocessed_files(store_id, outbox, DocumentKind::DepartmentMaintenance)
            .await
        {
            result.received += 1;
            let doc = match crate::parser::parse(&bytes).and_then(|d| match d {
                NaxmlDocument::DepartmentMaint(m) => Ok(m),
                _ => Err(NaxmlError::UnsupportedDocumentType(
                    "expected department maintenance document".to_string(),
                )),
            }) {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let existing: HashMap<String, naxml_model::entities::Department> = match self.departments.find_all(store_id).await {
                Ok(rows) => rows.into_iter().map(|d| (d.pos_code.clone(), d)).collect(),
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let doc = match vendor::resolve(integration.pos_type).sync_departments(doc).await {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };
            let projected = project_departments(&doc, store_id, company_id, pos_source, &existing, Utc::now());
            let created = projected.upserts.iter().filter(|d| !existing.contains_key(&d.pos_code)).count() as u32;
            let updated = projected.upserts.len() as u32 - created;
            let deactivated = projected.deactivate.len() as u32;

            if !projected.upserts.is_empty() {
                if let Err(e) = self.departments.upsert_many(&projected.upserts).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }
            if !projected.deactivate.is_empty() {
                if let Err(e) = self.departments.deactivate_many(store_id, &projected.deactivate).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }

            result.created += created;
            result.updated += updated;
            result.deactivated += deactivated;
            self.record_cycle_success(
                store_id,
                &path,
                &hash,
                DocumentKind::DepartmentMaintenance,
                (created + updated + deactivated) as i32,
            )
            .await;
        }
        result
    }

    async fn sync_tender_category(&self, integration: &POSIntegration, outbox: &Path) -> CategorySyncResult {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);
        let mut result = CategorySyncResult {
            category: "tender_types".to_string(),
            ..Default::default()
        };

        for (path, bytes, hash) in self.unprocessed_files(store_id, outbox, DocumentKind::TenderMaintenance).await {
            result.received += 1;
            let doc = match crate::parser::parse(&bytes).and_then(|d| match d {
                NaxmlDocument::TenderMaint(m) => Ok(m),
                _ => Err(NaxmlError::UnsupportedDocumentType(
                    "expected tender maintenance document".to_string(),
                )),
            }) {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let existing: HashMap<String, naxml_model::entities::TenderType> = match self.tender_types.find_all(store_id).await {
                Ok(rows) => rows.into_iter().map(|t| (t.pos_code.clone(), t)).collect(),
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let doc = match vendor::resolve(integration.pos_type).sync_tender_types(doc).await {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };
            let projected = project_tender_types(&doc, store_id, company_id, pos_source, &existing, Utc::now());
            let created = projected.upserts.iter().filter(|t| !existing.contains_key(&t.pos_code)).count() as u32;
            let updated = projected.upserts.len() as u32 - created;
            let deactivated = projected.deactivate.len() as u32;

            if !projected.upserts.is_empty() {
                if let Err(e) = self.tender_types.upsert_many(&projected.upserts).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }
            if !projected.deactivate.is_empty() {
                if let Err(e) = self.tender_types.deactivate_many(store_id, &projected.deactivate).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }

            result.created += created;
            result.updated += updated;
            result.deactivated += deactivated;
            self.record_cycle_success(
                store_id,
                &path,
                &hash,
                DocumentKind::TenderMaintenance,
                (created + updated + deactivated) as i32,
            )
            .await;
        }
        result
    }

    async fn sync_tax_rate_category(&self, integration: &POSIntegration, outbox: &Path) -> CategorySyncResult {
        let store_id = integration.store_id;
        let company_id = integration.company_id;
        let pos_source = pos_source_for(integration);
        let mut result = CategorySyncResult {
            category: "tax_rates".to_string(),
            ..Default::default()
        };

        for (path, bytes, hash) in self.unprocessed_files(store_id, outbox, DocumentKind::TaxRateMaintenance).await {
            result.received += 1;
            let doc = match crate::parser::parse(&bytes).and_then(|d| match d {
                NaxmlDocument::TaxRateMaint(m) => Ok(m),
                _ => Err(NaxmlError::UnsupportedDocumentType(
                    "expected tax rate maintenance document".to_string(),
                )),
            }) {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let existing: HashMap<String, naxml_model::entities::TaxRate> = match self.tax_rates.find_all(store_id).await {
                Ok(rows) => rows.into_iter().map(|t| (t.pos_code.clone(), t)).collect(),
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            let doc = match vendor::resolve(integration.pos_type).sync_tax_rates(doc).await {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };
            let projected = project_tax_rates(&doc, store_id, company_id, pos_source, &existing, Utc::now());
            let created = projected.upserts.iter().filter(|t| !existing.contains_key(&t.pos_code)).count() as u32;
            let updated = projected.upserts.len() as u32 - created;
            let deactivated = projected.deactivate.len() as u32;

            if !projected.upserts.is_empty() {
                if let Err(e) = self.tax_rates.upsert_many(&projected.upserts).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }
            if !projected.deactivate.is_empty() {
                if let Err(e) = self.tax_rates.deactivate_many(store_id, &projected.deactivate).await {
                    result.errors.push(format!("{}: {e}", path.display()));
                    continue;
                }
            }

            result.created += created;
            result.updated += updated;
            result.deactivated += deactivated;
            self.record_cycle_success(
                store_id,
                &path,
                &hash,
                DocumentKind::TaxRateMaintenance,
                (created + updated + deactivated) as i32,
            )
            .await;
        }
        result
    }

    /// Employee maintenance is accepted but not projected anywhere in this
    /// crate (see `process`'s catch-all arm); the cycle still reports every
    /// file it saw so the count isn't silently dropped from the sync log.
    async fn sync_cashiers_category(&self, integration: &POSIntegration, outbox: &Path) -> CategorySyncResult {
        let store_id = integration.store_id;
        let mut result = CategorySyncResult {
            category: "cashiers".to_string(),
            ..Default::default()
        };

        for (path, _bytes, hash) in self.unprocessed_files(store_id, outbox, DocumentKind::EmployeeMaintenance).await {
            result.received += 1;
            self.record_cycle_success(store_id, &path, &hash, DocumentKind::EmployeeMaintenance, 0)
                .await;
        }
        result
    }

    async fn sync_fold_category(
        &self,
        integration: &POSIntegration,
        outbox: &Path,
        category: &str,
        kind: DocumentKind,
    ) -> CategorySyncResult {
        let store_id = integration.store_id;
        let mut result = CategorySyncResult {
            category: category.to_string(),
            ..Default::default()
        };

        for (path, bytes, hash) in self.unprocessed_files(store_id, outbox, kind).await {
            result.received += 1;
            match self.process(integration, kind, &bytes, &hash).await {
                Ok(count) => result.created += count as u32,
                Err(e) => result.errors.push(format!("{}: {e}", path.display())),
            }
        }
        result
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

/// Progress snapshot for a single integration's one-time backfill pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportProgress {
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: usize,
}

/// Runs a full backfill over an integration's outbox before its `FileWatcher`
/// starts incremental polling. The progress map is the only mutable state
/// here and is written exclusively by the worker running that integration's
/// pass.
pub struct InitialImportService {
    processor: Arc<MovementReportProcessor>,
    progress: Mutex<HashMap<IntegrationId, ImportProgress>>,
}

impl InitialImportService {
    pub fn new(processor: Arc<MovementReportProcessor>) -> Self {
        Self {
            processor,
            progress: Mutex::new(HashMap::new()),
        }
    }

    pub async fn progress_for(&self, integration_id: IntegrationId) -> Option<ImportProgress> {
        self.progress.lock().await.get(&integration_id).copied()
    }

    /// Processes every currently-present file in the integration's outbox,
    /// independent of the regular poll cadence. Files are still ordered
    /// lexicographically and go through the same classify/hash/dispatch
    /// path as a normal poll.
    pub async fn run(&self, integration: &POSIntegration) -> Result<ImportProgress> {
        let outbox = Path::new(&integration.export_path);
        let mut files: Vec<_> = std::fs::read_dir(outbox)
            .map_err(|e| NaxmlError::DirectoryNotFound(format!("{}: {e}", outbox.display())))?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut snapshot = ImportProgress {
            total_files: files.len(),
            ..Default::default()
        };
        self.progress.lock().await.insert(integration.id, snapshot);

        for path in files {
            let filename = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(_) => {
                    snapshot.failed_files += 1;
                    continue;
                }
            };

            let hash = {
                use sha2::{Digest, Sha256};
                let mut hasher = Sha256::new();
                hasher.update(&bytes);
                hasher.finalize().iter().map(|b| format!("{b:02x}")).collect::<String>()
            };

            let file_logs = &self.processor.file_logs;

            // Same at-most-once gate the watcher applies before it ever
            // creates a new row: a hit here means this content already
            // succeeded (or partially succeeded) under some filename, so an
            // interrupted/restarted backfill doesn't re-project it.
            match file_logs.find_by_hash(integration.store_id, &hash).await {
                Ok(Some(existing))
                    if matches!(existing.status, FileStatus::Success | FileStatus::Partial) =>
                {
                    snapshot.processed_files += 1;
                    self.progress.lock().await.insert(integration.id, snapshot);
                    continue;
                }
                Ok(_) => {}
                Err(_) => {
                    snapshot.failed_files += 1;
                    self.progress.lock().await.insert(integration.id, snapshot);
                    continue;
                }
            }

            let kind = crate::classify::classify_filename(&filename);
            let log_id = FileLogId::new();
            let now = Utc::now();
            let pending = FileLog {
                id: log_id,
                store_id: integration.store_id,
                file_hash: hash.clone(),
                file_name: filename.clone(),
                file_type: kind.map(|k| k.to_string()).unwrap_or_else(|| "UNKNOWN".to_string()),
                direction: FileDirection::Inbound,
                status: FileStatus::Pending,
                size: bytes.len() as i64,
                processing_ms: None,
                record_count: None,
                error_code: None,
                error_message: None,
                source_path: Some(path.to_string_lossy().to_string()),
                processed_path: None,
                created_at: now,
                processed_at: None,
            };
            if file_logs.create(&pending).await.is_err() {
                snapshot.failed_files += 1;
                self.progress.lock().await.insert(integration.id, snapshot);
                continue;
            }

            let outcome = match kind {
                Some(kind) => self.processor.process(integration, kind, &bytes, &hash).await,
                None => Err(NaxmlError::UnsupportedDocumentType(filename.clone())),
            };

            match outcome {
                Ok(count) => {
                    snapshot.processed_files += 1;
                    let _ = file_logs
                        .update_status(
                            log_id,
                            FileStatus::Success,
                            None,
                            Some(count as i32),
                            None,
                            None,
                            None,
                            Some(Utc::now()),
                        )
                        .await;
                }
                Err(e) => {
                    snapshot.failed_files += 1;
                    let _ = file_logs
                        .update_status(
                            log_id,
                            FileStatus::Failed,
                            None,
                            None,
                            Some(e.as_code().to_string()),
                            Some(e.to_string()),
                            None,
                            Some(Utc::now()),
                        )
                        .await;
                }
            }

            self.progress.lock().await.insert(integration.id, snapshot);
        }

        info!(
            integration_id = %integration.id,
            processed = snapshot.processed_files,
            failed = snapshot.failed_files,
            "initial import pass complete"
        );

        Ok(snapshot)
    }
}
