//! FileWatcher: one cooperative polling loop per active store.
//!
//! An `Arc`-shared worker driven by a control channel, `tracing` at each
//! disposition, and a fixed poll interval rather than filesystem-event
//! notification — the outbox directories this watches live on network
//! shares where inotify-style events aren't reliably delivered.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use naxml_model::file_log::{FileDirection, FileLog, FileStatus};
use naxml_model::ids::{FileLogId, StoreId};
use naxml_model::pos_integration::POSIntegration;
use naxml_model::sync::{Direction, ExchangeType};
use naxml_model::{NaxmlError, Result};

use crate::audit::{AuditRecorder, NewAuditRecord};
use crate::classify::{classify_filename, resolve_within};
use crate::database::ports::FileLogRepository;
use crate::service::MovementReportProcessor;

/// Cooperative control messages from the Scheduler.
#[derive(Debug, Clone, Copy)]
pub enum WatcherCommand {
    Stop,
    UpdatePollInterval(i32),
}

/// Runs the poll loop for a single store's file exchange directory until it
/// receives `WatcherCommand::Stop`.
pub struct FileWatcher {
    integration: POSIntegration,
    file_logs: Arc<dyn FileLogRepository>,
    audit: AuditRecorder,
    processor: Arc<MovementReportProcessor>,
}

impl FileWatcher {
    pub fn new(
        integration: POSIntegration,
        file_logs: Arc<dyn FileLogRepository>,
        audit: AuditRecorder,
        processor: Arc<MovementReportProcessor>,
    ) -> Self {
        Self {
            integration,
            file_logs,
            audit,
            processor,
        }
    }

    pub fn store_id(&self) -> StoreId {
        self.integration.store_id
    }

    /// Runs until `commands` yields `Stop` or is dropped. Poll interval can
    /// be updated mid-run; an in-flight file always runs to completion or
    /// explicit failure before the loop checks for a stop.
    pub async fn run(mut self, mut commands: mpsc::Receiver<WatcherCommand>) {
        let mut interval_secs = self.integration.effective_poll_interval();

        loop {
            match self.poll_once().await {
                Ok(processed) if processed > 0 => {
                    info!(
                        store_id = %self.integration.store_id,
                        processed,
                        "polling iteration processed files"
                    );
                }
                Ok(_) => {}
                Err(e) => error!(
                    store_id = %self.integration.store_id,
                    error = %e,
                    "polling iteration failed"
                ),
            }

            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(WatcherCommand::Stop) | None => {
                            info!(store_id = %self.integration.store_id, "file watcher stopping");
                            return;
                        }
                        Some(WatcherCommand::UpdatePollInterval(secs)) => {
                            interval_secs = naxml_model::pos_integration::clamp_poll_interval(secs);
                        }
                    }
                }
                _ = tokio::time::sleep(Duration::from_secs(interval_secs as u64)) => {}
            }
        }
    }

    /// One discovery + ownership + processing pass over the outbox
    /// directory. Returns the number of files handled (including skips).
    pub async fn poll_once(&self) -> Result<usize> {
        let outbox = Path::new(&self.integration.export_path);
        let mut entries = list_candidate_files(outbox)?;
        // Lexicographic filename order.
        entries.sort();

        let mut processed = 0;
        for path in entries {
            self.handle_file(outbox, &path).await;
            processed += 1;
        }
        Ok(processed)
    }

    async fn handle_file(&self, outbox: &Path, path: &PathBuf) {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => return,
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) => {
                error!(file = %filename, error = %e, "failed to read candidate file");
                return;
            }
        };

        let file_hash = hex_sha256(&bytes);
        let store_id = self.integration.store_id;

        let kind = classify_filename(&filename);

        match self.file_logs.find_by_hash(store_id, &file_hash).await {
            Ok(Some(_existing)) => {
                // Already seen: SKIP(DUPLICATE). Still archived, no new
                // audit record, but a FileLog row for this filename so the
                // duplicate shows up in file history.
                self.record_duplicate(store_id, &filename, &file_hash, kind, bytes.len() as i64, path)
                    .await;
                self.disposition_duplicate(outbox, path, &filename, &file_hash).await;
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!(file = %filename, error = %e, "file log lookup failed");
                return;
            }
        }

        let started = std::time::Instant::now();
        let now = Utc::now();

        let log_id = FileLogId::new();
        let pending = FileLog {
            id: log_id,
            store_id,
            file_hash: file_hash.clone(),
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

        if let Err(e) = self.file_logs.create(&pending).await {
            error!(file = %filename, error = %e, "failed to create file log row");
            return;
        }

        let audit_record = match self
            .audit
            .open(NewAuditRecord {
                exchange_id: filename.clone(),
                store_id,
                exchange_type: ExchangeType::FileImport,
                direction: Direction::Inbound,
                data_category: kind.map(|k| k.to_string()).unwrap_or_else(|| "UNKNOWN".to_string()),
                source_system: Some(self.integration.pos_type.to_string()),
                destination_system: None,
                contains_pii: false,
                contains_financial: true,
                file_hash: Some(file_hash.clone()),
                retention_policy: "default".to_string(),
            })
            .await
        {
            Ok(r) => r,
            Err(e) => {
                // Audit-record creation failing means we must not touch
                // projected tables. Leave the file in place for
                // the next poll to retry.
                error!(file = %filename, error = %e, "audit record creation failed, deferring");
                let _ = self
                    .file_logs
                    .update_status(
                        log_id,
                        FileStatus::Failed,
                        None,
                        None,
                        Some(NaxmlError::AuditCreationFailed(e.to_string()).as_code().to_string()),
                        Some(e.to_string()),
                        None,
                        Some(Utc::now()),
                    )
                    .await;
                return;
            }
        };

        let _ = self.audit.mark_processing(&audit_record).await;

        match kind {
            None => {
                let err = NaxmlError::UnsupportedDocumentType(filename.clone());
                self.fail(outbox, path, &filename, log_id, &audit_record, &err, started)
                    .await;
                return;
            }
            Some(kind) => {
                match self
                    .processor
                    .process(&self.integration, kind, &bytes, &file_hash)
                    .await
                {
                    Ok(record_count) => {
                        let elapsed_ms = started.elapsed().as_millis() as i64;
                        let _ = self
                            .file_logs
                            .update_status(
                                log_id,
                                FileStatus::Success,
                                Some(elapsed_ms),
                                Some(record_count as i32),
                                None,
                                None,
                                None,
                                Some(Utc::now()),
                            )
                            .await;
                        let _ = self
                            .audit
                            .mark_success(&audit_record, record_count as i32, bytes.len() as i64)
                            .await;
                        self.disposition_success(outbox, path, &filename).await;
                    }
                    Err(e) => {
                        self.fail(outbox, path, &filename, log_id, &audit_record, &e, started)
                            .await;
                    }
                }
            }
        }
    }

    async fn fail(
        &self,
        outbox: &Path,
        path: &Path,
        filename: &str,
        log_id: FileLogId,
        audit_record: &naxml_model::sync::AuditRecord,
        err: &NaxmlError,
        started: std::time::Instant,
    ) {
        warn!(file = %filename, error = %err, "processing failed, routing to error directory");
        let elapsed_ms = started.elapsed().as_millis() as i64;
        let _ = self
            .file_logs
            .update_status(
                log_id,
                FileStatus::Failed,
                Some(elapsed_ms),
                None,
                Some(err.as_code().to_string()),
                Some(err.to_string()),
                None,
                Some(Utc::now()),
            )
            .await;
        let _ = self.audit.mark_failed(audit_record).await;
        self.disposition_error(outbox, path, filename).await;
    }

    async fn disposition_success(&self, outbox: &Path, path: &Path, filename: &str) {
        if !self.integration.archive_processed_files {
            return;
        }
        let archive_rel = self
            .integration
            .archive_path
            .clone()
            .unwrap_or_else(|| "Processed".to_string());
        self.move_with_prefix(outbox, path, &archive_rel, filename, "").await;
    }

    async fn disposition_error(&self, outbox: &Path, path: &Path, filename: &str) {
        let error_rel = self
            .integration
            .error_path
            .clone()
            .unwrap_or_else(|| "Error".to_string());
        self.move_with_prefix(outbox, path, &error_rel, filename, "ERROR_").await;
    }

    /// Records a `FileLog` row for a duplicate-content hit: same
    /// `(store_id, file_hash)` seen under a new filename, so no audit
    /// record or processing happens, but the new filename still needs a
    /// row of its own — `status=SKIPPED`, `error_code=DUPLICATE`.
    async fn record_duplicate(
        &self,
        store_id: StoreId,
        filename: &str,
        file_hash: &str,
        kind: Option<naxml_model::document::DocumentKind>,
        size: i64,
        path: &Path,
    ) {
        let now = Utc::now();
        let log = FileLog {
            id: FileLogId::new(),
            store_id,
            file_hash: file_hash.to_string(),
            file_name: filename.to_string(),
            file_type: kind.map(|k| k.to_string()).unwrap_or_else(|| "UNKNOWN".to_string()),
            direction: FileDirection::Inbound,
            status: FileStatus::Skipped,
            size,
            processing_ms: Some(0),
            record_count: None,
            error_code: Some("DUPLICATE".to_string()),
            error_message: Some("duplicate file content, already processed under another filename".to_string()),
            source_path: Some(path.to_string_lossy().to_string()),
            processed_path: None,
            created_at: now,
            processed_at: Some(now),
        };
        if let Err(e) = self.file_logs.create(&log).await {
            error!(file = %filename, error = %e, "failed to create file log row for duplicate");
        }
    }

    async fn disposition_duplicate(&self, outbox: &Path, path: &Path, filename: &str, _hash: &str) {
        if !self.integration.archive_processed_files {
            return;
        }
        let archive_rel = self
            .integration
            .archive_path
            .clone()
            .unwrap_or_else(|| "Processed".to_string());
        self.move_with_prefix(outbox, path, &archive_rel, filename, "").await;
    }

    async fn move_with_prefix(
        &self,
        outbox: &Path,
        source: &Path,
        dest_rel: &str,
        filename: &str,
        infix: &str,
    ) {
        let ts = Utc::now().format("%Y%m%dT%H%M%S");
        let dest_name = format!("{ts}_{infix}{filename}");
        let dest_dir = match resolve_within(outbox, Path::new(dest_rel)) {
            Ok(d) => d,
            Err(e) => {
                error!(error = %e, "refusing disposition move outside exchange root");
                return;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&dest_dir).await {
            error!(error = %e, "failed to create disposition directory");
            return;
        }

        let dest_path = dest_dir.join(dest_name);
        if let Err(e) = move_file(source, &dest_path).await {
            error!(error = %e, "failed to move file to final disposition");
        }
    }
}

/// Atomic rename first; on cross-device error, copy-then-unlink.
async fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(source, dest).await {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(EXDEV) => {
            tokio::fs::copy(source, dest).await?;
            tokio::fs::remove_file(source).await
        }
        Err(e) => Err(e),
    }
}

/// `EXDEV` ("cross-device link") — the errno `rename(2)` returns when source
/// and destination are on different filesystems.
const EXDEV: i32 = 18;

fn list_candidate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NaxmlError::DirectoryNotFound(dir.to_string_lossy().to_string()));
        }
        Err(e) => return Err(NaxmlError::Io(e)),
    };

    let mut files = Vec::new();
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
