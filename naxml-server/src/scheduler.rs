//! Scheduler: owns one `FileWatcher` task per active, sync-enabled store
//!, reconciling its running set against `IntegrationRepository`
//! on a fixed tick and forwarding control commands to each watcher's own
//! channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use naxml_core::audit::AuditRecorder;
use naxml_core::database::ports::{FileLogRepository, IntegrationRepository, SyncLogRepository};
use naxml_core::service::MovementReportProcessor;
use naxml_core::watcher::{FileWatcher, WatcherCommand};
use naxml_model::ids::StoreId;

const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

struct RunningWatcher {
    handle: JoinHandle<()>,
    commands: mpsc::Sender<WatcherCommand>,
}

/// Reconciles the set of running `FileWatcher` tasks against the
/// `pos_integration` table and runs until told to stop.
pub struct Scheduler {
    integrations: Arc<dyn IntegrationRepository>,
    file_logs: Arc<dyn FileLogRepository>,
    sync_logs: Arc<dyn SyncLogRepository>,
    audit: AuditRecorder,
    processor: Arc<MovementReportProcessor>,
    running: HashMap<StoreId, RunningWatcher>,
    next_sync_due: HashMap<StoreId, DateTime<Utc>>,
}

impl Scheduler {
    pub fn new(
        integrations: Arc<dyn IntegrationRepository>,
        file_logs: Arc<dyn FileLogRepository>,
        sync_logs: Arc<dyn SyncLogRepository>,
        audit: AuditRecorder,
        processor: Arc<MovementReportProcessor>,
    ) -> Self {
        Self {
            integrations,
            file_logs,
            sync_logs,
            audit,
            processor,
            running: HashMap::new(),
            next_sync_due: HashMap::new(),
        }
    }

    /// Reconciles and ticks on `tick_interval` until `shutdown` fires, then
    /// stops every running watcher and waits for them to exit. A second,
    /// much coarser tick sweeps expired audit records so
    /// retention cleanup doesn't compete with the reconcile cadence.
    pub async fn run(mut self, tick_interval: Duration, mut shutdown: mpsc::Receiver<()>) {
        let mut ticker = tokio::time::interval(tick_interval);
        let mut retention_ticker = tokio::time::interval(RETENTION_SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.reconcile().await {
                        error!(error = %e, "scheduler reconcile failed");
                    }
                }
                _ = retention_ticker.tick() => {
                    match self.audit.sweep_expired(chrono::Utc::now()).await {
                        Ok(swept) => info!(swept, "audit retention sweep complete"),
                        Err(e) => error!(error = %e, "audit retention sweep failed"),
                    }
                }
                _ = shutdown.recv() => {
                    info!("scheduler shutting down");
                    break;
                }
            }
        }

        self.stop_all().await;
    }

    /// Spawns a watcher for every newly watchable integration, stops any
    /// watcher whose integration is no longer watchable, and runs a sync
    /// cycle for every integration whose `sync_interval_mins` has elapsed
    /// since its last one.
    async fn reconcile(&mut self) -> naxml_model::Result<()> {
        let integrations = self.integrations.list_watchable().await?;
        let mut seen = std::collections::HashSet::new();

        for integration in &integrations {
            seen.insert(integration.store_id);
            if !self.running.contains_key(&integration.store_id) {
                let (tx, rx) = mpsc::channel(8);
                let watcher = FileWatcher::new(
                    integration.clone(),
                    self.file_logs.clone(),
                    self.audit.clone(),
                    self.processor.clone(),
                );
                let store_id = integration.store_id;
                let handle = tokio::spawn(watcher.run(rx));
                self.running.insert(store_id, RunningWatcher { handle, commands: tx });
                info!(%store_id, "started file watcher");
            }

            self.maybe_run_sync(integration).await;
        }

        let stale: Vec<StoreId> = self
            .running
            .keys()
            .filter(|id| !seen.contains(id))
            .copied()
            .collect();
        for store_id in stale {
            self.stop_one(store_id).await;
            self.next_sync_due.remove(&store_id);
        }

        Ok(())
    }

    /// Runs `integration`'s sync cycle if its `sync_interval_mins` has
    /// elapsed since the last one completed. A never-synced integration is
    /// due immediately, so the first reconcile tick after startup always
    /// runs one cycle per watchable integration.
    async fn maybe_run_sync(&mut self, integration: &naxml_model::pos_integration::POSIntegration) {
        let store_id = integration.store_id;
        let now = Utc::now();
        if let Some(due) = self.next_sync_due.get(&store_id) {
            if now < *due {
                return;
            }
        }

        let log = self.processor.run_sync_cycle(integration).await;
        self.next_sync_due
            .insert(store_id, log.next_sync_at(integration.sync_interval_mins));

        info!(
            %store_id,
            outcome = ?log.outcome,
            categories = log.categories.len(),
            "sync cycle complete"
        );
        if let Err(e) = self.sync_logs.record(&log).await {
            error!(%store_id, error = %e, "failed to persist sync log");
        }
    }

    async fn stop_one(&mut self, store_id: StoreId) {
        if let Some(running) = self.running.remove(&store_id) {
            let _ = running.commands.send(WatcherCommand::Stop).await;
            if running.handle.await.is_err() {
                warn!(%store_id, "file watcher task panicked during stop");
            }
            info!(%store_id, "stopped file watcher");
        }
    }

    async fn stop_all(&mut self) {
        let store_ids: Vec<StoreId> = self.running.keys().copied().collect();
        for store_id in store_ids {
            self.stop_one(store_id).await;
        }
    }
}
