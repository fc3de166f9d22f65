//! Process entrypoint: load config, connect to Postgres, run migrations,
//! wire the repositories into a `MovementReportProcessor`, and run the
//! `Scheduler` until a shutdown signal arrives.

mod scheduler;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use naxml_config::Config;
use naxml_core::audit::AuditRecorder;
use naxml_core::database::postgres::{
    PostgresAuditRecordRepository, PostgresDaySummaryRepository, PostgresDepartmentRepository,
    PostgresFileLogRepository, PostgresFuelGradeRepository, PostgresFuelPositionRepository,
    PostgresFuelSummaryRepository, PostgresIntegrationRepository, PostgresShiftRepository,
    PostgresSyncLogRepository, PostgresTaxRateRepository, PostgresTenderTypeRepository,
    PostgresTransactionRepository, PostgresUserRepository,
};
use naxml_core::database::{pool, ports::IntegrationRepository};
use naxml_core::service::{InitialImportService, MovementReportProcessor};
use naxml_model::ids::StoreId;

use scheduler::Scheduler;

/// Command line arguments for the NAXML ingestion server.
#[derive(Parser, Debug)]
#[command(name = "naxml-server")]
#[command(about = "NAXML movement report ingestion for the POS back-office platform")]
struct Args {
    /// Run a one-time backfill pass over a single store's outbox directory,
    /// then exit, instead of starting the scheduler loop.
    #[arg(long, value_name = "STORE_ID")]
    initial_import: Option<Uuid>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting naxml-server");

    let db_pool = pool::connect(&config.database_url).await?;
    pool::run_migrations(&db_pool).await?;
    info!("database ready");

    let file_logs = Arc::new(PostgresFileLogRepository::new(db_pool.clone()));
    let sync_logs = Arc::new(PostgresSyncLogRepository::new(db_pool.clone()));
    let audit = AuditRecorder::new(
        Arc::new(PostgresAuditRecordRepository::new(db_pool.clone())),
        config.audit_retention_days,
    );
    let integrations: Arc<dyn IntegrationRepository> =
        Arc::new(PostgresIntegrationRepository::new(db_pool.clone()));

    let processor = Arc::new(MovementReportProcessor {
        file_logs: file_logs.clone(),
        departments: Arc::new(PostgresDepartmentRepository::new(db_pool.clone())),
        tender_types: Arc::new(PostgresTenderTypeRepository::new(db_pool.clone())),
        tax_rates: Arc::new(PostgresTaxRateRepository::new(db_pool.clone())),
        fuel_grades: Arc::new(PostgresFuelGradeRepository::new(db_pool.clone())),
        fuel_positions: Arc::new(PostgresFuelPositionRepository::new(db_pool.clone())),
        fuel_summaries: Arc::new(PostgresFuelSummaryRepository::new(db_pool.clone())),
        day_summaries: Arc::new(PostgresDaySummaryRepository::new(db_pool.clone())),
        transactions: Arc::new(PostgresTransactionRepository::new(db_pool.clone())),
        shifts: Arc::new(PostgresShiftRepository::new(db_pool.clone())),
        users: Arc::new(PostgresUserRepository::new(db_pool.clone())),
        audit: audit.clone(),
    });

    if let Some(store_id) = args.initial_import {
        return run_initial_import(integrations, processor, StoreId::from(store_id)).await;
    }

    let scheduler = Scheduler::new(integrations, file_logs, sync_logs, audit, processor);

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "failed to install signal handler");
        }
        let _ = shutdown_tx.send(()).await;
    });

    scheduler.run(config.scheduler_tick, shutdown_rx).await;

    info!("naxml-server stopped");
    Ok(())
}

/// One-shot backfill over a single store's outbox, independent of the
/// scheduler's regular poll cadence.
async fn run_initial_import(
    integrations: Arc<dyn IntegrationRepository>,
    processor: Arc<MovementReportProcessor>,
    store_id: StoreId,
) -> anyhow::Result<()> {
    let integration = integrations
        .find_by_store(store_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no POS integration configured for store {store_id}"))?;

    let import = InitialImportService::new(processor);
    let progress = import.run(&integration).await?;

    info!(
        %store_id,
        total_files = progress.total_files,
        processed_files = progress.processed_files,
        failed_files = progress.failed_files,
        "initial import complete"
    );
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
