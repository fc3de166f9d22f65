use async_trait::async_trait;
use sqlx::PgPool;

use naxml_model::ids::{IntegrationId, StoreId};
use naxml_model::pos_integration::POSIntegration;
use naxml_model::vendor::{ConnectionMode, PosType};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::IntegrationRepository;

#[derive(sqlx::FromRow)]
struct IntegrationRow {
    id: uuid::Uuid,
    company_id: uuid::Uuid,
    store_id: uuid::Uuid,
    pos_type: PosType,
    connection_mode: ConnectionMode,
    export_path: String,
    import_path: String,
    archive_path: Option<String>,
    error_path: Option<String>,
    encrypted_credentials: Option<Vec<u8>>,
    naxml_version: Option<String>,
    generate_acknowledgments: bool,
    store_location_id: Option<String>,
    archive_processed_files: bool,
    sync_enabled: bool,
    sync_interval_mins: i32,
    sync_departments: bool,
    sync_tender_types: bool,
    sync_cashiers: bool,
    sync_tax_rates: bool,
    poll_interval_seconds: i32,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<IntegrationRow> for POSIntegration {
    fn from(r: IntegrationRow) -> Self {
        POSIntegration {
            id: IntegrationId(r.id),
            company_id: naxml_model::ids::CompanyId(r.company_id),
            store_id: StoreId(r.store_id),
            pos_type: r.pos_type,
            connection_mode: r.connection_mode,
            export_path: r.export_path,
            import_path: r.import_path,
            archive_path: r.archive_path,
            error_path: r.error_path,
            encrypted_credentials: r.encrypted_credentials,
            naxml_version: r.naxml_version,
            generate_acknowledgments: r.generate_acknowledgments,
            store_location_id: r.store_location_id,
            archive_processed_files: r.archive_processed_files,
            sync_enabled: r.sync_enabled,
            sync_interval_mins: r.sync_interval_mins,
            sync_departments: r.sync_departments,
            sync_tender_types: r.sync_tender_types,
            sync_cashiers: r.sync_cashiers,
            sync_tax_rates: r.sync_tax_rates,
            poll_interval_seconds: r.poll_interval_seconds,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresIntegrationRepository {
    pool: PgPool,
}

impl PostgresIntegrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, company_id, store_id, pos_type, connection_mode, export_path, import_path,
    archive_path, error_path, encrypted_credentials, naxml_version,
    generate_acknowledgments, store_location_id, archive_processed_files,
    sync_enabled, sync_interval_mins, sync_departments, sync_tender_types,
    sync_cashiers, sync_tax_rates, poll_interval_seconds, is_active, created_at, updated_at
"#;

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRepository {
    async fn list_watchable(&self) -> Result<Vec<POSIntegration>> {
        let sql = format!(
            "select {SELECT_COLUMNS} from naxml.pos_integration where is_active and sync_enabled"
        );
        let rows: Vec<IntegrationRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(POSIntegration::from).collect())
    }

    async fn find_by_store(&self, store_id: StoreId) -> Result<Option<POSIntegration>> {
        let sql = format!("select {SELECT_COLUMNS} from naxml.pos_integration where store_id = $1");
        let row: Option<IntegrationRow> = sqlx::query_as(&sql)
            .bind(store_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(POSIntegration::from))
    }

    async fn update_poll_interval(&self, id: IntegrationId, seconds: i32) -> Result<()> {
        sqlx::query(
            "update naxml.pos_integration set poll_interval_seconds = $2, updated_at = now() where id = $1",
        )
        .bind(id.as_uuid())
        .bind(seconds)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}
