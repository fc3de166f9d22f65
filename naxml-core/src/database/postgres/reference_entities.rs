use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use naxml_model::entities::{Department, TaxRate, TenderType};
use naxml_model::fuel::{FuelGrade, FuelPosition, FuelProductType};
use naxml_model::ids::{CompanyId, StoreId};
use naxml_model::vendor::PosSource;
use naxml_model::{NaxmlError, Result};

use crate::database::ports::{
    DepartmentRepository, FuelGradeRepository, FuelPositionRepository, TaxRateRepository,
    TenderTypeRepository,
};

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    store_id: uuid::Uuid,
    company_id: uuid::Uuid,
    code: String,
    pos_code: String,
    name: String,
    is_taxable: bool,
    is_active: bool,
    pos_source: PosSource,
    last_synced_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(r: DepartmentRow) -> Self {
        Department {
            store_id: StoreId(r.store_id),
            company_id: CompanyId(r.company_id),
            code: r.code,
            pos_code: r.pos_code,
            name: r.name,
            is_taxable: r.is_taxable,
            is_active: r.is_active,
            pos_source: r.pos_source,
            last_synced_at: r.last_synced_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<Department>> {
        let rows: Vec<DepartmentRow> = sqlx::query_as(
            r#"select store_id, company_id, code, pos_code, name, is_taxable, is_active,
                      pos_source, last_synced_at, created_at, updated_at
               from naxml.department where store_id = $1"#,
        )
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn upsert_many(&self, rows: &[Department]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for d in rows {
            sqlx::query(
                r#"
                insert into naxml.department
                    (store_id, company_id, code, pos_code, name, is_taxable, is_active,
                     pos_source, last_synced_at, created_at, updated_at)
                values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                on conflict (store_id, pos_code) do update set
                    name = excluded.name,
                    is_taxable = excluded.is_taxable,
                    is_active = excluded.is_active,
                    last_synced_at = excluded.last_synced_at,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(d.store_id.as_uuid())
            .bind(d.company_id.as_uuid())
            .bind(&d.code)
            .bind(&d.pos_code)
            .bind(&d.name)
            .bind(d.is_taxable)
            .bind(d.is_active)
            .bind(d.pos_source)
            .bind(d.last_synced_at)
            .bind(d.created_at)
            .bind(d.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }

    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()> {
        sqlx::query(
            "update naxml.department set is_active = false, updated_at = now() where store_id = $1 and pos_code = any($2)",
        )
        .bind(store_id.as_uuid())
        .bind(pos_codes)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TenderTypeRow {
    store_id: uuid::Uuid,
    company_id: uuid::Uuid,
    code: String,
    pos_code: String,
    name: String,
    is_electronic: bool,
    is_active: bool,
    pos_source: PosSource,
    last_synced_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TenderTypeRow> for TenderType {
    fn from(r: TenderTypeRow) -> Self {
        TenderType {
            store_id: StoreId(r.store_id),
            company_id: CompanyId(r.company_id),
            code: r.code,
            pos_code: r.pos_code,
            name: r.name,
            is_electronic: r.is_electronic,
            is_active: r.is_active,
            pos_source: r.pos_source,
            last_synced_at: r.last_synced_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresTenderTypeRepository {
    pool: PgPool,
}

impl PostgresTenderTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenderTypeRepository for PostgresTenderTypeRepository {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<TenderType>> {
        let rows: Vec<TenderTypeRow> = sqlx::query_as(
            r#"select store_id, company_id, code, pos_code, name, is_electronic, is_active,
                      pos_source, last_synced_at, created_at, updated_at
               from naxml.tender_type where store_id = $1"#,
        )
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(TenderType::from).collect())
    }

    async fn upsert_many(&self, rows: &[TenderType]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for t in rows {
            sqlx::query(
                r#"
                insert into naxml.tender_type
                    (store_id, company_id, code, pos_code, name, is_electronic, is_active,
                     pos_source, last_synced_at, created_at, updated_at)
                values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                on conflict (store_id, pos_code) do update set
                    name = excluded.name,
                    is_electronic = excluded.is_electronic,
                    is_active = excluded.is_active,
                    last_synced_at = excluded.last_synced_at,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(t.store_id.as_uuid())
            .bind(t.company_id.as_uuid())
            .bind(&t.code)
            .bind(&t.pos_code)
            .bind(&t.name)
            .bind(t.is_electronic)
            .bind(t.is_active)
            .bind(t.pos_source)
            .bind(t.last_synced_at)
            .bind(t.created_at)
            .bind(t.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }

    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()> {
        sqlx::query(
            "update naxml.tender_type set is_active = false, updated_at = now() where store_id = $1 and pos_code = any($2)",
        )
        .bind(store_id.as_uuid())
        .bind(pos_codes)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TaxRateRow {
    store_id: uuid::Uuid,
    company_id: uuid::Uuid,
    code: String,
    pos_code: String,
    name: String,
    rate: rust_decimal::Decimal,
    is_active: bool,
    pos_source: PosSource,
    last_synced_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaxRateRow> for TaxRate {
    fn from(r: TaxRateRow) -> Self {
        TaxRate {
            store_id: StoreId(r.store_id),
            company_id: CompanyId(r.company_id),
            code: r.code,
            pos_code: r.pos_code,
            name: r.name,
            rate: r.rate,
            is_active: r.is_active,
            pos_source: r.pos_source,
            last_synced_at: r.last_synced_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresTaxRateRepository {
    pool: PgPool,
}

impl PostgresTaxRateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxRateRepository for PostgresTaxRateRepository {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<TaxRate>> {
        let rows: Vec<TaxRateRow> = sqlx::query_as(
            r#"select store_id, company_id, code, pos_code, name, rate, is_active,
                      pos_source, last_synced_at, created_at, updated_at
               from naxml.tax_rate where store_id = $1"#,
        )
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(TaxRate::from).collect())
    }

    async fn upsert_many(&self, rows: &[TaxRate]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for t in rows {
            sqlx::query(
                r#"
                insert into naxml.tax_rate
                    (store_id, company_id, code, pos_code, name, rate, is_active,
                     pos_source, last_synced_at, created_at, updated_at)
                values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                on conflict (store_id, pos_code) do update set
                    name = excluded.name,
                    rate = excluded.rate,
                    is_active = excluded.is_active,
                    last_synced_at = excluded.last_synced_at,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(t.store_id.as_uuid())
            .bind(t.company_id.as_uuid())
            .bind(&t.code)
            .bind(&t.pos_code)
            .bind(&t.name)
            .bind(t.rate)
            .bind(t.is_active)
            .bind(t.pos_source)
            .bind(t.last_synced_at)
            .bind(t.created_at)
            .bind(t.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }

    async fn deactivate_many(&self, store_id: StoreId, pos_codes: &[String]) -> Result<()> {
        sqlx::query(
            "update naxml.tax_rate set is_active = false, updated_at = now() where store_id = $1 and pos_code = any($2)",
        )
        .bind(store_id.as_uuid())
        .bind(pos_codes)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct FuelGradeRow {
    company_id: uuid::Uuid,
    grade_id: String,
    name: String,
    product_type: FuelProductType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FuelGradeRow> for FuelGrade {
    fn from(r: FuelGradeRow) -> Self {
        FuelGrade {
            company_id: CompanyId(r.company_id),
            grade_id: r.grade_id,
            name: r.name,
            product_type: r.product_type,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresFuelGradeRepository {
    pool: PgPool,
}

impl PostgresFuelGradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FuelGradeRepository for PostgresFuelGradeRepository {
    async fn find_all(&self, company_id: CompanyId) -> Result<Vec<FuelGrade>> {
        let rows: Vec<FuelGradeRow> = sqlx::query_as(
            "select company_id, grade_id, name, product_type, created_at, updated_at from naxml.fuel_grade where company_id = $1",
        )
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(FuelGrade::from).collect())
    }

    async fn upsert_many(&self, rows: &[FuelGrade]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for g in rows {
            sqlx::query(
                r#"
                insert into naxml.fuel_grade (company_id, grade_id, name, product_type, created_at, updated_at)
                values ($1, $2, $3, $4, $5, $6)
                on conflict (company_id, grade_id) do update set
                    name = excluded.name, product_type = excluded.product_type, updated_at = excluded.updated_at
                "#,
            )
            .bind(g.company_id.as_uuid())
            .bind(&g.grade_id)
            .bind(&g.name)
            .bind(g.product_type)
            .bind(g.created_at)
            .bind(g.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct FuelPositionRow {
    store_id: uuid::Uuid,
    position_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FuelPositionRow> for FuelPosition {
    fn from(r: FuelPositionRow) -> Self {
        FuelPosition {
            store_id: StoreId(r.store_id),
            position_id: r.position_id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresFuelPositionRepository {
    pool: PgPool,
}

impl PostgresFuelPositionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FuelPositionRepository for PostgresFuelPositionRepository {
    async fn find_all(&self, store_id: StoreId) -> Result<Vec<FuelPosition>> {
        let rows: Vec<FuelPositionRow> = sqlx::query_as(
            "select store_id, position_id, name, created_at, updated_at from naxml.fuel_position where store_id = $1",
        )
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(FuelPosition::from).collect())
    }

    async fn upsert_many(&self, rows: &[FuelPosition]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for p in rows {
            sqlx::query(
                r#"
                insert into naxml.fuel_position (store_id, position_id, name, created_at, updated_at)
                values ($1, $2, $3, $4, $5)
                on conflict (store_id, position_id) do update set
                    name = excluded.name, updated_at = excluded.updated_at
                "#,
            )
            .bind(p.store_id.as_uuid())
            .bind(&p.position_id)
            .bind(&p.name)
            .bind(p.created_at)
            .bind(p.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }
}
