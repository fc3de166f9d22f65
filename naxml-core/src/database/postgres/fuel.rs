use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use naxml_model::fuel::{DaySummary, ShiftFuelSummary};
use naxml_model::ids::StoreId;
use naxml_model::{NaxmlError, Result};

use crate::database::ports::{DaySummaryRepository, FuelSummaryRepository};

#[derive(Clone)]
pub struct PostgresFuelSummaryRepository {
    pool: PgPool,
}

impl PostgresFuelSummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FuelSummaryRepository for PostgresFuelSummaryRepository {
    async fn upsert_many(&self, rows: &[ShiftFuelSummary]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        for s in rows {
            sqlx::query(
                r#"
                insert into naxml.shift_fuel_summary
                    (shift_summary_id, store_id, fuel_grade_id, tender_type, volume,
                     amount, discounts, source_file_hash, business_date, created_at, updated_at)
                values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                on conflict (shift_summary_id) do update set
                    volume = excluded.volume,
                    amount = excluded.amount,
                    discounts = excluded.discounts,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&s.shift_summary_id)
            .bind(s.store_id.as_uuid())
            .bind(&s.fuel_grade_id)
            .bind(s.tender_type)
            .bind(s.volume)
            .bind(s.amount)
            .bind(s.discounts)
            .bind(&s.source_file_hash)
            .bind(s.business_date)
            .bind(s.created_at)
            .bind(s.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }
        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct DaySummaryRow {
    store_id: uuid::Uuid,
    business_date: NaiveDate,
    fuel_sales: Decimal,
    fuel_gallons: Decimal,
    merchandise_sales: Decimal,
    net_sales: Decimal,
    gross_sales: Decimal,
    tax_total: Decimal,
    transaction_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DaySummaryRow> for DaySummary {
    fn from(r: DaySummaryRow) -> Self {
        DaySummary {
            store_id: StoreId(r.store_id),
            business_date: r.business_date,
            fuel_sales: r.fuel_sales,
            fuel_gallons: r.fuel_gallons,
            merchandise_sales: r.merchandise_sales,
            net_sales: r.net_sales,
            gross_sales: r.gross_sales,
            tax_total: r.tax_total,
            transaction_count: r.transaction_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresDaySummaryRepository {
    pool: PgPool,
}

impl PostgresDaySummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DaySummaryRepository for PostgresDaySummaryRepository {
    async fn get_or_create(&self, store_id: StoreId, business_date: NaiveDate) -> Result<DaySummary> {
        let row: Option<DaySummaryRow> = sqlx::query_as(
            r#"select store_id, business_date, fuel_sales, fuel_gallons, merchandise_sales,
                      net_sales, gross_sales, tax_total, transaction_count, created_at, updated_at
               from naxml.day_summary where store_id = $1 and business_date = $2"#,
        )
        .bind(store_id.as_uuid())
        .bind(business_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let now = Utc::now();
        let summary = DaySummary::empty(store_id, business_date, now);
        self.save(&summary).await?;
        Ok(summary)
    }

    async fn save(&self, summary: &DaySummary) -> Result<()> {
        sqlx::query(
            r#"
            insert into naxml.day_summary
                (store_id, business_date, fuel_sales, fuel_gallons, merchandise_sales,
                 net_sales, gross_sales, tax_total, transaction_count, created_at, updated_at)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            on conflict (store_id, business_date) do update set
                fuel_sales = excluded.fuel_sales,
                fuel_gallons = excluded.fuel_gallons,
                merchandise_sales = excluded.merchandise_sales,
                net_sales = excluded.net_sales,
                gross_sales = excluded.gross_sales,
                tax_total = excluded.tax_total,
                transaction_count = excluded.transaction_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(summary.store_id.as_uuid())
        .bind(summary.business_date)
        .bind(summary.fuel_sales)
        .bind(summary.fuel_gallons)
        .bind(summary.merchandise_sales)
        .bind(summary.net_sales)
        .bind(summary.gross_sales)
        .bind(summary.tax_total)
        .bind(summary.transaction_count)
        .bind(summary.created_at)
        .bind(summary.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(())
    }
}
