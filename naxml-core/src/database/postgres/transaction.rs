use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use naxml_model::ids::{ShiftId, StoreId, TransactionId, UserId};
use naxml_model::transaction::{LineItem, Payment, PosTransactionType, Transaction};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::TransactionRepository;

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: uuid::Uuid,
    store_id: uuid::Uuid,
    source_file_hash: String,
    pos_transaction_id: String,
    public_id: String,
    business_date: NaiveDate,
    timestamp: DateTime<Utc>,
    transaction_type: PosTransactionType,
    gross_total: Decimal,
    net_total: Decimal,
    tax_total: Decimal,
    grand_total: Decimal,
    discount_total: Decimal,
    change_due: Decimal,
    item_count: i32,
    is_training_mode: bool,
    is_outside_sale: bool,
    is_offline: bool,
    is_suspended: bool,
    linked_transaction_id: Option<uuid::Uuid>,
    link_reason: Option<String>,
    shift_id: uuid::Uuid,
    cashier_user_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl From<TransactionRow> for Transaction {
    fn from(r: TransactionRow) -> Self {
        Transaction {
            id: TransactionId(r.id),
            store_id: StoreId(r.store_id),
            source_file_hash: r.source_file_hash,
            pos_transaction_id: r.pos_transaction_id,
            public_id: r.public_id,
            business_date: r.business_date,
            timestamp: r.timestamp,
            transaction_type: r.transaction_type,
            gross_total: r.gross_total,
            net_total: r.net_total,
            tax_total: r.tax_total,
            grand_total: r.grand_total,
            discount_total: r.discount_total,
            change_due: r.change_due,
            item_count: r.item_count,
            is_training_mode: r.is_training_mode,
            is_outside_sale: r.is_outside_sale,
            is_offline: r.is_offline,
            is_suspended: r.is_suspended,
            linked_transaction_id: r.linked_transaction_id.map(TransactionId),
            link_reason: r.link_reason,
            shift_id: ShiftId(r.shift_id),
            cashier_user_id: UserId(r.cashier_user_id),
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn exists_by_hash(&self, store_id: StoreId, source_file_hash: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"select 1 from naxml."transaction" where store_id = $1 and source_file_hash = $2 limit 1"#,
        )
        .bind(store_id.as_uuid())
        .bind(source_file_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn insert(
        &self,
        transaction: &Transaction,
        line_items: &[LineItem],
        payments: &[Payment],
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            insert into naxml."transaction"
                (id, store_id, source_file_hash, pos_transaction_id, public_id,
                 business_date, "timestamp", transaction_type, gross_total, net_total,
                 tax_total, grand_total, discount_total, change_due, item_count,
                 is_training_mode, is_outside_sale, is_offline, is_suspended,
                 linked_transaction_id, link_reason, shift_id, cashier_user_id, created_at)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.store_id.as_uuid())
        .bind(&transaction.source_file_hash)
        .bind(&transaction.pos_transaction_id)
        .bind(&transaction.public_id)
        .bind(transaction.business_date)
        .bind(transaction.timestamp)
        .bind(transaction.transaction_type)
        .bind(transaction.gross_total)
        .bind(transaction.net_total)
        .bind(transaction.tax_total)
        .bind(transaction.grand_total)
        .bind(transaction.discount_total)
        .bind(transaction.change_due)
        .bind(transaction.item_count)
        .bind(transaction.is_training_mode)
        .bind(transaction.is_outside_sale)
        .bind(transaction.is_offline)
        .bind(transaction.is_suspended)
        .bind(transaction.linked_transaction_id.map(|id| id.as_uuid()))
        .bind(&transaction.link_reason)
        .bind(transaction.shift_id.as_uuid())
        .bind(transaction.cashier_user_id.as_uuid())
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        for li in line_items {
            sqlx::query(
                r#"
                insert into naxml.line_item
                    (transaction_id, store_id, line_number, item_code, department_code,
                     line_type, description, quantity, unit_price, extended_price,
                     tax_code, tax_amount, discount_amount, modifier_codes, is_void, is_refund)
                values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(li.transaction_id.as_uuid())
            .bind(li.store_id.as_uuid())
            .bind(li.line_number)
            .bind(&li.item_code)
            .bind(&li.department_code)
            .bind(li.line_type)
            .bind(&li.description)
            .bind(li.quantity)
            .bind(li.unit_price)
            .bind(li.extended_price)
            .bind(&li.tax_code)
            .bind(li.tax_amount)
            .bind(li.discount_amount)
            .bind(&li.modifier_codes)
            .bind(li.is_void)
            .bind(li.is_refund)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }

        for p in payments {
            sqlx::query(
                r#"
                insert into naxml.payment
                    (transaction_id, store_id, tender_code, description, amount,
                     reference, card_type, card_last4)
                values ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(p.transaction_id.as_uuid())
            .bind(p.store_id.as_uuid())
            .bind(&p.tender_code)
            .bind(&p.description)
            .bind(p.amount)
            .bind(&p.reference)
            .bind(&p.card_type)
            .bind(&p.card_last4)
            .execute(&mut *tx)
            .await
            .map_err(|e| NaxmlError::Database(e.to_string()))?;
        }

        tx.commit().await.map_err(|e| NaxmlError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_id_by_pos_id(
        &self,
        store_id: StoreId,
        pos_transaction_id: &str,
    ) -> Result<Option<TransactionId>> {
        let row: Option<(uuid::Uuid,)> = sqlx::query_as(
            r#"select id from naxml."transaction"
               where store_id = $1 and pos_transaction_id = $2
               order by created_at desc
               limit 1"#,
        )
        .bind(store_id.as_uuid())
        .bind(pos_transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(|(id,)| TransactionId(id)))
    }
}
