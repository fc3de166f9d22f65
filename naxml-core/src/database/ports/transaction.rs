//! Transaction ingest persistence. A single source file's
//! transaction is written alongside its line items and payments in one
//! database transaction.

use async_trait::async_trait;

use naxml_model::ids::{StoreId, TransactionId};
use naxml_model::transaction::{LineItem, Payment, Transaction};
use naxml_model::Result;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn exists_by_hash(&self, store_id: StoreId, source_file_hash: &str) -> Result<bool>;

    async fn insert(
        &self,
        transaction: &Transaction,
        line_items: &[LineItem],
        payments: &[Payment],
    ) -> Result<()>;

    /// Used to resolve `linkedTransactionPosId` against an already-ingested
    /// transaction.
    async fn find_id_by_pos_id(
        &self,
        store_id: StoreId,
        pos_transaction_id: &str,
    ) -> Result<Option<TransactionId>>;
}
