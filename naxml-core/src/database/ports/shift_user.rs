//! Shift/cashier resolution for transaction ingest: choose the
//! most-recent open shift, else the most recent shift, else fail; choose
//! the company's dedicated import user, else the owner, else any member,
//! else fail.

use async_trait::async_trait;

use naxml_model::ids::{CompanyId, StoreId};
use naxml_model::shift_user::{Shift, User};
use naxml_model::Result;

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    async fn find_open_shift(&self, store_id: StoreId) -> Result<Option<Shift>>;
    async fn find_most_recent_shift(&self, store_id: StoreId) -> Result<Option<Shift>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_import_user(&self, company_id: CompanyId) -> Result<Option<User>>;
    async fn find_owner(&self, company_id: CompanyId) -> Result<Option<User>>;
    async fn find_any_member(&self, company_id: CompanyId) -> Result<Option<User>>;
}
