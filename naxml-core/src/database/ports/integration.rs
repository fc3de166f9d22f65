//! `POSIntegration` lookups driving the Scheduler.

use async_trait::async_trait;

use naxml_model::ids::{IntegrationId, StoreId};
use naxml_model::pos_integration::POSIntegration;
use naxml_model::Result;

#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Every integration the Scheduler should spawn a watcher for
    /// (`POSIntegration::is_watchable`).
    async fn list_watchable(&self) -> Result<Vec<POSIntegration>>;

    async fn find_by_store(&self, store_id: StoreId) -> Result<Option<POSIntegration>>;

    async fn update_poll_interval(&self, id: IntegrationId, seconds: i32) -> Result<()>;
}
