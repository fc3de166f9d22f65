//! `POSIntegration`: one row per store's POS connection.

use chrono::{DateTime, Utc};

use crate::ids::{CompanyId, IntegrationId, StoreId};
use crate::vendor::{ConnectionMode, PosType};

pub const DEFAULT_POLL_INTERVAL_SECONDS: i32 = 900;
pub const MIN_POLL_INTERVAL_SECONDS: i32 = 60;
pub const MAX_POLL_INTERVAL_SECONDS: i32 = 86_400;

/// Clamp a requested poll interval into the allowed range.
pub fn clamp_poll_interval(seconds: i32) -> i32 {
    seconds.clamp(MIN_POLL_INTERVAL_SECONDS, MAX_POLL_INTERVAL_SECONDS)
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct POSIntegration {
    pub id: IntegrationId,
    pub company_id: CompanyId,
    pub store_id: StoreId,
    pub pos_type: PosType,
    pub connection_mode: ConnectionMode,

    /// `R/<outbox>` — files produced by the POS (inbound to this core).
    pub export_path: String,
    /// `R/<inbox>` — files destined for the POS (outbound from this core).
    pub import_path: String,
    pub archive_path: Option<String>,
    pub error_path: Option<String>,

    /// Opaque reference to encrypted connection credentials; the encryption
    /// primitive itself is an external collaborator.
    pub encrypted_credentials: Option<Vec<u8>>,

    pub naxml_version: Option<String>,
    pub generate_acknowledgments: bool,
    pub store_location_id: Option<String>,
    pub archive_processed_files: bool,

    pub sync_enabled: bool,
    pub sync_interval_mins: i32,
    pub sync_departments: bool,
    pub sync_tender_types: bool,
    pub sync_cashiers: bool,
    pub sync_tax_rates: bool,

    pub poll_interval_seconds: i32,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl POSIntegration {
    /// Gate used by the Scheduler when enumerating integrations to watch
    ///: active, sync-enabled, and carrying an exchange path.
    pub fn is_watchable(&self) -> bool {
        self.is_active
            && self.sync_enabled
            && (self.connection_mode == ConnectionMode::FileExchange
                || !self.export_path.is_empty())
    }

    pub fn effective_poll_interval(&self) -> i32 {
        clamp_poll_interval(self.poll_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_below_minimum() {
        assert_eq!(clamp_poll_interval(10), MIN_POLL_INTERVAL_SECONDS);
    }

    #[test]
    fn clamps_above_maximum() {
        assert_eq!(clamp_poll_interval(999_999), MAX_POLL_INTERVAL_SECONDS);
    }

    #[test]
    fn passes_through_in_range() {
        assert_eq!(clamp_poll_interval(1800), 1800);
    }
}
