//! Strongly typed identifiers.
//!
//! A thin wrapper over `Uuid` per entity so that a `StoreId` and a
//! `CompanyId` can never be accidentally swapped at a call site.

use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(CompanyId);
uuid_id!(StoreId);
uuid_id!(IntegrationId);
uuid_id!(TransactionId);
uuid_id!(ShiftId);
uuid_id!(UserId);
uuid_id!(AuditRecordId);
uuid_id!(FileLogId);
uuid_id!(SyncLogId);
