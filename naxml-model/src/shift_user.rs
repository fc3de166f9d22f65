//! Minimal shift/user views needed for transaction ingest. Shifts and
//! users are owned by the wider back-office platform; this crate only
//! reads the fields it needs to resolve a transaction onto a shift and a
//! cashier.

use chrono::{DateTime, Utc};

use crate::ids::{CompanyId, ShiftId, StoreId, UserId};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    pub id: ShiftId,
    pub store_id: StoreId,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UserRole {
    Import,
    Owner,
    Member,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub company_id: CompanyId,
    pub role: UserRole,
}
