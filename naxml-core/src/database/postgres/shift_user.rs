//! Read-only views onto `shift` and `app_user`, tables owned by the wider
//! back-office platform (see DESIGN.md for the assumed column layout).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use naxml_model::ids::{CompanyId, ShiftId, StoreId, UserId};
use naxml_model::shift_user::{Shift, User, UserRole};
use naxml_model::{NaxmlError, Result};

use crate::database::ports::{ShiftRepository, UserRepository};

#[derive(sqlx::FromRow)]
struct ShiftRow {
    id: uuid::Uuid,
    store_id: uuid::Uuid,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl From<ShiftRow> for Shift {
    fn from(r: ShiftRow) -> Self {
        Shift {
            id: ShiftId(r.id),
            store_id: StoreId(r.store_id),
            opened_at: r.opened_at,
            closed_at: r.closed_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresShiftRepository {
    pool: PgPool,
}

impl PostgresShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftRepository for PostgresShiftRepository {
    async fn find_open_shift(&self, store_id: StoreId) -> Result<Option<Shift>> {
        let row: Option<ShiftRow> = sqlx::query_as(
            r#"select id, store_id, opened_at, closed_at
               from shift
               where store_id = $1 and closed_at is null
               order by opened_at desc
               limit 1"#,
        )
        .bind(store_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(Shift::from))
    }

    async fn find_most_recent_shift(&self, store_id: StoreId) -> Result<Option<Shift>> {
        let row: Option<ShiftRow> = sqlx::query_as(
            r#"select id, store_id, opened_at, closed_at
               from shift
               where store_id = $1
               order by opened_at desc
               limit 1"#,
        )
        .bind(store_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(Shift::from))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    company_id: uuid::Uuid,
    role: UserRole,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: UserId(r.id),
            company_id: CompanyId(r.company_id),
            role: r.role,
        }
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_import_user(&self, company_id: CompanyId) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"select id, company_id, role from app_user
               where company_id = $1 and role = 'IMPORT'
               order by id
               limit 1"#,
        )
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    async fn find_owner(&self, company_id: CompanyId) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"select id, company_id, role from app_user
               where company_id = $1 and role = 'OWNER'
               order by id
               limit 1"#,
        )
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    async fn find_any_member(&self, company_id: CompanyId) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"select id, company_id, role from app_user
               where company_id = $1
               order by id
               limit 1"#,
        )
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NaxmlError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }
}
