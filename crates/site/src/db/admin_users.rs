//! `PostgreSQL` admin user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use awalan_core::{AdminUserId, Email};

use super::{AdminUserRepository, RepositoryError, conflict_or_database};
use crate::models::AdminUser;

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    username: String,
    email: Option<String>,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: AdminUserId::new(row.id),
            username: row.username,
            email,
            last_login: row.last_login,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AdminCredentialRow {
    #[sqlx(flatten)]
    admin: AdminUserRow,
    password_hash: String,
}

/// Repository for admin users.
#[derive(Clone)]
pub struct PgAdminUserRepository {
    pool: PgPool,
}

impl PgAdminUserRepository {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserRepository for PgAdminUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row: Option<AdminCredentialRow> = sqlx::query_as(
            r"
            SELECT id, username, email, last_login, created_at, password_hash
            FROM site.admin_user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok((AdminUser::try_from(r.admin)?, r.password_hash)))
            .transpose()
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&Email>,
    ) -> Result<AdminUser, RepositoryError> {
        let row: AdminUserRow = sqlx::query_as(
            r"
            INSERT INTO site.admin_user (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, last_login, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(email.map(Email::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "admin user"))?;

        row.try_into()
    }

    async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE site.admin_user
            SET last_login = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
