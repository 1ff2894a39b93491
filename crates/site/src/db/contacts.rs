//! `PostgreSQL` contact submission repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use awalan_core::{ContactId, ContactStatus, Email, PhoneNumber, ServiceKind};

use super::{ContactRepository, RepositoryError, clamp_limit};
use crate::models::{ContactSubmission, NewContactSubmission};

/// Raw row; enum and typed columns are validated on the way out.
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    email: Option<String>,
    phone: String,
    service: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;
        let phone = PhoneNumber::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;
        let service = row.service.parse::<ServiceKind>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid service in database: {e}"))
        })?;
        let status = row.status.parse::<ContactStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email,
            phone,
            service,
            message: row.message,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for contact submissions.
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn save(&self, contact: &NewContactSubmission) -> Result<ContactId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO site.contact_submission (name, email, phone, service, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&contact.name)
        .bind(contact.email.as_ref().map(Email::as_str))
        .bind(contact.phone.as_str())
        .bind(contact.service.as_str())
        .bind(&contact.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContactId::new(id))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            r"
            SELECT id, name, email, phone, service, message,
                   status::text AS status, created_at, updated_at
            FROM site.contact_submission
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(clamp_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ContactSubmission::try_from).collect()
    }

    async fn update_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<ContactSubmission, RepositoryError> {
        let row: Option<ContactRow> = sqlx::query_as(
            r"
            UPDATE site.contact_submission
            SET status = $2::site.contact_status, updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, service, message,
                      status::text AS status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
