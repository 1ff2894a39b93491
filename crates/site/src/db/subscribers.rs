//! `PostgreSQL` newsletter subscriber repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use awalan_core::{Email, SubscriberId};

use super::{RepositoryError, SubscriberRepository, clamp_limit, conflict_or_database};
use crate::models::NewsletterSubscriber;

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: i32,
    email: String,
    subscribed_at: DateTime<Utc>,
    active: bool,
}

impl TryFrom<SubscriberRow> for NewsletterSubscriber {
    type Error = RepositoryError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: SubscriberId::new(row.id),
            email,
            subscribed_at: row.subscribed_at,
            active: row.active,
        })
    }
}

/// Repository for newsletter subscribers.
#[derive(Clone)]
pub struct PgSubscriberRepository {
    pool: PgPool,
}

impl PgSubscriberRepository {
    /// Create a new subscriber repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, email: &Email) -> Result<SubscriberId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO site.newsletter_subscriber (email)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        // A concurrent insert of the same email lands here
        .map_err(|e| conflict_or_database(e, "subscriber"))?;

        Ok(SubscriberId::new(id))
    }

    async fn reactivate(&self, id: i32) -> Result<SubscriberId, RepositoryError> {
        let reactivated: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE site.newsletter_subscriber
            SET active = TRUE, subscribed_at = now()
            WHERE id = $1 AND NOT active
            RETURNING id
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        reactivated
            .map(SubscriberId::new)
            .ok_or_else(|| RepositoryError::Conflict("subscriber already exists".to_owned()))
    }
}

#[async_trait]
impl SubscriberRepository for PgSubscriberRepository {
    async fn subscribe(&self, email: &Email) -> Result<SubscriberId, RepositoryError> {
        let existing: Option<(i32, bool)> = sqlx::query_as(
            r"
            SELECT id, active
            FROM site.newsletter_subscriber
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some((_, true)) => Err(RepositoryError::Conflict(
                "subscriber already exists".to_owned(),
            )),
            Some((id, false)) => self.reactivate(id).await,
            None => self.insert(email).await,
        }
    }

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<NewsletterSubscriber>, RepositoryError> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(
            r"
            SELECT id, email, subscribed_at, active
            FROM site.newsletter_subscriber
            ORDER BY subscribed_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(clamp_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(NewsletterSubscriber::try_from)
            .collect()
    }

    async fn deactivate(&self, email: &Email) -> Result<bool, RepositoryError> {
        let id: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE site.newsletter_subscriber
            SET active = FALSE
            WHERE email = $1 AND active
            RETURNING id
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.is_some())
    }
}
