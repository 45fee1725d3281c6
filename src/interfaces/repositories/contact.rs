use std::{collections::HashSet, sync::atomic::Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    entities::contact::ContactSubmission,
    errors::StoreError,
    repositories::sqlx_repo::{CONTACTS_SCHEMA_READY, SqlxContactRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Creates the `contacts` table if it is missing.
    async fn ensure_schema(&self) -> Result<(), StoreError>;
    async fn insert_contact(
        &self,
        submission: &ContactSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StoreError>;
    async fn check_connection(&self) -> Result<(), StoreError>;
    async fn existing_emails(&self) -> Result<HashSet<String>, StoreError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        if CONTACTS_SCHEMA_READY.load(Ordering::Acquire) {
            return Ok(());
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                subject VARCHAR(500),
                message TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        CONTACTS_SCHEMA_READY.store(true, Ordering::Release);
        tracing::info!("contacts table is ready");
        Ok(())
    }

    async fn insert_contact(
        &self,
        submission: &ContactSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO contacts (name, email, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(submission.name())
        .bind(submission.email())
        .bind(submission.subject())
        .bind(submission.message())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(i64::from(id))
    }

    async fn check_connection(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn existing_emails(&self) -> Result<HashSet<String>, StoreError> {
        let emails: Vec<String> = sqlx::query_scalar("SELECT email FROM contacts")
            .fetch_all(&self.pool)
            .await?;

        Ok(emails.into_iter().collect())
    }
}
