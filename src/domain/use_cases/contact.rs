use std::sync::Arc;

use chrono::Utc;

use crate::{
    entities::contact::{
        ContactForm, ContactReceipt, ContactSubmission, PersistOutcome, RelayOutcome, StoreLocation,
    },
    errors::StoreError,
    relay::form_relay::ContactRelay,
    repositories::{contact::ContactRepository, local_file::LocalContactStore},
    validation::ValidationFailure,
};

/// Counts reported by [`ContactHandler::migrate_local_to_remote`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub found: usize,
    pub skipped: usize,
    pub migrated: usize,
    pub failed: usize,
}

pub struct ContactHandler {
    remote: Option<Arc<dyn ContactRepository>>,
    local: LocalContactStore,
    relay: Option<Arc<dyn ContactRelay>>,
}

impl ContactHandler {
    pub fn new(
        remote: Option<Arc<dyn ContactRepository>>,
        local: LocalContactStore,
        relay: Option<Arc<dyn ContactRelay>>,
    ) -> Self {
        ContactHandler { remote, local, relay }
    }

    pub fn remote(&self) -> Option<&Arc<dyn ContactRepository>> {
        self.remote.as_ref()
    }

    pub fn local(&self) -> &LocalContactStore {
        &self.local
    }

    pub fn relay_configured(&self) -> bool {
        self.relay.is_some()
    }

    /// Validate, sanitize, persist, relay. Only validation can fail; storage
    /// and relay problems are folded into the receipt.
    pub async fn submit(&self, form: ContactForm, client_ip: &str) -> Result<ContactReceipt, ValidationFailure> {
        let submission = form.into_submission()?;

        let persisted = self.persist(&submission, client_ip).await;
        let relay = self.forward(&submission).await;

        Ok(ContactReceipt { submission, persisted, relay })
    }

    /// Remote store first, local file second. Never returns an error.
    pub async fn persist(&self, submission: &ContactSubmission, client_ip: &str) -> PersistOutcome {
        let remote_failure = match &self.remote {
            Some(remote) => match self.insert_remote(remote.as_ref(), submission).await {
                Ok(id) => {
                    tracing::info!(id, "Contact saved to database");
                    return PersistOutcome::Stored { location: StoreLocation::Remote, id: Some(id) };
                }
                Err(e) => {
                    tracing::warn!("Database insert failed, falling back to local file: {}", e);
                    e.to_string()
                }
            },
            None => StoreError::NotConfigured.to_string(),
        };

        match self.local.append(submission, client_ip).await {
            Ok(row) => PersistOutcome::Stored { location: StoreLocation::Local, id: Some(row.id) },
            Err(e) => {
                tracing::error!("Local contact file write failed: {}", e);
                PersistOutcome::Failed {
                    reason: format!("remote: {}; local: {}", remote_failure, e),
                }
            }
        }
    }

    async fn insert_remote(
        &self,
        remote: &dyn ContactRepository,
        submission: &ContactSubmission,
    ) -> Result<i64, StoreError> {
        if let Err(e) = remote.ensure_schema().await {
            tracing::debug!("contacts table check failed: {}", e);
        }
        remote.insert_contact(submission, Utc::now()).await
    }

    pub async fn forward(&self, submission: &ContactSubmission) -> RelayOutcome {
        let Some(relay) = &self.relay else {
            return RelayOutcome::NotConfigured;
        };

        match relay.forward(submission).await {
            Ok(()) => RelayOutcome::Delivered,
            Err(e) => {
                tracing::warn!("Contact relay failed: {}", e);
                RelayOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    /// Copies rows from the local file into the remote table, skipping any
    /// e-mail address the table already holds.
    pub async fn migrate_local_to_remote(&self) -> Result<MigrationReport, StoreError> {
        let remote = self.remote.as_ref().ok_or(StoreError::NotConfigured)?;

        let rows = self.local.load().await?;
        let mut report = MigrationReport { found: rows.len(), ..MigrationReport::default() };
        if rows.is_empty() {
            return Ok(report);
        }

        remote.ensure_schema().await?;
        let existing = remote.existing_emails().await?;

        for row in &rows {
            if existing.contains(&row.email) {
                report.skipped += 1;
                continue;
            }

            let submission = ContactSubmission::from_stored(row);
            match remote.insert_contact(&submission, row.created_at).await {
                Ok(_) => report.migrated += 1,
                Err(e) => {
                    tracing::warn!(id = row.id, "Failed to migrate contact: {}", e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
