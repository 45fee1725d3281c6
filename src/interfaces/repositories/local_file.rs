use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tokio::{fs, sync::Mutex};

use crate::{
    entities::contact::{ContactSubmission, StoredContact},
    errors::StoreError,
};

/// Last-resort contact store: a JSON array in a local file, rewritten whole on
/// every append. Appends from this process are serialized; separate processes
/// sharing the file can still overwrite each other.
pub struct LocalContactStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalContactStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, submission: &ContactSubmission, client_ip: &str) -> Result<StoredContact, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_rows().await?;
        let now = Utc::now();
        let max_id = rows.iter().filter_map(|r| r.get("id").and_then(Value::as_i64)).max();
        let id = match max_id {
            Some(max) if max >= now.timestamp_millis() => max + 1,
            _ => now.timestamp_millis(),
        };

        let record = StoredContact {
            id,
            name: submission.name().to_string(),
            email: submission.email().to_string(),
            subject: submission.subject().to_string(),
            message: submission.message().to_string(),
            created_at: now,
            ip: Some(client_ip.to_string()),
        };

        rows.push(serde_json::to_value(&record)?);
        self.write_rows(&rows).await?;

        tracing::info!(id = record.id, path = %self.path.display(), "Contact saved to local file");
        Ok(record)
    }

    /// Every row that parses as a contact; unreadable rows are skipped.
    pub async fn load(&self) -> Result<Vec<StoredContact>, StoreError> {
        let rows = self.read_rows().await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect())
    }

    /// Raw rows, so entries written by older versions survive a rewrite.
    async fn read_rows(&self) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                let aside = self.path.with_extension("json.corrupt");
                tracing::warn!(
                    "Contacts file {} is corrupt ({}); moving it to {} and starting fresh",
                    self.path.display(),
                    e,
                    aside.display()
                );
                fs::rename(&self.path, &aside).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn write_rows(&self, rows: &[Value]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(rows)?;
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
