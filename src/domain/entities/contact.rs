use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    utils::sanitize::escape_html,
    validation::{check_form, is_valid_email, present, FormRules, ValidationFailure},
};

/// Raw contact form body. Every field is optional so that absent fields
/// surface as a validation failure rather than a deserialization error.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub subject: Option<String>,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

impl FormRules for ContactForm {
    const MISSING: ValidationFailure = ValidationFailure::MissingFields {
        error: "Missing required fields",
        message: "Vui lòng điền đầy đủ thông tin: Tên, Email, Chủ đề, và Tin nhắn",
    };
    const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
        error: "Field too long",
        message: "Tên (max 100), Chủ đề (max 200), Tin nhắn (max 2000 ký tự)",
    };

    fn has_required_fields(&self) -> bool {
        present(&self.name) && present(&self.email) && present(&self.subject) && present(&self.message)
    }

    fn check_format(&self) -> Result<(), ValidationFailure> {
        match self.email.as_deref() {
            Some(email) if is_valid_email(email) => Ok(()),
            _ => Err(ValidationFailure::InvalidFormat {
                error: "Invalid email format",
                message: "Vui lòng nhập địa chỉ email hợp lệ",
            }),
        }
    }
}

impl ContactForm {
    /// Validates, then escapes every field exactly once.
    pub fn into_submission(self) -> Result<ContactSubmission, ValidationFailure> {
        check_form(&self)?;

        Ok(ContactSubmission {
            name: escape_html(&self.name.unwrap_or_default()),
            email: escape_html(&self.email.unwrap_or_default()),
            subject: escape_html(&self.subject.unwrap_or_default()),
            message: escape_html(&self.message.unwrap_or_default()),
        })
    }
}

/// A validated and sanitized contact message. Only obtainable through
/// [`ContactForm::into_submission`] or by loading an already-stored row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rebuilds a submission from a row that was sanitized when it was saved.
    pub fn from_stored(row: &StoredContact) -> Self {
        ContactSubmission {
            name: row.name.clone(),
            email: row.email.clone(),
            subject: row.subject.clone(),
            message: row.message.clone(),
        }
    }
}

/// Row shape of the local contacts file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StoreLocation {
    #[serde(rename = "database")]
    Remote,
    #[serde(rename = "local_file")]
    Local,
}

/// Result of running the fallback chain for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Stored { location: StoreLocation, id: Option<i64> },
    Failed { reason: String },
}

impl PersistOutcome {
    pub fn location(&self) -> Option<StoreLocation> {
        match self {
            PersistOutcome::Stored { location, .. } => Some(*location),
            PersistOutcome::Failed { .. } => None,
        }
    }

    pub fn saved_to_database(&self) -> bool {
        self.location() == Some(StoreLocation::Remote)
    }

    pub fn saved_to_label(&self) -> &'static str {
        match self.location() {
            Some(StoreLocation::Remote) => "database",
            Some(StoreLocation::Local) => "local_file",
            None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Delivered,
    Failed { reason: String },
    NotConfigured,
}

/// Everything the contact route needs to build its response.
#[derive(Debug)]
pub struct ContactReceipt {
    pub submission: ContactSubmission,
    pub persisted: PersistOutcome,
    pub relay: RelayOutcome,
}

#[derive(Debug, Serialize)]
pub struct IntegrationStatus {
    pub database: &'static str,
    pub relay: &'static str,
    pub sendgrid: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReceivedData {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message_length: usize,
}

impl From<&ContactSubmission> for ReceivedData {
    fn from(submission: &ContactSubmission) -> Self {
        ReceivedData {
            name: submission.name.clone(),
            email: submission.email.clone(),
            subject: submission.subject.clone(),
            message_length: submission.message.chars().count(),
        }
    }
}

/// Response when the relay accepted the message.
#[derive(Debug, Serialize)]
pub struct ContactDeliveredResponse {
    pub success: bool,
    pub mock: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub saved_to_database: bool,
    pub saved_to: &'static str,
}

/// Response for every other path, including total persistence failure.
#[derive(Debug, Serialize)]
pub struct ContactMockResponse {
    pub success: bool,
    pub mock: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub saved_to_database: bool,
    pub saved_to: &'static str,
    pub note: &'static str,
    pub integration_status: IntegrationStatus,
    pub received_data: ReceivedData,
}
