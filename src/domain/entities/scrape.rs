use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;
use zeroize::Zeroizing;

use crate::validation::{check_form, is_absolute_url, present, FormRules, ValidationFailure};

#[derive(Default, Deserialize, Validate)]
pub struct ScrapeForm {
    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub action: Option<String>,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub target_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub scrape_type: Option<String>,
}

impl fmt::Debug for ScrapeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapeForm")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("action", &self.action)
            .field("target_url", &self.target_url)
            .field("scrape_type", &self.scrape_type)
            .finish()
    }
}

impl FormRules for ScrapeForm {
    const MISSING: ValidationFailure = ValidationFailure::MissingFields {
        error: "Missing required fields",
        message: "action and target_url are required",
    };
    const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
        error: "Field too long",
        message: "action (max 100), target_url (max 2048), scrape_type (max 50)",
    };

    fn has_required_fields(&self) -> bool {
        present(&self.action) && present(&self.target_url)
    }

    fn check_format(&self) -> Result<(), ValidationFailure> {
        match self.target_url.as_deref() {
            Some(url) if is_absolute_url(url) => Ok(()),
            _ => Err(ValidationFailure::InvalidFormat {
                error: "Invalid URL",
                message: "target_url must be a valid URL",
            }),
        }
    }
}

impl ScrapeForm {
    /// Moves the password out so it is wiped on drop.
    pub fn take_password(&mut self) -> Option<Zeroizing<String>> {
        self.password.take().map(Zeroizing::new)
    }

    pub fn into_request(self) -> Result<ScrapeRequest, ValidationFailure> {
        check_form(&self)?;

        Ok(ScrapeRequest {
            action: self.action.unwrap_or_default(),
            target_url: self.target_url.unwrap_or_default(),
            scrape_type: self
                .scrape_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "general".to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    pub action: String,
    pub target_url: String,
    pub scrape_type: String,
}

#[derive(Debug, Serialize)]
pub struct SubmittedRequest {
    pub action: String,
    pub target_url: String,
    pub scrape_type: String,
    pub timestamp: String,
    pub ip: String,
}

#[derive(Debug, Serialize)]
pub struct NextSteps {
    pub step_1: &'static str,
    pub step_2: &'static str,
    pub step_3: &'static str,
    pub step_4: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ComplianceNotes {
    pub robots_txt: &'static str,
    pub rate_limiting: &'static str,
    pub terms_of_service: &'static str,
    pub data_privacy: &'static str,
}

/// 202 body: the request is recorded and parked for manual review.
#[derive(Debug, Serialize)]
pub struct ScrapeAcceptedResponse {
    pub success: bool,
    pub mock: bool,
    pub status: &'static str,
    pub message: &'static str,
    pub request_id: String,
    pub submitted_request: SubmittedRequest,
    pub next_steps: NextSteps,
    pub compliance_notes: ComplianceNotes,
    pub warning: &'static str,
}
