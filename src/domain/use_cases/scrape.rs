use std::time::Duration;

use chrono::Utc;
use zeroize::Zeroizing;

use crate::{
    entities::scrape::{ComplianceNotes, NextSteps, ScrapeAcceptedResponse, ScrapeForm, SubmittedRequest},
    errors::AppError,
    utils::mock_id::mock_id,
};

/// Admin-only scraping endpoint. Even when enabled it only records the
/// request for manual review; nothing is ever fetched.
pub struct ScrapeHandler {
    admin_password: Option<Zeroizing<String>>,
    enabled: bool,
    review_delay: Duration,
}

impl ScrapeHandler {
    pub fn new(admin_password: Option<String>, enabled: bool, review_delay: Duration) -> Self {
        ScrapeHandler {
            admin_password: admin_password.filter(|p| !p.is_empty()).map(Zeroizing::new),
            enabled,
            review_delay,
        }
    }

    fn password_matches(&self, candidate: Option<&Zeroizing<String>>) -> bool {
        match (&self.admin_password, candidate) {
            (Some(expected), Some(given)) => !given.is_empty() && expected.as_str() == given.as_str(),
            _ => false,
        }
    }

    pub async fn submit(&self, mut form: ScrapeForm, client_ip: &str) -> Result<ScrapeAcceptedResponse, AppError> {
        let password = form.take_password();
        if !self.password_matches(password.as_ref()) {
            tracing::warn!(ip = client_ip, "Unauthorized admin scrape attempt");
            return Err(AppError::Unauthorized("Invalid admin password".into()));
        }

        if !self.enabled {
            return Err(AppError::FeatureDisabled(
                "Web scraping is disabled by default for security and legal compliance.".into(),
            ));
        }

        let request = form.into_request()?;

        tracing::info!(
            ip = client_ip,
            action = %request.action,
            target_url = %request.target_url,
            scrape_type = %request.scrape_type,
            "Admin scrape request parked for review"
        );

        if !self.review_delay.is_zero() {
            tokio::time::sleep(self.review_delay).await;
        }

        Ok(ScrapeAcceptedResponse {
            success: false,
            mock: true,
            status: "requires_manual_approval",
            message: "Scraping request received but requires manual admin approval for safety.",
            request_id: mock_id("scrape"),
            submitted_request: SubmittedRequest {
                action: request.action,
                target_url: request.target_url,
                scrape_type: request.scrape_type,
                timestamp: Utc::now().to_rfc3339(),
                ip: client_ip.to_string(),
            },
            next_steps: NextSteps {
                step_1: "Admin will review the scraping request manually",
                step_2: "Legal and technical compliance will be verified",
                step_3: "If approved, scraping will be executed with proper safeguards",
                step_4: "Results will be provided via secure channel",
            },
            compliance_notes: ComplianceNotes {
                robots_txt: "Will be checked before execution",
                rate_limiting: "Respectful delays will be implemented",
                terms_of_service: "Must be reviewed and complied with",
                data_privacy: "Only public data will be collected",
            },
            warning: "🚨 This is a stub implementation. Real scraping requires careful legal and technical implementation.",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str) -> ScrapeForm {
        ScrapeForm {
            password: Some(password.into()),
            action: Some("collect".into()),
            target_url: Some("https://example.com/listing".into()),
            scrape_type: None,
        }
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let handler = ScrapeHandler::new(Some("operator-secret".into()), true, Duration::ZERO);

        let err = handler.submit(form("guess"), "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn missing_operator_secret_rejects_everyone() {
        let handler = ScrapeHandler::new(None, true, Duration::ZERO);

        let err = handler.submit(form(""), "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn disabled_flag_wins_over_validation() {
        let handler = ScrapeHandler::new(Some("operator-secret".into()), false, Duration::ZERO);
        let bad = ScrapeForm { target_url: Some("not a url".into()), ..form("operator-secret") };

        let err = handler.submit(bad, "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, AppError::FeatureDisabled(_)));
    }

    #[tokio::test]
    async fn accepted_request_echoes_submission() {
        let handler = ScrapeHandler::new(Some("operator-secret".into()), true, Duration::ZERO);

        let response = handler.submit(form("operator-secret"), "1.2.3.4").await.unwrap();

        assert_eq!(response.status, "requires_manual_approval");
        assert!(response.request_id.starts_with("scrape_"));
        assert_eq!(response.submitted_request.scrape_type, "general");
        assert_eq!(response.submitted_request.ip, "1.2.3.4");
    }

    #[tokio::test]
    async fn invalid_fields_after_auth_are_validation_errors() {
        let handler = ScrapeHandler::new(Some("operator-secret".into()), true, Duration::ZERO);
        let bad = ScrapeForm { target_url: Some("not a url".into()), ..form("operator-secret") };

        let err = handler.submit(bad, "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
