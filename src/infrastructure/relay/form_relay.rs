use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Serialize;

use crate::{entities::contact::ContactSubmission, errors::RelayError, settings::AppConfig};

/// Outbound hand-off of a contact message to a hosted form service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRelay: Send + Sync {
    async fn forward(&self, submission: &ContactSubmission) -> Result<(), RelayError>;
}

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    #[serde(rename = "_replyto")]
    reply_to: &'a str,
    #[serde(rename = "_subject")]
    mail_subject: String,
    #[serde(rename = "_cc", skip_serializing_if = "Option::is_none")]
    cc: Option<&'a str>,
}

/// Posts submissions as JSON to a Formspree-style endpoint. Any 2xx counts as
/// delivered.
#[derive(Debug, Clone)]
pub struct HttpFormRelay {
    client: reqwest::Client,
    url: String,
    cc: Option<String>,
}

impl HttpFormRelay {
    pub fn new(url: impl Into<String>, cc: Option<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpFormRelay {
            client,
            url: url.into(),
            cc: cc.filter(|c| !c.trim().is_empty()),
        })
    }

    /// `None` when no relay URL is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, RelayError> {
        config
            .relay_url()
            .map(|url| {
                HttpFormRelay::new(
                    url,
                    config.relay_cc.clone(),
                    Duration::from_secs(config.relay_timeout_secs),
                )
            })
            .transpose()
    }
}

#[async_trait]
impl ContactRelay for HttpFormRelay {
    async fn forward(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let payload = RelayPayload {
            name: submission.name(),
            email: submission.email(),
            subject: submission.subject(),
            message: submission.message(),
            reply_to: submission.email(),
            mail_subject: format!("Portfolio Contact: {}", submission.subject()),
            cc: self.cc.as_deref(),
        };

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "Contact relayed");
            Ok(())
        } else {
            Err(RelayError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_form_service_field_names() {
        let payload = RelayPayload {
            name: "An",
            email: "an@example.com",
            subject: "Hello",
            message: "Hi",
            reply_to: "an@example.com",
            mail_subject: "Portfolio Contact: Hello".into(),
            cc: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["_replyto"], "an@example.com");
        assert_eq!(value["_subject"], "Portfolio Contact: Hello");
        assert!(value.get("_cc").is_none());
    }

    #[test]
    fn no_url_means_no_relay() {
        let config = AppConfig::default();
        assert!(HttpFormRelay::from_config(&config).unwrap().is_none());

        let config = AppConfig {
            relay_url: Some("https://formspree.io/f/abc".into()),
            relay_cc: Some("  ".into()),
            ..AppConfig::default()
        };
        let relay = HttpFormRelay::from_config(&config).unwrap().unwrap();
        assert!(relay.cc.is_none());
    }
}
