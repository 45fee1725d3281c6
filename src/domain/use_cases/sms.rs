use chrono::Utc;

use crate::{
    entities::sms::{SentData, SmsForm, SmsIntegrationStatus, SmsMockResponse},
    utils::{latency::MockLatency, mock_id::mock_id},
    validation::ValidationFailure,
};

/// SMS stub. Real delivery stays off even with Twilio credentials present.
pub struct SmsHandler {
    latency: MockLatency,
    twilio_configured: bool,
}

impl SmsHandler {
    pub fn new(latency: MockLatency, twilio_configured: bool) -> Self {
        SmsHandler { latency, twilio_configured }
    }

    pub async fn send(&self, form: SmsForm) -> Result<SmsMockResponse, ValidationFailure> {
        let request = form.into_request()?;

        if self.twilio_configured {
            tracing::info!("Twilio credentials found, but SMS sending is disabled");
        }

        self.latency.simulate().await;

        tracing::debug!(
            to = %request.masked_phone(),
            kind = request.kind(),
            length = request.message().chars().count(),
            "SMS send attempt (mock)"
        );

        Ok(SmsMockResponse {
            success: true,
            mock: true,
            message: "SMS đã được gửi thành công! (Demo mode - SMS không thực sự được gửi)",
            sms_id: mock_id("mock_sms"),
            timestamp: Utc::now().to_rfc3339(),
            cost_estimate: "0.05 USD",
            delivery_status: "queued",
            note: if self.twilio_configured {
                "Twilio credentials detected but SMS sending disabled for safety and cost control"
            } else {
                "Configure TWILIO_SID, TWILIO_TOKEN, TWILIO_FROM to enable real SMS sending"
            },
            warning: "⚠️ SMS thực tế có thể tốn phí. Chỉ bật khi cần thiết và có kiểm soát chi phí.",
            integration_status: SmsIntegrationStatus {
                twilio: if self.twilio_configured { "configured_but_disabled" } else { "not_configured" },
                rate_limit: "active",
                cost_control: "enabled",
            },
            sent_data: SentData {
                phone: request.masked_phone(),
                message_length: request.message().chars().count(),
                kind: request.kind().to_string(),
            },
        })
    }
}
