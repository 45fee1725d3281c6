use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    utils::sanitize::escape_html,
    validation::{check_form, is_valid_vietnamese_phone, present, FormRules, ValidationFailure},
};

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SmsForm {
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(max = 160))]
    pub message: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl FormRules for SmsForm {
    const MISSING: ValidationFailure = ValidationFailure::MissingFields {
        error: "Missing required fields",
        message: "Vui lòng cung cấp số điện thoại và nội dung tin nhắn",
    };
    const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
        error: "Message too long",
        message: "Tin nhắn SMS không được vượt quá 160 ký tự",
    };

    fn has_required_fields(&self) -> bool {
        present(&self.phone) && present(&self.message)
    }

    fn check_format(&self) -> Result<(), ValidationFailure> {
        match self.phone.as_deref() {
            Some(phone) if is_valid_vietnamese_phone(phone) => Ok(()),
            _ => Err(ValidationFailure::InvalidFormat {
                error: "Invalid phone number",
                message: "Vui lòng nhập số điện thoại Việt Nam hợp lệ (VD: 0901234567)",
            }),
        }
    }
}

impl SmsForm {
    pub fn into_request(self) -> Result<SmsRequest, ValidationFailure> {
        check_form(&self)?;

        Ok(SmsRequest {
            phone: escape_html(&self.phone.unwrap_or_default()),
            message: escape_html(&self.message.unwrap_or_default()),
            kind: escape_html(self.kind.as_deref().unwrap_or("notification")),
        })
    }
}

/// Validated, escaped SMS request. Never actually sent anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsRequest {
    phone: String,
    message: String,
    kind: String,
}

impl SmsRequest {
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Every character except the last four replaced with `*`.
    pub fn masked_phone(&self) -> String {
        let total = self.phone.chars().count();
        self.phone
            .chars()
            .enumerate()
            .map(|(i, c)| if i + 4 < total { '*' } else { c })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct SmsIntegrationStatus {
    pub twilio: &'static str,
    pub rate_limit: &'static str,
    pub cost_control: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SentData {
    pub phone: String,
    pub message_length: usize,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct SmsMockResponse {
    pub success: bool,
    pub mock: bool,
    pub message: &'static str,
    pub sms_id: String,
    pub timestamp: String,
    pub cost_estimate: &'static str,
    pub delivery_status: &'static str,
    pub note: &'static str,
    pub warning: &'static str,
    pub integration_status: SmsIntegrationStatus,
    pub sent_data: SentData,
}
