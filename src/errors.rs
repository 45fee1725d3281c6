use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse, HttpResponseBuilder,
};
use derive_more::Display;
use serde_json::json;

use crate::{constants, validation::ValidationFailure};

pub const MOCK_HEADER: &str = "X-Mock";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

#[derive(Debug)]
pub enum AppError {
    RateLimited {
        message: &'static str,
        security_note: Option<&'static str>,
        limit: u32,
        reset_epoch_secs: i64,
        retry_after_secs: u64,
    },
    Validation(ValidationFailure),
    MalformedBody(String),
    MethodNotAllowed {
        allow: &'static str,
        message: &'static str,
    },
    Unauthorized(String),
    FeatureDisabled(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RateLimited { .. } => write!(f, "Too many requests"),
            AppError::Validation(failure) => write!(f, "{}", failure),
            AppError::MalformedBody(_) => write!(f, "Invalid request body"),
            AppError::MethodNotAllowed { .. } => write!(f, "Method not allowed"),
            AppError::Unauthorized(_) => write!(f, "Unauthorized"),
            AppError::FeatureDisabled(_) => write!(f, "Scraping disabled"),
            AppError::InternalError(_) => write!(f, "Internal server error"),
        }
    }
}

impl AppError {
    fn user_message(&self) -> &str {
        match self {
            AppError::RateLimited { message, .. } => message,
            AppError::Validation(failure) => failure.message(),
            AppError::MalformedBody(_) => "Nội dung yêu cầu không phải JSON hợp lệ",
            AppError::MethodNotAllowed { message, .. } => message,
            AppError::Unauthorized(msg) => msg,
            AppError::FeatureDisabled(msg) => msg,
            AppError::InternalError(_) => "Đã xảy ra lỗi. Vui lòng thử lại sau.",
        }
    }

    /// Diagnostic text that is only echoed back outside production-like envs.
    fn details(&self) -> Option<&str> {
        match self {
            AppError::MalformedBody(detail) | AppError::InternalError(detail) => Some(detail),
            _ => None,
        }
    }

    /// Operator-facing fields some admin responses carry beside the usual ones.
    fn annotate(&self, body: &mut serde_json::Value) {
        match self {
            AppError::RateLimited { security_note: Some(note), .. } => {
                body["security_note"] = json!(note);
            }
            AppError::Unauthorized(_) => {
                body["security_note"] = json!("Access attempt logged");
            }
            AppError::FeatureDisabled(_) => {
                body["how_to_enable"] = json!({
                    "step_1": "Set ENABLE_SCRAPING=true in environment variables",
                    "step_2": "Ensure you have permission to scrape target websites",
                    "step_3": "Review and comply with robots.txt and Terms of Service",
                    "step_4": "Implement proper rate limiting and respectful scraping practices",
                });
                body["legal_warning"] =
                    json!("⚠️ Web scraping may violate Terms of Service. Only scrape with explicit permission.");
                body["current_status"] = json!({
                    "scraping_enabled": false,
                    "admin_authenticated": true,
                    "environment_check": "ENABLE_SCRAPING not set to true",
                });
            }
            _ => {}
        }
    }

    fn apply_headers(&self, builder: &mut HttpResponseBuilder) {
        builder.insert_header((MOCK_HEADER, "true"));

        match self {
            AppError::RateLimited { limit, reset_epoch_secs, retry_after_secs, .. } => {
                builder
                    .insert_header((RATE_LIMIT_LIMIT_HEADER, limit.to_string()))
                    .insert_header((RATE_LIMIT_REMAINING_HEADER, "0"))
                    .insert_header((RATE_LIMIT_RESET_HEADER, reset_epoch_secs.to_string()))
                    .insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
            }
            AppError::MethodNotAllowed { allow, .. } => {
                builder.insert_header((header::ALLOW, *allow));
            }
            _ => {}
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalError(detail) = self {
            tracing::error!("Unhandled error at handler boundary: {}", detail);
        }

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "message": self.user_message(),
            "mock": true,
        });
        self.annotate(&mut body);

        if constants::expose_error_details() {
            if let Some(details) = self.details() {
                body["details"] = json!(details);
            }
        }

        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());
        self.apply_headers(&mut builder);
        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::FeatureDisabled(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Validation(failure)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("Serialization error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Failures of the contact stores. These never reach the visitor; the
/// fallback chain logs them and moves on.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display("Remote store not configured")]
    NotConfigured,

    #[display("Database error: {_0}")]
    Database(String),

    #[display("IO error: {_0}")]
    Io(String),

    #[display("Serialization error: {_0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum RelayError {
    #[display("Relay request timed out")]
    Timeout,

    #[display("Relay answered with status {_0}")]
    Status(u16),

    #[display("Relay transport error: {_0}")]
    Transport(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else if let Some(status) = err.status() {
            RelayError::Status(status.as_u16())
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Display)]
pub enum LimiterError {
    #[display("Rate limiter backend unavailable: {_0}")]
    Backend(String),
}

impl From<redis::RedisError> for LimiterError {
    fn from(err: redis::RedisError) -> Self {
        LimiterError::Backend(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for LimiterError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        LimiterError::Backend(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum CatalogError {
    #[display("Projects data not found: {_0}")]
    Missing(String),

    #[display("Projects data is corrupt: {_0}")]
    Corrupt(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
