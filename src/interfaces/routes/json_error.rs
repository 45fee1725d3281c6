use actix_web::{web, error::{JsonPayloadError, QueryPayloadError}};

use crate::errors::AppError;

/// Undecodable bodies and query strings become 400s in the usual error shape.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        tracing::debug!("Rejected JSON body: {}", err);
        AppError::MalformedBody(format!("JSON payload error: {}", err)).into()
    }));

    cfg.app_data(web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        AppError::MalformedBody(format!("Query string error: {}", err)).into()
    }));
}
