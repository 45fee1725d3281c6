use actix_web::{http::StatusCode, web, HttpResponse, Route};
use serde::Serialize;

use crate::errors::{AppError, MOCK_HEADER};

/// JSON body flagged as simulated through the `X-Mock` header.
pub fn mock_json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((MOCK_HEADER, "true"))
        .json(body)
}

/// Catch-all route for a resource: anything that did not match its method
/// guards gets a 405 naming the allowed method.
pub fn reject_other_methods(allow: &'static str, message: &'static str) -> Route {
    web::route().to(move || async move { Err::<HttpResponse, AppError>(AppError::MethodNotAllowed { allow, message }) })
}
