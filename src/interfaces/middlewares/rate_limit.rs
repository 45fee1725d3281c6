use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web, Error, ResponseError,
};
use chrono::Utc;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    entities::rate_limit::{RateLimitDecision, RateLimitPolicy},
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Fixed-window limit for one route, keyed by client IP.
///
/// Wrap it around a resource: `web::resource("/contact").wrap(RateLimit::new(CONTACT_POLICY))`.
#[derive(Clone, Copy)]
pub struct RateLimit {
    policy: RateLimitPolicy,
}

impl RateLimit {
    pub fn new(policy: RateLimitPolicy) -> Self {
        RateLimit { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitService {
            service: Rc::new(service),
            policy: self.policy,
        })
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    policy: RateLimitPolicy,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = self.policy;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in rate limit middleware");
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            };

            let client_ip = get_client_ip(req.request(), state.config.trust_forwarded_headers);
            let key = policy.key_for(&client_ip);

            let decision = match state.rate_limiter.check(&key, &policy).await {
                Ok(decision) => decision,
                Err(e) => {
                    tracing::warn!(key = %key, "Rate limiter unavailable, admitting request: {}", e);
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
            };

            if !decision.allowed {
                tracing::warn!(scope = policy.scope, ip = %client_ip, "Rate limit exceeded");
                let err = AppError::RateLimited {
                    message: policy.message,
                    security_note: policy.security_note,
                    limit: decision.limit,
                    reset_epoch_secs: decision.reset_epoch_secs(),
                    retry_after_secs: decision.retry_after_secs(Utc::now()),
                };
                return Ok(req.into_response(err.error_response()).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            append_headers(&mut res, &decision);
            Ok(res.map_into_left_body())
        })
    }
}

fn append_headers<B>(res: &mut ServiceResponse<B>, decision: &RateLimitDecision) {
    let headers = res.headers_mut();
    headers.insert(LIMIT, HeaderValue::from(decision.limit));
    headers.insert(REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RESET, HeaderValue::from(decision.reset_epoch_secs()));
}
