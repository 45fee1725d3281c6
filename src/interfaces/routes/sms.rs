use actix_web::web;

use crate::{
    entities::rate_limit::SMS_POLICY,
    handlers::{responses::reject_other_methods, sms::send_sms},
    middlewares::rate_limit::RateLimit,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sms")
            .wrap(RateLimit::new(SMS_POLICY))
            .route(web::post().to(send_sms))
            .default_service(reject_other_methods("POST", "SMS API chỉ hỗ trợ POST request")),
    );
}
