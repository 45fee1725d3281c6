use actix_web::web;

use crate::{
    entities::rate_limit::CONTACT_POLICY,
    handlers::{contact::submit_contact, responses::reject_other_methods},
    middlewares::rate_limit::RateLimit,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .wrap(RateLimit::new(CONTACT_POLICY))
            .route(web::post().to(submit_contact))
            .default_service(reject_other_methods("POST", "Contact form chỉ hỗ trợ POST request")),
    );
}
