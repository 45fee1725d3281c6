use actix_web::web;

use crate::{
    entities::rate_limit::ADMIN_SCRAPE_POLICY,
    handlers::{admin::admin_scrape, responses::reject_other_methods},
    middlewares::rate_limit::RateLimit,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").service(
            web::resource("/scrape")
                .wrap(RateLimit::new(ADMIN_SCRAPE_POLICY))
                .route(web::post().to(admin_scrape))
                .default_service(reject_other_methods(
                    "POST",
                    "Admin scrape endpoint only supports POST requests",
                )),
        ),
    );
}
