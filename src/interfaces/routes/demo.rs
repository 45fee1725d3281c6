use actix_web::web;

use crate::{
    entities::rate_limit::{GMAPS_DEMO_POLICY, TRADE_DEMO_POLICY},
    handlers::{
        demo::{gmaps_search, trade_report},
        responses::reject_other_methods,
    },
    middlewares::rate_limit::RateLimit,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/demo")
            .service(
                web::resource("/gmaps-search")
                    .wrap(RateLimit::new(GMAPS_DEMO_POLICY))
                    .route(web::get().to(gmaps_search))
                    .default_service(reject_other_methods("GET", "Chỉ hỗ trợ GET request")),
            )
            .service(
                web::resource("/trade-report")
                    .wrap(RateLimit::new(TRADE_DEMO_POLICY))
                    .route(web::get().to(trade_report))
                    .default_service(reject_other_methods("GET", "Chỉ hỗ trợ GET request")),
            ),
    );
}
