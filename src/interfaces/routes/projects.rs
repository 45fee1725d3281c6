use actix_web::web;

use crate::{
    entities::rate_limit::PROJECTS_POLICY,
    handlers::{projects::list_projects, responses::reject_other_methods},
    middlewares::rate_limit::RateLimit,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .wrap(RateLimit::new(PROJECTS_POLICY))
            .route(web::get().to(list_projects))
            .default_service(reject_other_methods("GET", "Projects API chỉ hỗ trợ GET request")),
    );
}
