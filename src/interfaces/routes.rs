use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod admin;
mod contact;
mod demo;
mod json_error;
mod projects;
mod sms;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(contact::config_routes)
            .configure(projects::config_routes)
            .configure(sms::config_routes)
            .configure(admin::config_routes)
            .configure(demo::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
