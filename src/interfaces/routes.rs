use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod admin;
mod auth;
mod json_error;
mod meta;
mod resumes;
mod uploads;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(resumes::config_routes)
            .configure(uploads::config_routes)
            .configure(meta::config_routes)
            .configure(admin::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
