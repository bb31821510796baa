use actix_web::web;

use crate::handlers::json_error;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::route().to(json_error::not_found));
}
