use actix_web::web;

use crate::handlers::{contact, settings};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(settings::get_settings)
            .service(settings::update_settings)
            .service(contact::list_contact_messages)
            .service(contact::resolve_contact_message),
    );
}
