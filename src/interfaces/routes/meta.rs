use actix_web::web;

use crate::handlers::{contact, ratings, settings};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(contact::create_contact_message)
        .service(ratings::create_rating)
        .service(ratings::rating_summary)
        .service(settings::privacy_policy)
        .service(settings::premium_policy);
}
