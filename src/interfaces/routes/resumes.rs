use actix_web::web;

use crate::handlers::resumes;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    // Literal paths must be registered before the `{id}` matchers.
    cfg.service(
        web::scope("/resumes")
            .service(resumes::preview)
            .service(resumes::list_templates)
            .service(resumes::create_resume)
            .service(resumes::list_resumes)
            .service(resumes::view_resume)
            .service(resumes::download_resume)
            .service(resumes::get_resume)
            .service(resumes::update_resume)
            .service(resumes::delete_resume),
    );
}
