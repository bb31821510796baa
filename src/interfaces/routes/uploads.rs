use actix_web::web;

use crate::handlers::uploads;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/uploads")
            .service(uploads::upload_file)
            .service(uploads::list_uploads)
            .service(uploads::download_upload)
            .service(uploads::delete_upload),
    );
}
