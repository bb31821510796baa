use actix_multipart::Multipart;
use actix_web::{
    delete, error::ResponseError, get, http::StatusCode, post, web, Error, HttpResponse, Responder,
};
use futures_util::StreamExt as _;

use crate::{
    handlers::json_error::json_error, use_cases::extractors::AuthClaims,
    utils::valid_uuid::valid_uuid, AppState,
};

/// Accepts a multipart upload carrying one `file` field. The body is drained
/// up to the configured cap; anything larger is rejected before it reaches
/// the disk.
#[post("")]
pub async fn upload_file(
    state: web::Data<AppState>,
    claims: AuthClaims,
    mut payload: Multipart,
) -> Result<impl Responder, Error> {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    let max_bytes = state.config.max_upload_bytes;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > max_bytes {
                return Ok(json_error(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "File too large",
                    &format!("Uploads are capped at {} MiB", max_bytes / (1024 * 1024)),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(match state.upload_handler.store(user_id, &filename, &bytes).await {
            Ok(response) => HttpResponse::Created().json(response),
            Err(e) => e.to_http_response(),
        });
    }

    Ok(json_error(
        StatusCode::BAD_REQUEST,
        "Missing file",
        "Send the upload in a multipart field named 'file'",
    ))
}

#[get("")]
pub async fn list_uploads(state: web::Data<AppState>, claims: AuthClaims) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.upload_handler.list(user_id).await {
        Ok(uploads) => HttpResponse::Ok().json(uploads),
        Err(e) => e.to_http_response(),
    }
}

#[get("/{id}")]
pub async fn download_upload(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };
    let id = match valid_uuid(&id) {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.upload_handler.download(user_id, &id).await {
        Ok(file) => HttpResponse::Ok()
            .content_type(file.mime)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.filename),
            ))
            .body(file.bytes),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/{id}")]
pub async fn delete_upload(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };
    let id = match valid_uuid(&id) {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.upload_handler.delete(user_id, &id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_http_response(),
    }
}
