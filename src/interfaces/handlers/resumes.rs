use actix_web::{delete, error::ResponseError, get, post, put, web, HttpResponse, Responder};

use crate::{
    entities::resume::DownloadFile, render::form::RawForm, use_cases::extractors::AuthClaims,
    AppState,
};

#[post("/preview")]
pub async fn preview(
    state: web::Data<AppState>,
    _claims: AuthClaims,
    form: web::Json<RawForm>,
) -> impl Responder {
    match state.resume_handler.preview(&form) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("")]
pub async fn create_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    form: web::Json<RawForm>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.save(user_id, &form).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("")]
pub async fn list_resumes(state: web::Data<AppState>, claims: AuthClaims) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.list_resumes(user_id).await {
        Ok(resumes) => HttpResponse::Ok().json(resumes),
        Err(e) => e.to_http_response(),
    }
}

#[get("/templates")]
pub async fn list_templates(state: web::Data<AppState>, _claims: AuthClaims) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "templates": state.resume_handler.available_templates()
    }))
}

#[get("/{id}")]
pub async fn get_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.get_resume(user_id, &id).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => e.to_http_response(),
    }
}

/// Serves the stored snapshot re-rendered into its template, for on-screen
/// viewing.
#[get("/{id}/view")]
pub async fn view_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.render_stored(user_id, &id).await {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => e.to_http_response(),
    }
}

#[put("/{id}")]
pub async fn update_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
    form: web::Json<RawForm>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.update(user_id, &id, &form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/{id}")]
pub async fn delete_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.delete(user_id, &id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_http_response(),
    }
}

/// Serves the stored snapshot in the requested format as a file attachment.
#[get("/{id}/download/{format}")]
pub async fn download_resume(
    state: web::Data<AppState>,
    claims: AuthClaims,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };
    let (id, format) = path.into_inner();

    match state.resume_handler.download(user_id, &id, &format).await {
        Ok(file) => attachment(file),
        Err(e) => e.to_http_response(),
    }
}

fn attachment(file: DownloadFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.mime)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.bytes)
}
