use actix_web::{get, put, web, HttpResponse, Responder};

use crate::{
    entities::app_settings::UpdateAppSettings, use_cases::extractors::AdminClaims, AppState,
};

#[get("/settings")]
pub async fn get_settings(state: web::Data<AppState>, _admin: AdminClaims) -> impl Responder {
    match state.settings_handler.get().await {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => e.to_http_response(),
    }
}

#[put("/settings")]
pub async fn update_settings(
    state: web::Data<AppState>,
    _admin: AdminClaims,
    update: web::Json<UpdateAppSettings>,
) -> impl Responder {
    match state.settings_handler.update(update.into_inner()).await {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => e.to_http_response(),
    }
}

/// Public policy pages, stored as markdown and served as sanitized HTML.
#[get("/policies/privacy")]
pub async fn privacy_policy(state: web::Data<AppState>) -> impl Responder {
    match state.settings_handler.privacy_policy().await {
        Ok(policy) => HttpResponse::Ok().json(policy),
        Err(e) => e.to_http_response(),
    }
}

#[get("/policies/premium")]
pub async fn premium_policy(state: web::Data<AppState>) -> impl Responder {
    match state.settings_handler.premium_policy().await {
        Ok(policy) => HttpResponse::Ok().json(policy),
        Err(e) => e.to_http_response(),
    }
}
