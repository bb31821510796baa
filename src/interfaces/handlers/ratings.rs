use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    entities::rating::NewRating, handlers::contact::too_many_requests,
    utils::get_client_ip::get_client_ip, AppState,
};

/// Public rating submission, throttled per client IP.
#[post("/ratings")]
pub async fn create_rating(
    request: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewRating>,
) -> impl Responder {
    let client_ip = get_client_ip(&request, state.trust_forwarded_for);
    if let Err(retry_after) = state.limiter.check(&client_ip) {
        return too_many_requests(retry_after);
    }

    match state.rating_handler.create(form.into_inner()).await {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(e) => e.to_http_response(),
    }
}

#[get("/ratings/summary")]
pub async fn rating_summary(state: web::Data<AppState>) -> impl Responder {
    match state.rating_handler.summary().await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => e.to_http_response(),
    }
}
