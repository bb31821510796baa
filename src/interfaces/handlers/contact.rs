use actix_web::{get, http::StatusCode, patch, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    entities::contact::NewContactMessage,
    handlers::json_error::json_error,
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const EMAIL_LIMIT: u32 = 2;
const EMAIL_WINDOW_SECS: u64 = 3600;

/// Public contact form. Throttled twice: per client IP through the in-process
/// token bucket, and per sender email through a redis window so one address
/// cannot flood from many hosts.
#[post("/contact")]
pub async fn create_contact_message(
    request: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewContactMessage>,
) -> impl Responder {
    let client_ip = get_client_ip(&request, state.trust_forwarded_for);
    if let Err(retry_after) = state.limiter.check(&client_ip) {
        return too_many_requests(retry_after);
    }

    // Normalize and URL-encode the address to keep the redis key safe.
    let email_norm = form.email.trim().to_lowercase();
    let email_key = format!("rl:email:{}", urlencoding::encode(&email_norm));
    let email_count = state.redis_incr_with_ttl(&email_key, EMAIL_WINDOW_SECS).await;
    if email_count > EMAIL_LIMIT {
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many messages",
            "Too many messages from this email address. Please try again later.",
        );
    }

    match state.contact_handler.create(form.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("/contact-messages")]
pub async fn list_contact_messages(
    state: web::Data<AppState>,
    _admin: AdminClaims,
) -> impl Responder {
    match state.contact_handler.list().await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[patch("/contact-messages/{id}/resolve")]
pub async fn resolve_contact_message(
    state: web::Data<AppState>,
    _admin: AdminClaims,
    id: web::Path<String>,
) -> impl Responder {
    match state.contact_handler.resolve(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"message": "Message resolved"})),
        Err(e) => e.to_http_response(),
    }
}

pub fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(serde_json::json!({
            "error": "Too many requests. Please slow down.",
            "retry_after_seconds": retry_after
        }))
}
