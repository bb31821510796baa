use actix_web::{
    error::ResponseError, get, http::StatusCode, post, web, HttpRequest, HttpResponse, Responder,
};
use chrono::Utc;

use crate::{
    entities::token::RefreshTokenRequest,
    entities::user::{LoginUser, LogoutRequest, NewUser},
    handlers::json_error::json_error,
    repositories::token::TokenServiceRepository,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[post("/register")]
pub async fn register(state: web::Data<AppState>, user: web::Json<NewUser>) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
pub async fn login(state: web::Data<AppState>, user: web::Json<LoginUser>) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> impl Responder {
    if state.is_refresh_token_denied(&request.refresh_token).await {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Refresh token has been revoked",
        );
    }

    match state.auth_handler.refresh_token(&request.refresh_token).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

/// Revokes the current access token and the submitted refresh token until
/// they would have expired anyway. Without redis the revocation degrades to
/// a no-op and the tokens simply age out.
#[post("/logout")]
pub async fn logout(
    request: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>,
) -> impl Responder {
    let Some(access_token) = bearer_token(&request) else {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Missing access token in Authorization header",
        );
    };

    if let Ok(decoded) = state.auth_handler.token_service.decode_jwt(&access_token) {
        state
            .deny_access_token(&access_token, seconds_until(decoded.claims.exp))
            .await;
    }
    if let Ok(decoded) = state
        .auth_handler
        .token_service
        .decode_refresh_jwt(&body.refresh_token)
    {
        state
            .deny_refresh_token(&body.refresh_token, seconds_until(decoded.claims.exp))
            .await;
    }

    HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"}))
}

#[get("/verify/{token}")]
pub async fn verify_email(state: web::Data<AppState>, token: web::Path<String>) -> impl Responder {
    match state.auth_handler.verify_email(&token).await {
        Ok(message) => HttpResponse::Ok().json(serde_json::json!({"message": message})),
        Err(e) => e.to_http_response(),
    }
}

#[post("/resend-verification")]
pub async fn resend_verification(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.auth_handler.resend_verification(&user_id).await {
        Ok(message) => HttpResponse::Ok().json(serde_json::json!({"message": message})),
        Err(e) => e.to_http_response(),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn seconds_until(exp: usize) -> u64 {
    (exp as i64 - Utc::now().timestamp()).max(1) as u64
}
