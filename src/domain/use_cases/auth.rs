use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, NewUser, NewUserResponse, User};
use crate::errors::{AppError, AuthError};
use crate::infrastructure::auth::password::{hash_password, verify_password};
use crate::infrastructure::mail::Mailer;
use crate::interfaces::repositories::user::UserRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
    mailer: Option<Mailer>,
    base_url: String,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T, mailer: Option<Mailer>, base_url: String) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            mailer,
            base_url,
        }
    }

    /// Registers a new user after validation and password hashing, then
    /// mails a verification link. A mail failure downgrades to a warning;
    /// the account still exists and the link can be resent.
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.user_repo.user_exists(&email).await? {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);
        let user_id = self.user_repo.create_user(&user_insert).await?;

        self.send_verification_email(&user_id, &email).await;

        Ok(NewUserResponse {
            id: user_id,
            message: "Registered successfully. A verification email has been sent.".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let user = self.user_repo.get_user_by_email(&email)
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!("User logged in successfully");
        Ok(response)
    }

    /// Create auth response
    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Refreshes the access token using the refresh token
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    /// Confirms an email-verification link token and marks the user verified.
    pub async fn verify_email(&self, token: &str) -> Result<String, AppError> {
        let decoded = self
            .token_service
            .decode_verification_jwt(token)
            .map_err(|_| AppError::InvalidInput("Verification link is invalid or expired".into()))?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::InvalidInput("Verification link is invalid or expired".into()))?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found or invalid token".into()))?;

        if user.is_verified {
            return Ok("Account already verified. Please login!".to_string());
        }

        self.user_repo.mark_verified(&user.id).await?;
        Ok("Your account has been verified. You can now login!".to_string())
    }

    /// Re-sends the verification link for a logged-in, unverified user.
    pub async fn resend_verification(&self, user_id: &Uuid) -> Result<String, AppError> {
        let user = self.user_repo.get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if user.is_verified {
            return Ok("Account already verified.".to_string());
        }

        self.send_verification_email(&user.id, &user.email).await;
        Ok("A new verification email has been sent.".to_string())
    }

    async fn send_verification_email(&self, user_id: &Uuid, email: &str) {
        let token = match self.token_service.create_verification_jwt(user_id) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to create verification token: {}", e);
                return;
            }
        };
        let verify_url = format!("{}/api/v1/auth/verify/{}", self.base_url, token);

        match &self.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send_verification(email, &verify_url).await {
                    tracing::warn!("Failed to send verification email: {}", e);
                }
            }
            None => {
                tracing::info!("Mail not configured; verification link: {}", verify_url);
            }
        }
    }
}
