use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use redis::{AsyncCommands, Client as RedisClient, RedisResult};

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod render;
pub mod settings;

pub use domain::{entities, password, use_cases};
pub use infrastructure::{auth, db, limiter, mail, storage, utils};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::jwt::JwtService;
use limiter::rate_limiter::RateLimiterStore;
use mail::Mailer;
use render::template::TemplateRenderer;
use repositories::sqlx_repo::{
    SqlxContactRepo, SqlxRatingRepo, SqlxResumeRepo, SqlxSettingsRepo, SqlxUploadRepo,
    SqlxUserRepo,
};
use settings::AppConfig;
use storage::artifacts::ArtifactStore;
use use_cases::{
    auth::AuthHandler,
    meta::{ContactHandler, RatingHandler, SettingsHandler},
    resume::ResumeHandler,
    uploads::UploadHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppResumeHandler = ResumeHandler<SqlxResumeRepo>;
pub type AppUploadHandler = UploadHandler<SqlxUploadRepo>;
pub type AppContactHandler = ContactHandler<SqlxContactRepo, SqlxSettingsRepo>;
pub type AppRatingHandler = RatingHandler<SqlxRatingRepo>;
pub type AppSettingsHandler = SettingsHandler<SqlxSettingsRepo>;

// Burst and refill for the per-IP throttle on anonymous contact/rating posts.
const RATE_LIMIT_BURST: f64 = 3.0;
const RATE_LIMIT_REFILL_PER_SEC: f64 = 1.0 / 30.0;
const RATE_LIMIT_BUCKET_TTL: Duration = Duration::from_secs(60 * 60);

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub resume_handler: AppResumeHandler,
    pub upload_handler: AppUploadHandler,
    pub contact_handler: AppContactHandler,
    pub rating_handler: AppRatingHandler,
    pub settings_handler: AppSettingsHandler,
    pub artifacts: ArtifactStore,
    pub limiter: RateLimiterStore,
    pub redis_client: Option<RedisClient>,
    pub config: AppConfig,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        let jwt_service = JwtService::new(config);

        let mailer = match Mailer::from_config(config) {
            Some(Ok(mailer)) => Some(mailer),
            Some(Err(e)) => {
                tracing::warn!("Mail transport unavailable, continuing without mail: {}", e);
                None
            }
            None => None,
        };

        let templates = Arc::new(
            TemplateRenderer::new(&config.template_dir)
                .map_err(|e| anyhow::anyhow!("Failed to load templates from {}: {}", config.template_dir, e))?,
        );
        let artifacts = ArtifactStore::new(&config.resume_dir)
            .with_context(|| format!("Failed to prepare resume dir {}", config.resume_dir))?;

        let auth_handler = AuthHandler::new(
            SqlxUserRepo::new(pool.clone()),
            jwt_service,
            mailer.clone(),
            config.base_url.clone(),
        );
        let resume_handler = ResumeHandler::new(
            SqlxResumeRepo::new(pool.clone()),
            templates,
            artifacts.clone(),
        );
        let upload_handler = UploadHandler::new(
            SqlxUploadRepo::new(pool.clone()),
            &config.upload_dir,
            config.max_upload_bytes,
        )
        .with_context(|| format!("Failed to prepare upload dir {}", config.upload_dir))?;
        let contact_handler = ContactHandler::new(
            SqlxContactRepo::new(pool.clone()),
            SqlxSettingsRepo::new(pool.clone()),
            mailer,
        );
        let rating_handler = RatingHandler::new(SqlxRatingRepo::new(pool.clone()));
        let settings_handler = SettingsHandler::new(SqlxSettingsRepo::new(pool));

        let redis_client = config.redis_url.as_ref().and_then(|url| {
            RedisClient::open(url.as_str())
                .map_err(|e| tracing::error!("Redis connection error: {}", e))
                .ok()
        });

        Ok(AppState {
            auth_handler,
            resume_handler,
            upload_handler,
            contact_handler,
            rating_handler,
            settings_handler,
            artifacts,
            limiter: RateLimiterStore::new(
                RATE_LIMIT_BURST,
                RATE_LIMIT_REFILL_PER_SEC,
                RATE_LIMIT_BUCKET_TTL,
            ),
            redis_client,
            trust_forwarded_for: config.is_production(),
            config: config.clone(),
        })
    }

    /// Increments a windowed redis counter, setting the TTL on first use.
    /// Without redis (or when redis is down) this degrades to 0 so the
    /// feature it guards keeps working.
    pub async fn redis_incr_with_ttl(&self, key: &str, ttl_secs: u64) -> u32 {
        let Some(client) = &self.redis_client else {
            return 0;
        };
        let mut conn = match client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis unavailable for counter {}: {}", key, e);
                return 0;
            }
        };

        match conn.incr::<_, _, u32>(key, 1).await {
            Ok(count) => {
                if count == 1 {
                    if let Err(e) = conn.expire::<_, ()>(key, ttl_secs as i64).await {
                        tracing::warn!("Failed to set TTL on {}: {}", key, e);
                    }
                }
                count
            }
            Err(e) => {
                tracing::warn!("Redis counter {} failed: {}", key, e);
                0
            }
        }
    }

    pub async fn deny_access_token(&self, token: &str, ttl_secs: u64) {
        self.deny_key(&format!("access_deny:{}", token), ttl_secs).await;
    }

    pub async fn deny_refresh_token(&self, token: &str, ttl_secs: u64) {
        self.deny_key(&format!("refresh_deny:{}", token), ttl_secs).await;
    }

    pub async fn is_token_denied(&self, token: &str) -> bool {
        self.key_exists(&format!("access_deny:{}", token)).await
    }

    pub async fn is_refresh_token_denied(&self, token: &str) -> bool {
        self.key_exists(&format!("refresh_deny:{}", token)).await
    }

    async fn deny_key(&self, key: &str, ttl_secs: u64) {
        let Some(client) = &self.redis_client else {
            return;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: RedisResult<()> = conn.set_ex(key, 1, ttl_secs).await;
                if let Err(e) = result {
                    tracing::warn!("Failed to revoke token: {}", e);
                }
            }
            Err(e) => tracing::warn!("Redis unavailable for token revocation: {}", e),
        }
    }

    async fn key_exists(&self, key: &str) -> bool {
        let Some(client) = &self.redis_client else {
            return false;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => conn.exists::<_, bool>(key).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
