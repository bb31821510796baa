use async_trait::async_trait;
use chrono::Utc;

use crate::{
    entities::app_settings::{AppSettings, UpdateAppSettings},
    errors::AppError,
    repositories::sqlx_repo::SqlxSettingsRepo,
};

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_settings(&self) -> Result<Option<AppSettings>, AppError>;
    async fn upsert_settings(&self, update: &UpdateAppSettings) -> Result<AppSettings, AppError>;
}

impl SqlxSettingsRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSettingsRepo { pool }
    }
}

const SETTINGS_COLUMNS: &str =
    "id, email_notifications, contact_email, privacy_policy, premium_policy, share_button, updated_at";

#[async_trait]
impl SettingsRepository for SqlxSettingsRepo {
    async fn get_settings(&self) -> Result<Option<AppSettings>, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM app_settings WHERE id = 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn upsert_settings(&self, update: &UpdateAppSettings) -> Result<AppSettings, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(&format!(
            r#"
            INSERT INTO app_settings (id, email_notifications, contact_email, privacy_policy, premium_policy, share_button, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                email_notifications = EXCLUDED.email_notifications,
                contact_email = EXCLUDED.contact_email,
                privacy_policy = EXCLUDED.privacy_policy,
                premium_policy = EXCLUDED.premium_policy,
                share_button = EXCLUDED.share_button,
                updated_at = EXCLUDED.updated_at
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(update.email_notifications)
        .bind(&update.contact_email)
        .bind(&update.privacy_policy)
        .bind(&update.premium_policy)
        .bind(&update.share_button)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
