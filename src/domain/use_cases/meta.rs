use validator::Validate;

use crate::{
    entities::{
        app_settings::{AppSettings, PolicyResponse, UpdateAppSettings},
        contact::{
            ContactMessageInsert, ContactMessageListResponse, ContactMessageResponse,
            NewContactMessage,
        },
        rating::{NewRating, RatingInsert, RatingSummary},
    },
    errors::AppError,
    infrastructure::mail::Mailer,
    repositories::{
        contact::ContactRepository, rating::RatingRepository, settings::SettingsRepository,
    },
    utils::valid_uuid::valid_uuid,
};

// ───── Contact form ─────────────────────────────────────────────────

pub struct ContactHandler<C, S>
where
    C: ContactRepository,
    S: SettingsRepository,
{
    pub contact_repo: C,
    settings_repo: S,
    mailer: Option<Mailer>,
}

impl<C, S> ContactHandler<C, S>
where
    C: ContactRepository,
    S: SettingsRepository,
{
    pub fn new(contact_repo: C, settings_repo: S, mailer: Option<Mailer>) -> Self {
        ContactHandler {
            contact_repo,
            settings_repo,
            mailer,
        }
    }

    /// Stores a validated contact message, then attempts the admin
    /// notification email. A mail failure downgrades to a warning; the
    /// message is stored either way.
    pub async fn create(&self, form: NewContactMessage) -> Result<ContactMessageResponse, AppError> {
        form.validate()?;

        let insert = ContactMessageInsert::from(form);
        let id = self.contact_repo.create_contact_message(&insert).await?;

        self.notify_admin(&insert).await;

        Ok(ContactMessageResponse {
            id,
            message: "Thanks for reaching out! We'll get back to you soon.".to_string(),
        })
    }

    async fn notify_admin(&self, msg: &ContactMessageInsert) {
        let Some(mailer) = &self.mailer else {
            return;
        };

        let settings = match self.settings_repo.get_settings().await {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not load settings for contact notification: {}", e);
                return;
            }
        };
        if !settings.email_notifications {
            return;
        }
        let Some(contact_email) = settings.contact_email else {
            return;
        };

        if let Err(e) = mailer
            .send_contact_notification(&contact_email, &msg.name, &msg.email, &msg.message)
            .await
        {
            tracing::warn!("Contact notification email failed: {}", e);
        }
    }

    pub async fn list(&self) -> Result<ContactMessageListResponse, AppError> {
        let messages = self.contact_repo.list_contact_messages().await?;
        let total = self.contact_repo.count_contact_messages().await?;
        Ok(ContactMessageListResponse { messages, total })
    }

    pub async fn resolve(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.contact_repo.resolve_contact_message(&id).await
    }
}

// ───── Ratings ──────────────────────────────────────────────────────

pub struct RatingHandler<R>
where
    R: RatingRepository,
{
    pub rating_repo: R,
}

impl<R> RatingHandler<R>
where
    R: RatingRepository,
{
    pub fn new(rating_repo: R) -> Self {
        RatingHandler { rating_repo }
    }

    pub async fn create(&self, form: NewRating) -> Result<RatingSummary, AppError> {
        form.validate()?;
        self.rating_repo.create_rating(&RatingInsert::from(form)).await?;
        self.rating_repo.rating_summary().await
    }

    pub async fn summary(&self) -> Result<RatingSummary, AppError> {
        self.rating_repo.rating_summary().await
    }
}

// ───── Application settings ─────────────────────────────────────────

pub struct SettingsHandler<S>
where
    S: SettingsRepository,
{
    pub settings_repo: S,
}

impl<S> SettingsHandler<S>
where
    S: SettingsRepository,
{
    pub fn new(settings_repo: S) -> Self {
        SettingsHandler { settings_repo }
    }

    /// Current settings, or the defaults when the row has never been written.
    pub async fn get(&self) -> Result<AppSettings, AppError> {
        Ok(self.settings_repo.get_settings().await?.unwrap_or_default())
    }

    pub async fn update(&self, update: UpdateAppSettings) -> Result<AppSettings, AppError> {
        update.validate()?;
        self.settings_repo.upsert_settings(&update).await
    }

    /// Privacy policy markdown rendered as sanitized HTML.
    pub async fn privacy_policy(&self) -> Result<PolicyResponse, AppError> {
        let settings = self.get().await?;
        Ok(PolicyResponse::from_markdown(
            settings.privacy_policy.as_deref(),
            settings.updated_at,
        ))
    }

    pub async fn premium_policy(&self) -> Result<PolicyResponse, AppError> {
        let settings = self.get().await?;
        Ok(PolicyResponse::from_markdown(
            settings.premium_policy.as_deref(),
            settings.updated_at,
        ))
    }
}
