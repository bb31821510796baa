use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::markdown::safe_markdown_to_html;

/// Single-row application settings, editable by admins.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AppSettings {
    pub id: i16,
    pub email_notifications: bool,
    pub contact_email: Option<String>,
    pub privacy_policy: Option<String>,
    pub premium_policy: Option<String>,
    pub share_button: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            id: 1,
            email_notifications: true,
            contact_email: None,
            privacy_policy: None,
            premium_policy: None,
            share_button: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAppSettings {
    pub email_notifications: bool,

    #[validate(email)]
    pub contact_email: Option<String>,

    pub privacy_policy: Option<String>,
    pub premium_policy: Option<String>,
    pub share_button: Option<String>,
}

/// Policy text is stored as markdown and served as sanitized HTML.
#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub content_html: String,
    pub updated_at: DateTime<Utc>,
}

impl PolicyResponse {
    pub fn from_markdown(markdown: Option<&str>, updated_at: DateTime<Utc>) -> Self {
        PolicyResponse {
            content_html: markdown.map(safe_markdown_to_html).unwrap_or_default(),
            updated_at,
        }
    }
}
