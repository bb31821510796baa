use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NewContactMessage {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 5, max = 2000))]
    pub message: String,
}

#[derive(Debug)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewContactMessage> for ContactMessageInsert {
    fn from(form: NewContactMessage) -> Self {
        ContactMessageInsert {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            message: form.message.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
}
