use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactMessage, ContactMessageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError>;
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_contact_messages(&self) -> Result<i64, AppError>;
    async fn resolve_contact_message(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO contact_messages (name, email, message, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, message, resolved, created_at FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn resolve_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE contact_messages SET resolved = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Contact message not found".into()))
        } else {
            Ok(())
        }
    }
}
