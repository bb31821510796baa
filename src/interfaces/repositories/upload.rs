use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::upload::{UploadedFile, UploadedFileInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxUploadRepo,
};

#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create_upload(&self, upload: &UploadedFileInsert) -> Result<Uuid, AppError>;
    async fn get_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<UploadedFile>, AppError>;
    async fn list_uploads(&self, user_id: &Uuid) -> Result<Vec<UploadedFile>, AppError>;
    /// Deletes the row and hands back the stored file path for disk cleanup.
    async fn delete_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<String, AppError>;
}

impl SqlxUploadRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUploadRepo { pool }
    }
}

#[async_trait]
impl UploadRepository for SqlxUploadRepo {
    async fn create_upload(&self, upload: &UploadedFileInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO uploads (user_id, filename, filepath, uploaded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(upload.user_id)
        .bind(&upload.filename)
        .bind(&upload.filepath)
        .bind(upload.uploaded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<UploadedFile>, AppError> {
        let upload = sqlx::query_as::<_, UploadedFile>(
            "SELECT id, user_id, filename, filepath, uploaded_at FROM uploads WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(upload)
    }

    async fn list_uploads(&self, user_id: &Uuid) -> Result<Vec<UploadedFile>, AppError> {
        let uploads = sqlx::query_as::<_, UploadedFile>(
            "SELECT id, user_id, filename, filepath, uploaded_at FROM uploads WHERE user_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }

    async fn delete_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<String, AppError> {
        let filepath = sqlx::query_scalar::<_, String>(
            "DELETE FROM uploads WHERE id = $1 AND user_id = $2 RETURNING filepath",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

        Ok(filepath)
    }
}
