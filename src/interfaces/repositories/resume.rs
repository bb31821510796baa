use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::resume::{ResumeInsert, ResumeRecord, ResumeUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxResumeRepo,
};

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn create_resume(&self, resume: &ResumeInsert) -> Result<Uuid, AppError>;
    async fn set_pdf_path(&self, id: &Uuid, pdf_path: &str) -> Result<(), AppError>;
    async fn get_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<ResumeRecord>, AppError>;
    async fn list_resumes(&self, user_id: &Uuid) -> Result<Vec<ResumeRecord>, AppError>;
    async fn update_resume(&self, id: &Uuid, user_id: &Uuid, update: &ResumeUpdate) -> Result<(), AppError>;
    /// Deletes the row and hands back its `pdf_path` so the caller can remove
    /// the artifact file as well.
    async fn delete_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<String>, AppError>;
    /// Every `pdf_path` currently referenced by any row, for the orphan sweep.
    async fn list_pdf_paths(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxResumeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxResumeRepo { pool }
    }
}

const RESUME_COLUMNS: &str =
    "id, user_id, title, template, data_json, html_preview, pdf_path, created_at, updated_at";

#[async_trait]
impl ResumeRepository for SqlxResumeRepo {
    async fn create_resume(&self, resume: &ResumeInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO resumes (user_id, title, template, data_json, html_preview, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(&resume.template)
        .bind(&resume.data_json)
        .bind(&resume.html_preview)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set_pdf_path(&self, id: &Uuid, pdf_path: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE resumes SET pdf_path = $1 WHERE id = $2")
            .bind(pdf_path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Resume not found".into()))
        } else {
            Ok(())
        }
    }

    async fn get_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<ResumeRecord>, AppError> {
        let record = sqlx::query_as::<_, ResumeRecord>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_resumes(&self, user_id: &Uuid) -> Result<Vec<ResumeRecord>, AppError> {
        let records = sqlx::query_as::<_, ResumeRecord>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn update_resume(&self, id: &Uuid, user_id: &Uuid, update: &ResumeUpdate) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $1, data_json = $2, html_preview = $3, pdf_path = $4, updated_at = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&update.title)
        .bind(&update.data_json)
        .bind(&update.html_preview)
        .bind(&update.pdf_path)
        .bind(update.updated_at)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Resume not found".into()))
        } else {
            Ok(())
        }
    }

    async fn delete_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<String>, AppError> {
        let pdf_path = sqlx::query_scalar::<_, Option<String>>(
            "DELETE FROM resumes WHERE id = $1 AND user_id = $2 RETURNING pdf_path",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".into()))?;

        Ok(pdf_path)
    }

    async fn list_pdf_paths(&self) -> Result<Vec<String>, AppError> {
        let paths = sqlx::query_scalar::<_, String>(
            "SELECT pdf_path FROM resumes WHERE pdf_path IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(paths)
    }
}
