use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::rating::{RatingInsert, RatingSummary},
    errors::AppError,
    repositories::sqlx_repo::SqlxRatingRepo,
};

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn create_rating(&self, rating: &RatingInsert) -> Result<Uuid, AppError>;
    async fn rating_summary(&self) -> Result<RatingSummary, AppError>;
}

impl SqlxRatingRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxRatingRepo { pool }
    }
}

#[async_trait]
impl RatingRepository for SqlxRatingRepo {
    async fn create_rating(&self, rating: &RatingInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO ratings (stars, comment, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(rating.stars)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn rating_summary(&self) -> Result<RatingSummary, AppError> {
        let (average, count) = sqlx::query_as::<_, (Option<f64>, i64)>(
            "SELECT AVG(stars::float8), COUNT(*) FROM ratings",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary::new(average, count))
    }
}
