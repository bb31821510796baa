use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NewRating {
    #[validate(range(min = 1, max = 5))]
    pub stars: i16,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug)]
pub struct RatingInsert {
    pub stars: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewRating> for RatingInsert {
    fn from(form: NewRating) -> Self {
        RatingInsert {
            stars: form.stars,
            comment: form
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub stars: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate shown on the rating page: average rounded to two decimals.
#[derive(Debug, Serialize, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn new(average: Option<f64>, count: i64) -> Self {
        RatingSummary {
            average: (average.unwrap_or(0.0) * 100.0).round() / 100.0,
            count,
        }
    }
}
