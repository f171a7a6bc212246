//! Review repository.

use async_trait::async_trait;

use pc_house_core::{Rating, ReviewId, Uid};

use super::{PgStore, RepositoryError};
use crate::models::Review;

/// Storage operations for reviews. There is no update or delete.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Append a review.
    async fn insert_review(&self, review: Review) -> Result<Review, RepositoryError>;

    /// Reviews by `author`, or every review when `None`; newest first.
    async fn list_reviews(&self, author: Option<&Uid>) -> Result<Vec<Review>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    rating: i16,
    text: String,
    image: Option<String>,
    uid: Uid,
    name: String,
    created_at: i64,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::try_from(row.rating).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            rating,
            text: row.text,
            image: row.image,
            uid: row.uid,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

const REVIEW_COLUMNS: &str = "id, rating, text, image, uid, name, created_at";

#[async_trait]
impl ReviewRepository for PgStore {
    async fn insert_review(&self, review: Review) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            INSERT INTO reviews ({REVIEW_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(review.id)
        .bind(i16::from(review.rating.get()))
        .bind(&review.text)
        .bind(&review.image)
        .bind(&review.uid)
        .bind(&review.name)
        .bind(review.created_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn list_reviews(&self, author: Option<&Uid>) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE $1::text IS NULL OR uid = $1
             ORDER BY created_at DESC, seq DESC
            "
        ))
        .bind(author)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }
}
