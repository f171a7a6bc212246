//! Customer reviews. Append-only.

use chrono::Utc;
use serde::Deserialize;

use pc_house_core::{Rating, ReviewId, Uid};

use crate::auth::Claims;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Review;

/// Name shown when the author has no display name.
pub const ANONYMOUS: &str = "Anonymous";

/// Selector in `GET /get-reviews/:uid` meaning every author.
pub const ALL_AUTHORS: &str = "all";

/// Body of `POST /add-review`.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub image: Option<String>,
}

/// Review operations.
pub struct ReviewService<'a> {
    store: &'a dyn Store,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Append a review by the caller.
    ///
    /// The author name comes from the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the rating is not a whole number in
    /// 1..=5 or the text is blank.
    pub async fn add_review(&self, caller: &Claims, request: ReviewRequest) -> Result<Review> {
        let rating = request
            .rating
            .ok_or_else(|| AppError::BadRequest("rating is required".to_string()))?;
        let rating = Rating::from_number(rating).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let text = request
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("text is required".to_string()))?;

        let name = self
            .store
            .get_user(&caller.uid)
            .await?
            .and_then(|user| user.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());

        let review = Review {
            id: ReviewId::generate(),
            rating,
            text,
            image: request.image.filter(|i| !i.trim().is_empty()),
            uid: caller.uid.clone(),
            name,
            created_at: Utc::now().timestamp(),
        };

        let review = self.store.insert_review(review).await?;
        tracing::info!(review_id = %review.id, uid = %review.uid, "Review added");
        Ok(review)
    }

    /// Reviews by one author, or by everyone for [`ALL_AUTHORS`]; newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_reviews(&self, selector: &str) -> Result<Vec<Review>> {
        let author = if selector == ALL_AUTHORS {
            None
        } else {
            Some(Uid::parse(selector).map_err(|e| AppError::BadRequest(e.to_string()))?)
        };

        Ok(self.store.list_reviews(author.as_ref()).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UserRepository};

    fn claims(uid: &str) -> Claims {
        Claims {
            uid: Uid::parse(uid).unwrap(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn request(rating: f64) -> ReviewRequest {
        ReviewRequest {
            rating: Some(rating),
            text: Some("Fast shipping".to_string()),
            image: Some("https://img.example.com/r.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_round_trip_with_resolved_name() {
        let store = MemoryStore::new();
        store
            .upsert_user(&Uid::parse("u1").unwrap(), Some("Ann".to_string()), None)
            .await
            .unwrap();
        let service = ReviewService::new(&store);

        service.add_review(&claims("u1"), request(5.0)).await.unwrap();

        let reviews = service.list_reviews("u1").await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating.get(), 5);
        assert_eq!(reviews[0].text, "Fast shipping");
        assert_eq!(reviews[0].image.as_deref(), Some("https://img.example.com/r.png"));
        assert_eq!(reviews[0].name, "Ann");
    }

    #[tokio::test]
    async fn test_unknown_author_is_anonymous() {
        let store = MemoryStore::new();
        let review = ReviewService::new(&store)
            .add_review(&claims("ghost"), request(3.0))
            .await
            .unwrap();
        assert_eq!(review.name, ANONYMOUS);
    }

    #[tokio::test]
    async fn test_rating_must_be_whole_and_in_range() {
        let store = MemoryStore::new();
        let service = ReviewService::new(&store);

        for rating in [0.0, 6.0, 4.5] {
            let err = service
                .add_review(&claims("u1"), request(rating))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
        assert!(service.list_reviews(ALL_AUTHORS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_selector_lists_every_author() {
        let store = MemoryStore::new();
        let service = ReviewService::new(&store);
        service.add_review(&claims("u1"), request(4.0)).await.unwrap();
        service.add_review(&claims("u2"), request(2.0)).await.unwrap();

        let all = service.list_reviews(ALL_AUTHORS).await.unwrap();
        assert_eq!(all.len(), 2);
        // Same second: later insert first
        assert_eq!(all[0].uid, Uid::parse("u2").unwrap());
    }
}
