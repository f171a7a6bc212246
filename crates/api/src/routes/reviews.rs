//! Review route handlers.

use axum::extract::State;
use serde::Serialize;

use crate::auth::Caller;
use crate::envelope::{ApiJson, ApiPath, Envelope};
use crate::error::Result;
use crate::models::Review;
use crate::services::ReviewService;
use crate::services::reviews::ReviewRequest;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ReviewsPayload {
    pub reviews: Vec<Review>,
}

#[derive(Serialize)]
pub struct ReviewPayload {
    pub review: Review,
}

/// `GET /get-reviews/:uid`, where `uid` may be `all`.
pub async fn list_reviews(
    State(state): State<AppState>,
    ApiPath(selector): ApiPath<String>,
) -> Result<Envelope<ReviewsPayload>> {
    let reviews = ReviewService::new(state.store())
        .list_reviews(&selector)
        .await?;
    Ok(Envelope::success("reviews", ReviewsPayload { reviews }))
}

/// `POST /add-review`
pub async fn add_review(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> Result<Envelope<ReviewPayload>> {
    let review = ReviewService::new(state.store())
        .add_review(&claims, request)
        .await?;
    Ok(Envelope::success("review added", ReviewPayload { review }))
}
