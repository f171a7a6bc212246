//! Customer reviews.

use serde::{Deserialize, Serialize};

use pc_house_core::{Rating, ReviewId, Uid};

/// An immutable customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub rating: Rating,
    pub text: String,
    pub image: Option<String>,
    /// Author identity.
    pub uid: Uid,
    /// Author display name, resolved when the review was written.
    pub name: String,
    /// Epoch seconds.
    pub created_at: i64,
}
