//! Catalog part (product) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pc_house_core::{PartId, PartRecordId, Price, Uid};

/// A part listed in the catalog.
///
/// `id` is the human-assigned business id used in URLs and orders; `_id` is
/// the storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(rename = "_id")]
    pub record_id: PartRecordId,
    pub id: PartId,
    pub name: String,
    pub image: String,
    pub price: Price,
    /// Minimum quantity per order.
    pub minimum: i32,
    /// Units in stock. May go negative when orders oversell.
    pub available: i32,
    pub description: String,
    /// Admin who listed the part.
    pub added_by: Uid,
    pub created_at: DateTime<Utc>,
}

/// A validated part ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub id: PartId,
    pub name: String,
    pub image: String,
    pub price: Price,
    pub minimum: i32,
    pub available: i32,
    pub description: String,
    pub added_by: Uid,
}

impl NewPart {
    /// Stamp storage id and creation time.
    #[must_use]
    pub fn into_part(self) -> Part {
        Part {
            record_id: PartRecordId::generate(),
            id: self.id,
            name: self.name,
            image: self.image,
            price: self.price,
            minimum: self.minimum,
            available: self.available,
            description: self.description,
            added_by: self.added_by,
            created_at: Utc::now(),
        }
    }
}
