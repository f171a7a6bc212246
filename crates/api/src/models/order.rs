//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pc_house_core::{Email, OrderId, OrderStatus, PartId, Price, Uid};

/// A placed order.
///
/// `unit_price` is copied from the part at placement time and never
/// recalculated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Business id of the ordered part.
    pub product_id: PartId,
    /// Part name at placement time.
    pub product_name: String,
    pub address: String,
    pub email: Email,
    pub name: String,
    pub phone: String,
    pub quantity: i32,
    pub unit_price: Price,
    pub paid: bool,
    pub status: OrderStatus,
    /// Owner identity.
    pub uid: Uid,
    /// Processor transaction id, set when the payment is recorded.
    pub txid: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated shipping contact for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderContact {
    pub address: String,
    pub email: Email,
    pub name: String,
    pub phone: String,
}
