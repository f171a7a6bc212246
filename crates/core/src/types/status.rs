//! Order status.

use serde::{Deserialize, Serialize};

/// Shipping status of an order.
///
/// Orders start `Unpaid` and move to `Shipped` when an admin ships them. The
/// name is historical: payment is tracked by the order's separate `paid` flag
/// and may be set in either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Unpaid,
    Shipped,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::Shipped => write!(f, "shipped"),
        }
    }
}
