//! Recorded payments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pc_house_core::{OrderId, PaymentId, Uid};

/// A payment reported by the client after the processor confirmed it.
///
/// `payload` keeps the client's submission verbatim (amount, card brand, etc).
/// It is not cross-checked with the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: PaymentId,
    pub txid: String,
    pub order_id: OrderId,
    /// Payer identity, taken from the verified token.
    pub uid: Uid,
    /// Amount as submitted, when the client sent a numeric one.
    pub amount: Option<Decimal>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
