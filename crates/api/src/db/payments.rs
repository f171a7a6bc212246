//! Payment repository.

use async_trait::async_trait;

use pc_house_core::OrderId;

use super::orders::ORDER_COLUMNS;
use super::{PgStore, RepositoryError};
use crate::models::{Order, Payment};

/// Storage operations for recorded payments.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Mark the payment's order as paid (storing the transaction id) and
    /// insert the payment record, in one transaction.
    ///
    /// Returns `None` and stores nothing if the order does not exist.
    async fn record_payment(&self, payment: Payment) -> Result<Option<Order>, RepositoryError>;

    /// Payments recorded against an order, oldest first.
    async fn payments_for_order(&self, order_id: OrderId)
    -> Result<Vec<Payment>, RepositoryError>;
}

const PAYMENT_COLUMNS: &str = "id, txid, order_id, uid, amount, payload, created_at";

#[async_trait]
impl PaymentRepository for PgStore {
    async fn record_payment(&self, payment: Payment) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET paid = TRUE, txid = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(payment.order_id)
        .bind(&payment.txid)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        sqlx::query(&format!(
            "INSERT INTO payments ({PAYMENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(payment.id)
        .bind(&payment.txid)
        .bind(payment.order_id)
        .bind(&payment.uid)
        .bind(payment.amount)
        .bind(&payment.payload)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    async fn payments_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = $1 ORDER BY seq"
        ))
        .bind(order_id)
        .fetch_all(self.pool())
        .await?;

        Ok(payments)
    }
}
