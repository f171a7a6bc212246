//! Order repository.

use async_trait::async_trait;

use pc_house_core::{OrderId, OrderStatus, Uid};

use super::{PgStore, RepositoryError};
use crate::models::Order;

/// Storage operations for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and take `order.quantity` units off the part's
    /// available stock, as one atomic unit.
    ///
    /// Returns `RepositoryError::NotFound` (and stores nothing) if the part
    /// vanished before the decrement. Stock is not floor-checked.
    async fn place_order(&self, order: Order) -> Result<Order, RepositoryError>;

    /// Look up an order by storage id.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Orders owned by `uid`, newest first.
    async fn list_orders_for(&self, uid: &Uid) -> Result<Vec<Order>, RepositoryError>;

    /// Every order, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Overwrite the status. Returns `None` if the order does not exist.
    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Hard delete. Returns whether an order was removed.
    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError>;
}

pub(crate) const ORDER_COLUMNS: &str = "id, product_id, product_name, address, email, name, \
     phone, quantity, unit_price, paid, status, uid, txid, created_at";

#[async_trait]
impl OrderRepository for PgStore {
    async fn place_order(&self, order: Order) -> Result<Order, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let decremented = sqlx::query("UPDATE parts SET available = available - $2 WHERE id = $1")
            .bind(&order.product_id)
            .bind(order.quantity)
            .execute(&mut *tx)
            .await?;

        if decremented.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let stored = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders ({ORDER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.id)
        .bind(&order.product_id)
        .bind(&order.product_name)
        .bind(&order.address)
        .bind(&order.email)
        .bind(&order.name)
        .bind(&order.phone)
        .bind(order.quantity)
        .bind(order.unit_price)
        .bind(order.paid)
        .bind(order.status)
        .bind(&order.uid)
        .bind(&order.txid)
        .bind(order.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(order)
    }

    async fn list_orders_for(&self, uid: &Uid) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE uid = $1 ORDER BY seq DESC"
        ))
        .bind(uid)
        .fetch_all(self.pool())
        .await?;

        Ok(orders)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY seq DESC"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(orders)
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool())
        .await?;

        Ok(order)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
