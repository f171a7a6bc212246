//! Process-local store.
//!
//! All tables sit behind one lock so multi-table operations (placing an order,
//! recording a payment) are atomic exactly like their `PostgreSQL`
//! transactions. Rows are kept in insertion order; "newest first" listings
//! walk the tables backwards.

use async_trait::async_trait;
use tokio::sync::RwLock;

use pc_house_core::{OrderId, OrderStatus, PartId, Role, Uid};

use super::{
    HealthCheck, OrderRepository, PartRepository, PaymentRepository, RepositoryError,
    ReviewRepository, UserRepository,
};
use crate::models::{NewPart, Order, Part, Payment, ProfileUpdate, Review, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    parts: Vec<Part>,
    orders: Vec<Order>,
    payments: Vec<Payment>,
    reviews: Vec<Review>,
}

/// In-memory implementation of every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert_user(
        &self,
        uid: &Uid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let update = ProfileUpdate {
            name,
            email,
            ..ProfileUpdate::default()
        };

        if let Some(user) = tables.users.iter_mut().find(|u| &u.uid == uid) {
            user.apply(update);
            return Ok(user.clone());
        }

        let mut user = User::new(uid.clone());
        user.apply(update);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, uid: &Uid) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.uid == uid).cloned())
    }

    async fn update_profile(
        &self,
        uid: &Uid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|u| &u.uid == uid)
            .map(|user| {
                user.apply(update);
                user.clone()
            }))
    }

    async fn set_role(&self, uid: &Uid, role: Role) -> Result<Option<User>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|u| &u.uid == uid)
            .map(|user| {
                user.role = role;
                user.clone()
            }))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl PartRepository for MemoryStore {
    async fn insert_part(&self, part: NewPart) -> Result<Part, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.parts.iter().any(|p| p.id == part.id) {
            return Err(RepositoryError::Conflict(
                "part id already exists".to_string(),
            ));
        }
        let part = part.into_part();
        tables.parts.push(part.clone());
        Ok(part)
    }

    async fn get_part(&self, id: &PartId) -> Result<Option<Part>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.parts.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_parts(&self) -> Result<Vec<Part>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.parts.iter().rev().cloned().collect())
    }

    async fn adjust_available(
        &self,
        id: &PartId,
        delta: i32,
    ) -> Result<Option<Part>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .parts
            .iter_mut()
            .find(|p| &p.id == id)
            .map(|part| {
                part.available = part.available.saturating_add(delta);
                part.clone()
            }))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(&self, order: Order) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let part = tables
            .parts
            .iter_mut()
            .find(|p| p.id == order.product_id)
            .ok_or(RepositoryError::NotFound)?;
        part.available = part.available.saturating_sub(order.quantity);
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_orders_for(&self, uid: &Uid) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .rev()
            .filter(|o| &o.uid == uid)
            .cloned()
            .collect())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().rev().cloned().collect())
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .map(|order| {
                order.status = status;
                order.clone()
            }))
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.orders.len();
        tables.orders.retain(|o| o.id != id);
        Ok(tables.orders.len() != before)
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn record_payment(&self, payment: Payment) -> Result<Option<Order>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == payment.order_id) else {
            return Ok(None);
        };
        order.paid = true;
        order.txid = Some(payment.txid.clone());
        let order = order.clone();
        tables.payments.push(payment);
        Ok(Some(order))
    }

    async fn payments_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert_review(&self, review: Review) -> Result<Review, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, author: Option<&Uid>) -> Result<Vec<Review>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .iter()
            .rev()
            .filter(|r| author.is_none_or(|uid| &r.uid == uid))
            .cloned()
            .collect();
        // Stable sort keeps later inserts ahead within the same second
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
