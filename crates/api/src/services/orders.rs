//! Order placement and lifecycle.
//!
//! An order starts `unpaid` and may move to `shipped`; `paid` is tracked
//! independently. Cancellation is a hard delete.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use pc_house_core::{Email, OrderId, OrderStatus, PartId, PaymentId, Uid};

use crate::auth::{AccessContext, Claims, Policy};
use crate::db::{RepositoryError, Store};
use crate::error::{AppError, Result};
use crate::models::{Order, OrderContact, Payment};

/// Body of `POST /place-order`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// When present it must match the caller.
    pub uid: Option<String>,
}

/// Body of `PATCH /order-shipped`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipOrderRequest {
    pub order_id: Option<String>,
}

/// Body of `PATCH /store-payment`.
#[derive(Debug, Deserialize)]
pub struct StorePaymentRequest {
    /// Payment as reported by the client; kept verbatim.
    pub payment: Option<serde_json::Value>,
}

/// Parse a storage id supplied by the client.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the id is missing or not a UUID.
pub fn parse_order_id(raw: Option<&str>) -> Result<OrderId> {
    let raw = raw.ok_or_else(|| AppError::BadRequest("orderId is required".to_string()))?;
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid order id: {raw}")))
}

/// A required, non-blank text field.
fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

impl PlaceOrderRequest {
    fn contact(&mut self) -> Result<OrderContact> {
        let address = required(self.address.take(), "address")?;
        let email = required(self.email.take(), "email")?;
        let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = required(self.name.take(), "name")?;
        let phone = required(self.phone.take(), "phone")?;

        Ok(OrderContact {
            address,
            email,
            name,
            phone,
        })
    }
}

/// Order operations.
pub struct OrderService<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Place an order for the caller.
    ///
    /// The unit price is copied from the part now. The order insert and the
    /// stock decrement are one store operation; stock is not floor-checked, so
    /// concurrent orders can oversell.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` for missing contact fields, a bad email or a
    ///   quantity below 1
    /// - `AppError::Forbidden` if the body names a different `uid`
    /// - `AppError::NotFound` if the part does not exist
    pub async fn place_order(
        &self,
        caller: &Claims,
        mut request: PlaceOrderRequest,
    ) -> Result<Order> {
        if let Some(raw) = request.uid.as_deref() {
            let named = Uid::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))?;
            Policy::SelfOnly(&named)
                .evaluate(&AccessContext::new(caller, None))
                .map_err(|denial| AppError::Forbidden(denial.to_string()))?;
        }

        let product_id = required(request.product_id.take(), "productId")?;
        let product_id =
            PartId::parse(&product_id).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let quantity = request
            .quantity
            .ok_or_else(|| AppError::BadRequest("quantity is required".to_string()))?;
        let quantity = i32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))?;
        let contact = request.contact()?;

        let part = self
            .store
            .get_part(&product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("part".to_string()))?;

        let order = Order {
            id: OrderId::generate(),
            product_id: part.id,
            product_name: part.name,
            address: contact.address,
            email: contact.email,
            name: contact.name,
            phone: contact.phone,
            quantity,
            unit_price: part.price,
            paid: false,
            status: OrderStatus::Unpaid,
            uid: caller.uid.clone(),
            txid: None,
            created_at: Utc::now(),
        };

        let order = self.store.place_order(order).await.map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("part".to_string()),
            other => other.into(),
        })?;

        tracing::info!(
            order_id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            uid = %order.uid,
            "Order placed"
        );

        Ok(order)
    }

    /// Fetch an order the caller owns, or any order for an admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` or `AppError::Forbidden`.
    pub async fn get_order(&self, caller: &Claims, id: OrderId) -> Result<Order> {
        let order = self.find(id).await?;

        // The role only matters when the caller is not the owner
        let role = if order.uid == caller.uid {
            None
        } else {
            self.store.get_user(&caller.uid).await?.map(|u| u.role)
        };

        let alternatives = [Policy::SelfOnly(&order.uid), Policy::Admin];
        Policy::AnyOf(&alternatives)
            .evaluate(&AccessContext::new(caller, role))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        Ok(order)
    }

    /// The caller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_my_orders(&self, caller: &Claims) -> Result<Vec<Order>> {
        Ok(self.store.list_orders_for(&caller.uid).await?)
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.list_orders().await?)
    }

    /// Set status to `shipped`, whatever the current status or paid flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order does not exist.
    pub async fn mark_shipped(&self, request: ShipOrderRequest) -> Result<Order> {
        let id = parse_order_id(request.order_id.as_deref())?;
        let order = self
            .store
            .set_status(id, OrderStatus::Shipped)
            .await?
            .ok_or_else(|| AppError::NotFound("order".to_string()))?;

        tracing::info!(order_id = %id, "Order shipped");
        Ok(order)
    }

    /// Delete one of the caller's own orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` or `AppError::Forbidden`.
    pub async fn cancel_order(&self, caller: &Claims, id: OrderId) -> Result<()> {
        let order = self.find(id).await?;
        Policy::SelfOnly(&order.uid)
            .evaluate(&AccessContext::new(caller, None))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        self.delete_order(id).await
    }

    /// Delete any order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order does not exist.
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        if !self.store.delete_order(id).await? {
            return Err(AppError::NotFound("order".to_string()));
        }
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Record a completed payment reported by the order's owner.
    ///
    /// Marks the order paid with the transaction id and stores the payment
    /// (with the caller as payer) in one store operation. The payment is not
    /// cross-checked with the processor.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` if `payment`, `orderId` or `txid` is missing
    /// - `AppError::NotFound` if the order does not exist
    /// - `AppError::Forbidden` if the caller does not own the order
    pub async fn record_payment(
        &self,
        caller: &Claims,
        request: StorePaymentRequest,
    ) -> Result<Payment> {
        let payload = request
            .payment
            .filter(serde_json::Value::is_object)
            .ok_or_else(|| AppError::BadRequest("payment is required".to_string()))?;

        let order_id = parse_order_id(payload.get("orderId").and_then(|v| v.as_str()))?;
        let txid = required(
            payload
                .get("txid")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            "txid",
        )?;
        let amount = payload
            .get("amount")
            .and_then(|v| serde_json::from_value::<Decimal>(v.clone()).ok());

        let order = self.find(order_id).await?;
        Policy::SelfOnly(&order.uid)
            .evaluate(&AccessContext::new(caller, None))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        let payment = Payment {
            id: PaymentId::generate(),
            txid,
            order_id,
            uid: caller.uid.clone(),
            amount,
            payload,
            created_at: Utc::now(),
        };

        self.store
            .record_payment(payment.clone())
            .await?
            .ok_or_else(|| AppError::NotFound("order".to_string()))?;

        tracing::info!(order_id = %order_id, txid = %payment.txid, "Payment recorded");
        Ok(payment)
    }

    async fn find(&self, id: OrderId) -> Result<Order> {
        self.store
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("order".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pc_house_core::{Price, Role};
    use serde_json::json;

    use super::*;
    use crate::db::{
        MemoryStore, OrderRepository, PartRepository, PaymentRepository, UserRepository,
    };
    use crate::models::NewPart;

    fn claims(uid: &str) -> Claims {
        Claims {
            uid: Uid::parse(uid).unwrap(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    async fn store_with_part(price: i64, available: i32) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_part(NewPart {
                id: PartId::parse("cpu-1").unwrap(),
                name: "CPU".to_string(),
                image: "cpu.png".to_string(),
                price: Price::new(Decimal::from(price)).unwrap(),
                minimum: 1,
                available,
                description: "Processor".to_string(),
                added_by: Uid::parse("admin").unwrap(),
            })
            .await
            .unwrap();
        store
    }

    fn order_request(quantity: i64) -> PlaceOrderRequest {
        PlaceOrderRequest {
            product_id: Some("cpu-1".to_string()),
            quantity: Some(quantity),
            address: Some("1 Main St".to_string()),
            email: Some("buyer@example.com".to_string()),
            name: Some("Buyer".to_string()),
            phone: Some("555-0100".to_string()),
            uid: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_snapshots_price_and_decrements() {
        let store = store_with_part(50, 10).await;
        let order = OrderService::new(&store)
            .place_order(&claims("u1"), order_request(2))
            .await
            .unwrap();

        assert_eq!(order.unit_price.amount(), Decimal::from(50));
        assert!(!order.paid);
        assert_eq!(order.status, OrderStatus::Unpaid);
        assert_eq!(order.uid, Uid::parse("u1").unwrap());

        let part = store
            .get_part(&PartId::parse("cpu-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(part.available, 8);
    }

    #[tokio::test]
    async fn test_place_order_validation() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);

        let mut missing_phone = order_request(1);
        missing_phone.phone = Some("  ".to_string());
        let mut bad_email = order_request(1);
        bad_email.email = Some("nope".to_string());

        for request in [order_request(0), missing_phone, bad_email] {
            let err = service.place_order(&claims("u1"), request).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{err}");
        }
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_rejects_other_uid_in_body() {
        let store = store_with_part(50, 10).await;
        let mut request = order_request(1);
        request.uid = Some("u2".to_string());

        let err = OrderService::new(&store)
            .place_order(&claims("u1"), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_place_order_unknown_part() {
        let store = MemoryStore::new();
        let err = OrderService::new(&store)
            .place_order(&claims("u1"), order_request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_order_owner_or_admin() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(&claims("owner"), order_request(1))
            .await
            .unwrap();

        assert!(service.get_order(&claims("owner"), order.id).await.is_ok());
        assert!(matches!(
            service.get_order(&claims("other"), order.id).await,
            Err(AppError::Forbidden(_))
        ));

        let boss = Uid::parse("boss").unwrap();
        store.upsert_user(&boss, None, None).await.unwrap();
        store.set_role(&boss, Role::Admin).await.unwrap();
        assert!(service.get_order(&claims("boss"), order.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_shipped_is_unconditional() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(&claims("u1"), order_request(1))
            .await
            .unwrap();

        let shipped = service
            .mark_shipped(ShipOrderRequest {
                order_id: Some(order.id.to_string()),
            })
            .await
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
        assert!(!shipped.paid);

        let err = service
            .mark_shipped(ShipOrderRequest {
                order_id: Some(OrderId::generate().to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_requires_owner() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(&claims("u1"), order_request(1))
            .await
            .unwrap();

        assert!(matches!(
            service.cancel_order(&claims("u2"), order.id).await,
            Err(AppError::Forbidden(_))
        ));
        service.cancel_order(&claims("u1"), order.id).await.unwrap();
        assert!(matches!(
            service.cancel_order(&claims("u1"), order.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_payment() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(&claims("u1"), order_request(2))
            .await
            .unwrap();

        let payment = service
            .record_payment(
                &claims("u1"),
                StorePaymentRequest {
                    payment: Some(json!({
                        "orderId": order.id.to_string(),
                        "txid": "pi_abc",
                        "amount": 100,
                        "brand": "visa"
                    })),
                },
            )
            .await
            .unwrap();

        assert_eq!(payment.uid, Uid::parse("u1").unwrap());
        assert_eq!(payment.amount, Some(Decimal::from(100)));
        assert_eq!(payment.payload["brand"], "visa");

        let order = store.get_order(order.id).await.unwrap().unwrap();
        assert!(order.paid);
        assert_eq!(order.txid.as_deref(), Some("pi_abc"));
        assert_eq!(store.payments_for_order(order.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_payment_rejects_non_owner_and_bad_input() {
        let store = store_with_part(50, 10).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(&claims("u1"), order_request(1))
            .await
            .unwrap();

        let err = service
            .record_payment(
                &claims("u2"),
                StorePaymentRequest {
                    payment: Some(json!({ "orderId": order.id.to_string(), "txid": "pi_x" })),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = service
            .record_payment(
                &claims("u1"),
                StorePaymentRequest {
                    payment: Some(json!({ "orderId": order.id.to_string() })),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert!(store.payments_for_order(order.id).await.unwrap().is_empty());
        assert!(!store.get_order(order.id).await.unwrap().unwrap().paid);
    }
}
