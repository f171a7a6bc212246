//! Payment bridge.
//!
//! Creates payment intents with an external processor for a server-computed
//! amount. Completed payments are recorded by
//! [`OrderService::record_payment`](super::orders::OrderService::record_payment).

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use pc_house_core::OrderId;

use super::orders::parse_order_id;
use crate::auth::{AccessContext, Claims, Policy};
use crate::db::Store;
use crate::error::{AppError, Result};

/// Errors from the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the processor response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A request for a card payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    /// Total in minor currency units.
    pub amount: i64,
    /// Order the payment is for, attached as metadata.
    pub order_id: OrderId,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Processor-side intent id.
    pub id: String,
    /// Secret the client uses to confirm the payment.
    pub client_secret: String,
}

/// An external payment processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a card payment intent.
    async fn create_intent(
        &self,
        request: IntentRequest,
    ) -> std::result::Result<PaymentIntent, PaymentError>;
}

/// Body of `POST /create-payment-intent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub order_id: Option<String>,
}

/// Payment intent operations.
pub struct PaymentService<'a> {
    store: &'a dyn Store,
    processor: &'a dyn PaymentProcessor,
}

impl<'a> PaymentService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store, processor: &'a dyn PaymentProcessor) -> Self {
        Self { store, processor }
    }

    /// Create a payment intent for the caller's own order and return its
    /// client secret.
    ///
    /// The amount is `unit_price * quantity` in minor units, computed here and
    /// never taken from the client.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` if `orderId` is missing or malformed
    /// - `AppError::NotFound` if the order does not exist
    /// - `AppError::Forbidden` if the caller does not own the order
    /// - `AppError::Payment` if the processor call fails
    pub async fn create_payment_intent(
        &self,
        caller: &Claims,
        request: PaymentIntentRequest,
    ) -> Result<String> {
        let order_id = parse_order_id(request.order_id.as_deref())?;
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("order".to_string()))?;

        Policy::SelfOnly(&order.uid)
            .evaluate(&AccessContext::new(caller, None))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        let quantity = u32::try_from(order.quantity)
            .map_err(|_| AppError::Internal(format!("order {order_id} has invalid quantity")))?;
        let amount = order
            .unit_price
            .minor_units_for(quantity)
            .map_err(|e| AppError::Internal(format!("order {order_id}: {e}")))?;

        let intent = self
            .processor
            .create_intent(IntentRequest { amount, order_id })
            .await?;

        tracing::info!(
            order_id = %order_id,
            intent_id = %intent.id,
            amount,
            "Payment intent created"
        );

        Ok(intent.client_secret)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use pc_house_core::{Email, OrderStatus, PartId, Price, Uid};
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{MemoryStore, OrderRepository, PartRepository};
    use crate::models::{NewPart, Order};

    /// Records requests and answers with a fixed secret.
    #[derive(Default)]
    pub(crate) struct RecordingProcessor {
        pub(crate) requests: Mutex<Vec<IntentRequest>>,
    }

    #[async_trait]
    impl PaymentProcessor for RecordingProcessor {
        async fn create_intent(
            &self,
            request: IntentRequest,
        ) -> std::result::Result<PaymentIntent, PaymentError> {
            self.requests.lock().unwrap().push(request);
            Ok(PaymentIntent {
                id: "pi_test".to_string(),
                client_secret: "pi_test_secret".to_string(),
            })
        }
    }

    struct FailingProcessor;

    #[async_trait]
    impl PaymentProcessor for FailingProcessor {
        async fn create_intent(
            &self,
            _request: IntentRequest,
        ) -> std::result::Result<PaymentIntent, PaymentError> {
            Err(PaymentError::Api {
                status: 402,
                message: "card_declined".to_string(),
            })
        }
    }

    fn claims(uid: &str) -> Claims {
        Claims {
            uid: Uid::parse(uid).unwrap(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    async fn seed_order(store: &MemoryStore, owner: &str, price: Decimal, quantity: i32) -> Order {
        let part = store
            .insert_part(NewPart {
                id: PartId::parse("gpu-1").unwrap(),
                name: "GPU".to_string(),
                image: "gpu.png".to_string(),
                price: Price::new(price).unwrap(),
                minimum: 1,
                available: 10,
                description: "Graphics card".to_string(),
                added_by: Uid::parse("admin").unwrap(),
            })
            .await
            .unwrap();

        store
            .place_order(Order {
                id: OrderId::generate(),
                product_id: part.id,
                product_name: part.name,
                address: "1 Main St".to_string(),
                email: Email::parse("buyer@example.com").unwrap(),
                name: "Buyer".to_string(),
                phone: "555-0100".to_string(),
                quantity,
                unit_price: part.price,
                paid: false,
                status: OrderStatus::Unpaid,
                uid: Uid::parse(owner).unwrap(),
                txid: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_amount_is_computed_server_side() {
        let store = MemoryStore::new();
        let processor = RecordingProcessor::default();
        let order = seed_order(&store, "u1", Decimal::new(1999, 2), 3).await;

        let secret = PaymentService::new(&store, &processor)
            .create_payment_intent(
                &claims("u1"),
                PaymentIntentRequest {
                    order_id: Some(order.id.to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(secret, "pi_test_secret");
        let requests = processor.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, 5997);
        assert_eq!(requests[0].order_id, order.id);
    }

    #[tokio::test]
    async fn test_other_users_order_is_forbidden() {
        let store = MemoryStore::new();
        let processor = RecordingProcessor::default();
        let order = seed_order(&store, "u1", Decimal::new(50, 0), 1).await;

        let err = PaymentService::new(&store, &processor)
            .create_payment_intent(
                &claims("u2"),
                PaymentIntentRequest {
                    order_id: Some(order.id.to_string()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(processor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_order() {
        let store = MemoryStore::new();
        let processor = RecordingProcessor::default();

        let err = PaymentService::new(&store, &processor)
            .create_payment_intent(
                &claims("u1"),
                PaymentIntentRequest {
                    order_id: Some(OrderId::generate().to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = PaymentService::new(&store, &processor)
            .create_payment_intent(&claims("u1"), PaymentIntentRequest { order_id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_processor_failure_is_payment_error() {
        let store = MemoryStore::new();
        let order = seed_order(&store, "u1", Decimal::new(50, 0), 1).await;

        let err = PaymentService::new(&store, &FailingProcessor)
            .create_payment_intent(
                &claims("u1"),
                PaymentIntentRequest {
                    order_id: Some(order.id.to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Payment(_)));
    }
}
