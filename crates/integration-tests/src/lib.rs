//! Integration test harness for the PC House API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory suite (no services needed)
//! cargo test -p pc-house-integration-tests
//!
//! # Include the PostgreSQL suite
//! PC_HOUSE_DATABASE_URL=postgres://... cargo test -p pc-house-integration-tests -- --ignored
//! ```
//!
//! [`TestApp`] drives the real router with `tower::ServiceExt::oneshot`. The
//! store is in memory and the payment processor is a recording stub, so no
//! network or database is touched unless a test asks for one.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use pc_house_api::config::{ApiConfig, AuthConfig, StoreBackend, StripeConfig};
use pc_house_api::db::{MemoryStore, Store};
use pc_house_api::services::PaymentProcessor;
use pc_house_api::services::payments::{IntentRequest, PaymentError, PaymentIntent};
use pc_house_api::state::AppState;
use pc_house_core::{Role, Uid};

/// Signing secret used by every test app.
pub const TEST_JWT_SECRET: &str = "k7Qm2vX9pL4rT8wZ1nB6cF3hJ5sD0gYa";

/// Configuration for an app backed by the in-memory store.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        store: StoreBackend::Memory,
        auth: AuthConfig {
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
            token_ttl: Duration::from_secs(3600),
        },
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_unused"),
            api_base: Url::parse("http://127.0.0.1:9").unwrap(),
            currency: "usd".parse().unwrap(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Payment processor that records requests and hands out fixed secrets.
#[derive(Default)]
pub struct StubProcessor {
    requests: Mutex<Vec<IntentRequest>>,
}

impl StubProcessor {
    /// Every intent requested so far, oldest first.
    pub fn requests(&self) -> Vec<IntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProcessor for StubProcessor {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, PaymentError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let n = requests.len();
        Ok(PaymentIntent {
            id: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret"),
        })
    }
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The envelope's `ok` flag.
    pub fn ok(&self) -> bool {
        self.body["ok"].as_bool().unwrap()
    }

    /// The envelope's `text`.
    pub fn text(&self) -> &str {
        self.body["text"].as_str().unwrap()
    }
}

/// The full application over fresh in-memory state.
pub struct TestApp {
    router: Router,
    store: Arc<dyn Store>,
    processor: Arc<StubProcessor>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// The full application over an existing store.
    #[must_use]
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let processor = Arc::new(StubProcessor::default());
        let state = AppState::new(
            test_config(),
            Arc::clone(&store),
            Arc::clone(&processor) as Arc<dyn PaymentProcessor>,
        );

        Self {
            router: pc_house_api::app(state),
            store,
            processor,
        }
    }

    /// Direct store access for setup and for asserting on state.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn processor(&self) -> &StubProcessor {
        &self.processor
    }

    /// Send one request through the router.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, path, token, None).await
    }

    /// Sign in through `/get-jwt` and return the token.
    pub async fn sign_in(&self, uid: &str, name: &str) -> String {
        let response = self
            .post(
                "/get-jwt",
                None,
                json!({ "uid": uid, "name": name, "email": format!("{uid}@example.com") }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Sign in and grant the admin role out of band, as `pc-cli admin promote` does.
    pub async fn sign_in_admin(&self, uid: &str) -> String {
        let token = self.sign_in(uid, "Admin").await;
        self.store
            .set_role(&Uid::parse(uid).unwrap(), Role::Admin)
            .await
            .unwrap()
            .unwrap();
        token
    }

    /// List a part as `admin_token`.
    pub async fn add_part(&self, admin_token: &str, id: &str, price: f64, available: i64) -> Value {
        let response = self
            .post(
                "/add-product",
                Some(admin_token),
                json!({
                    "id": id,
                    "name": format!("Part {id}"),
                    "image": "https://img.example.com/part.png",
                    "price": price,
                    "minimum": 1,
                    "available": available,
                    "description": "A part"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["part"].clone()
    }
}

/// A valid place-order body; the owner is whoever sends it.
#[must_use]
pub fn order_body(product_id: &str, quantity: i64) -> Value {
    json!({
        "productId": product_id,
        "quantity": quantity,
        "address": "1 Main St",
        "email": "buyer@example.com",
        "name": "Buyer",
        "phone": "555-0100"
    })
}
