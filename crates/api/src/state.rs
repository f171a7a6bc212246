//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::db::Store;
use crate::services::PaymentProcessor;

/// Application state shared across all handlers.
///
/// Built once at startup and cheaply cloned per request via `Arc`. Holds the
/// one store handle every service uses.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: Arc<dyn Store>,
    tokens: TokenService,
    payments: Arc<dyn PaymentProcessor>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration (token secret and lifetime are read here)
    /// * `store` - Opened store backend
    /// * `payments` - Payment processor client
    #[must_use]
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn Store>,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        let tokens = TokenService::new(&config.auth);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                tokens,
                payments,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the store handle.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get the token issuer/verifier.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the payment processor.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentProcessor {
        self.inner.payments.as_ref()
    }
}
