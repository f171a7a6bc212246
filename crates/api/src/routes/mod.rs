//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                         - Liveness message
//! GET    /health                   - Health check
//! GET    /health/ready             - Readiness (store reachable)
//!
//! # Identity
//! POST   /get-jwt                  - Issue token, upsert profile
//! GET    /get-users                - List users (admin)
//! GET    /is-admin/:uid            - Role check
//! GET    /profile                  - Own profile
//! PATCH  /profile                  - Update own profile
//! PUT    /make-admin/:uid          - Promote to admin (admin)
//!
//! # Catalog
//! GET    /get-parts                - List parts
//! GET    /get-part/:id             - Part detail
//! POST   /add-product              - Create part (admin)
//!
//! # Orders
//! POST   /place-order              - Place order, decrement stock
//! GET    /get-my-orders            - Own orders
//! GET    /get-all-orders           - All orders (admin)
//! GET    /get-order/:orderid       - Order detail (owner or admin)
//! DELETE /cancel-order/:orderid    - Cancel own order
//! DELETE /delete-order/:orderid    - Delete any order (admin)
//! PATCH  /order-shipped            - Mark shipped (admin)
//!
//! # Payments
//! POST   /create-payment-intent    - Processor intent for own order
//! PATCH  /store-payment            - Record a completed payment
//!
//! # Reviews
//! GET    /get-reviews/:uid         - Reviews by uid, or "all"
//! POST   /add-review               - Add review
//! ```

pub mod catalog;
pub mod health;
pub mod identity;
pub mod orders;
pub mod payments;
pub mod reviews;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Identity
        .route("/get-jwt", post(identity::get_jwt))
        .route("/get-users", get(identity::list_users))
        .route("/is-admin/{uid}", get(identity::is_admin))
        .route(
            "/profile",
            get(identity::profile).patch(identity::update_profile),
        )
        .route("/make-admin/{uid}", put(identity::make_admin))
        // Catalog
        .route("/get-parts", get(catalog::list_parts))
        .route("/get-part/{id}", get(catalog::get_part))
        .route("/add-product", post(catalog::add_product))
        // Orders
        .route("/place-order", post(orders::place_order))
        .route("/get-my-orders", get(orders::my_orders))
        .route("/get-all-orders", get(orders::all_orders))
        .route("/get-order/{orderid}", get(orders::get_order))
        .route("/cancel-order/{orderid}", delete(orders::cancel_order))
        .route("/delete-order/{orderid}", delete(orders::delete_order))
        .route("/order-shipped", patch(orders::mark_shipped))
        // Payments
        .route("/create-payment-intent", post(payments::create_payment_intent))
        .route("/store-payment", patch(payments::store_payment))
        // Reviews
        .route("/get-reviews/{uid}", get(reviews::list_reviews))
        .route("/add-review", post(reviews::add_review))
}
