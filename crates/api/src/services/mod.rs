//! Business logic services.
//!
//! Each service borrows the shared store handle (and whatever else it needs)
//! from [`AppState`](crate::state::AppState) for the duration of one request.
//!
//! # Services
//!
//! - `identity` - Token issuance with profile upsert, profiles, roles
//! - `catalog` - Parts listing, lookup, creation, stock adjustment
//! - `orders` - Order placement, lifecycle and payment recording
//! - `payments` - Payment processor seam and intent creation
//! - `stripe` - Stripe implementation of the processor
//! - `reviews` - Append-only reviews

pub mod catalog;
pub mod identity;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod stripe;

pub use catalog::CatalogService;
pub use identity::IdentityService;
pub use orders::OrderService;
pub use payments::{PaymentError, PaymentProcessor, PaymentService};
pub use reviews::ReviewService;
pub use stripe::StripeClient;
