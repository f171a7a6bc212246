//! Domain models for the parts store.
//!
//! These are the records held by the store and returned to clients. JSON
//! field names are camelCase; storage ids serialize as `_id`.

pub mod order;
pub mod part;
pub mod payment;
pub mod review;
pub mod user;

pub use order::{Order, OrderContact};
pub use part::{NewPart, Part};
pub use payment::Payment;
pub use review::Review;
pub use user::{ProfileUpdate, User};
