//! Authentication and authorization.
//!
//! - [`token`] - Credential verifier: issues and verifies bearer tokens
//! - [`policy`] - Pure access rules evaluated over verified claims
//! - [`extract`] - axum extractors that gate handlers on those rules

pub mod extract;
pub mod policy;
pub mod token;

pub use extract::{Caller, RequireAdmin, stored_role};
pub use policy::{AccessContext, Denial, Policy};
pub use token::{Claims, TokenError, TokenService};
