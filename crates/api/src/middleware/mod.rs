//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (records the id on that span, echoes it back)
//! 4. CORS
//!
//! Authorization is not a layer: handlers opt in through the extractors in
//! [`crate::auth`].

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
