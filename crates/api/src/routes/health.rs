//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode};

use crate::envelope::{Empty, Envelope};
use crate::state::AppState;

/// `GET /` - the server is up.
pub async fn root() -> Envelope<Empty> {
    Envelope::message("PC House server is running")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
