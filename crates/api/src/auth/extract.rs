//! Authorization extractors.
//!
//! Handlers declare their access requirement by taking one of these:
//!
//! ```rust,ignore
//! async fn list_users(RequireAdmin(_admin): RequireAdmin, State(state): State<AppState>) { .. }
//! async fn my_orders(Caller(claims): Caller, State(state): State<AppState>) { .. }
//! ```
//!
//! A rejection short-circuits with an error envelope; the handler never runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use pc_house_core::Role;

use super::{AccessContext, Claims, Policy};
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// A verified caller (any role).
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

/// A verified caller whose stored role is admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingCredential)?;
    let value = header.to_str().map_err(|_| AppError::MissingCredential)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingCredential)
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .tokens()
            .verify(token)
            .map_err(|e| AppError::Forbidden(e.to_string()))?;

        tracing::Span::current().record("uid", tracing::field::display(&claims.uid));
        set_sentry_user(&claims.uid);

        Ok(Self(claims))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Caller(claims) = Caller::from_request_parts(parts, state).await?;
        let role = stored_role(state, &claims).await?;

        Policy::Admin
            .evaluate(&AccessContext::new(&claims, role))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        Ok(Self(claims))
    }
}

/// The caller's stored role, or `None` when they have no user record.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn stored_role(state: &AppState, claims: &Claims) -> Result<Option<Role>, AppError> {
    Ok(state
        .store()
        .get_user(&claims.uid)
        .await?
        .map(|user| user.role))
}
