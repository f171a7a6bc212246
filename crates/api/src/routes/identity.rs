//! Identity route handlers.

use axum::extract::State;
use serde::Serialize;

use pc_house_core::Uid;

use crate::auth::{Caller, RequireAdmin};
use crate::envelope::{ApiJson, ApiPath, Envelope};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::IdentityService;
use crate::services::identity::{ProfileRequest, SessionRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionPayload {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Serialize)]
pub struct UsersPayload {
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub struct AdminPayload {
    pub admin: bool,
}

fn identity(state: &AppState) -> IdentityService<'_> {
    IdentityService::new(state.store(), state.tokens())
}

fn path_uid(raw: &str) -> Result<Uid> {
    Uid::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// `POST /get-jwt`
pub async fn get_jwt(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SessionRequest>,
) -> Result<Envelope<SessionPayload>> {
    let (token, user) = identity(&state).issue_session(request).await?;
    Ok(Envelope::success("token issued", SessionPayload { token, user }))
}

/// `GET /get-users`
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Envelope<UsersPayload>> {
    let users = identity(&state).list_users().await?;
    Ok(Envelope::success("users", UsersPayload { users }))
}

/// `GET /is-admin/:uid`
pub async fn is_admin(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Envelope<AdminPayload>> {
    let admin = identity(&state).is_admin(&path_uid(&uid)?).await?;
    Ok(Envelope::success("role checked", AdminPayload { admin }))
}

/// `GET /profile`
pub async fn profile(
    Caller(claims): Caller,
    State(state): State<AppState>,
) -> Result<Envelope<UserPayload>> {
    let user = identity(&state).get_profile(&claims.uid).await?;
    Ok(Envelope::success("profile", UserPayload { user }))
}

/// `PATCH /profile`
pub async fn update_profile(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> Result<Envelope<UserPayload>> {
    let user = identity(&state).update_profile(&claims, request).await?;
    Ok(Envelope::success("profile updated", UserPayload { user }))
}

/// `PUT /make-admin/:uid`
pub async fn make_admin(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Envelope<UserPayload>> {
    let user = identity(&state).promote_to_admin(&path_uid(&uid)?).await?;
    Ok(Envelope::success("user is now an admin", UserPayload { user }))
}
