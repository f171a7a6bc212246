//! Catalog route handlers.

use axum::extract::State;
use serde::Serialize;

use crate::auth::RequireAdmin;
use crate::envelope::{ApiJson, ApiPath, Envelope};
use crate::error::Result;
use crate::models::Part;
use crate::services::CatalogService;
use crate::services::catalog::PartRequest;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PartsPayload {
    pub parts: Vec<Part>,
}

#[derive(Serialize)]
pub struct PartPayload {
    pub part: Part,
}

/// `GET /get-parts`
pub async fn list_parts(State(state): State<AppState>) -> Result<Envelope<PartsPayload>> {
    let parts = CatalogService::new(state.store()).list_products().await?;
    Ok(Envelope::success("parts", PartsPayload { parts }))
}

/// `GET /get-part/:id`
pub async fn get_part(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Envelope<PartPayload>> {
    let part = CatalogService::new(state.store()).get_product(&id).await?;
    Ok(Envelope::success("part", PartPayload { part }))
}

/// `POST /add-product`
pub async fn add_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PartRequest>,
) -> Result<Envelope<PartPayload>> {
    let part = CatalogService::new(state.store())
        .add_product(&admin.uid, request)
        .await?;
    Ok(Envelope::success("part added", PartPayload { part }))
}
