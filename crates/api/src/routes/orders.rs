//! Order route handlers.

use axum::extract::State;
use serde::Serialize;

use crate::auth::{Caller, RequireAdmin};
use crate::envelope::{ApiJson, ApiPath, Empty, Envelope};
use crate::error::Result;
use crate::models::Order;
use crate::services::OrderService;
use crate::services::orders::{PlaceOrderRequest, ShipOrderRequest, parse_order_id};
use crate::state::AppState;

#[derive(Serialize)]
pub struct OrdersPayload {
    pub orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct OrderPayload {
    pub order: Order,
}

/// `POST /place-order`
pub async fn place_order(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PlaceOrderRequest>,
) -> Result<Envelope<OrderPayload>> {
    let order = OrderService::new(state.store())
        .place_order(&claims, request)
        .await?;
    Ok(Envelope::success("order placed", OrderPayload { order }))
}

/// `GET /get-my-orders`
pub async fn my_orders(
    Caller(claims): Caller,
    State(state): State<AppState>,
) -> Result<Envelope<OrdersPayload>> {
    let orders = OrderService::new(state.store())
        .list_my_orders(&claims)
        .await?;
    Ok(Envelope::success("orders", OrdersPayload { orders }))
}

/// `GET /get-all-orders`
pub async fn all_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Envelope<OrdersPayload>> {
    let orders = OrderService::new(state.store()).list_all_orders().await?;
    Ok(Envelope::success("orders", OrdersPayload { orders }))
}

/// `GET /get-order/:orderid`
pub async fn get_order(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<String>,
) -> Result<Envelope<OrderPayload>> {
    let order_id = parse_order_id(Some(&order_id))?;
    let order = OrderService::new(state.store())
        .get_order(&claims, order_id)
        .await?;
    Ok(Envelope::success("order", OrderPayload { order }))
}

/// `DELETE /cancel-order/:orderid`
pub async fn cancel_order(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<String>,
) -> Result<Envelope<Empty>> {
    let order_id = parse_order_id(Some(&order_id))?;
    OrderService::new(state.store())
        .cancel_order(&claims, order_id)
        .await?;
    Ok(Envelope::message("order cancelled"))
}

/// `DELETE /delete-order/:orderid`
pub async fn delete_order(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<String>,
) -> Result<Envelope<Empty>> {
    let order_id = parse_order_id(Some(&order_id))?;
    OrderService::new(state.store())
        .delete_order(order_id)
        .await?;
    Ok(Envelope::message("order deleted"))
}

/// `PATCH /order-shipped`
pub async fn mark_shipped(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ShipOrderRequest>,
) -> Result<Envelope<OrderPayload>> {
    let order = OrderService::new(state.store())
        .mark_shipped(request)
        .await?;
    Ok(Envelope::success("order shipped", OrderPayload { order }))
}
