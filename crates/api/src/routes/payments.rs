//! Payment route handlers.

use axum::extract::State;
use serde::Serialize;

use crate::auth::Caller;
use crate::envelope::{ApiJson, Envelope};
use crate::error::Result;
use crate::models::Payment;
use crate::services::orders::StorePaymentRequest;
use crate::services::payments::PaymentIntentRequest;
use crate::services::{OrderService, PaymentService};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentPayload {
    pub client_secret: String,
}

#[derive(Serialize)]
pub struct PaymentPayload {
    pub payment: Payment,
}

/// `POST /create-payment-intent`
pub async fn create_payment_intent(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PaymentIntentRequest>,
) -> Result<Envelope<IntentPayload>> {
    let client_secret = PaymentService::new(state.store(), state.payments())
        .create_payment_intent(&claims, request)
        .await?;
    Ok(Envelope::success(
        "payment intent created",
        IntentPayload { client_secret },
    ))
}

/// `PATCH /store-payment`
pub async fn store_payment(
    Caller(claims): Caller,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StorePaymentRequest>,
) -> Result<Envelope<PaymentPayload>> {
    let payment = OrderService::new(state.store())
        .record_payment(&claims, request)
        .await?;
    Ok(Envelope::success("payment stored", PaymentPayload { payment }))
}
