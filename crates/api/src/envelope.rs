//! Uniform response envelope and request extractors that reject into it.
//!
//! Every response body has the shape `{ "ok": bool, "text": string, ...payload }`
//! where the payload keys are flattened into the top-level object.

use axum::{
    Json,
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// Response body wrapper.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    pub text: String,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload for responses that carry only `ok` and `text`.
#[derive(Debug, Serialize)]
pub struct Empty {}

impl<T: Serialize> Envelope<T> {
    /// A successful response carrying `payload`.
    pub fn success(text: impl Into<String>, payload: T) -> Self {
        Self {
            ok: true,
            text: text.into(),
            payload,
        }
    }
}

impl Envelope<Empty> {
    /// A successful response with no payload.
    pub fn message(text: impl Into<String>) -> Self {
        Envelope::success(text, Empty {})
    }

    /// A failed response.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: text.into(),
            payload: Empty {},
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// JSON body extractor whose rejection is a `BadRequest` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejection is a `BadRequest` envelope.
#[derive(Debug, axum::extract::FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
