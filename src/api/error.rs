//! API error taxonomy

use super::response::{envelope, error_envelope, FieldErrors};
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or inconsistent request fields
    Validation(FieldErrors),
    /// Unparseable request (body, query or token)
    BadRequest(String),
    /// Missing, expired or unknown credentials
    Unauthenticated(String),
    /// Authenticated but not the owner
    Forbidden(String),
    NotFound(String),
    Conflict(FieldErrors),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn message(text: &str) -> Value {
    json!({ "Message": text })
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(err).context("Failed to encode response"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(fields) | ApiError::Conflict(fields) => {
                envelope(status, "fail", serde_json::to_value(&fields).unwrap_or_default())
            }
            ApiError::BadRequest(text)
            | ApiError::Unauthenticated(text)
            | ApiError::Forbidden(text)
            | ApiError::NotFound(text) => envelope(status, "fail", message(&text)),
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                error_envelope(status, &err.to_string())
            }
        }
    }
}
