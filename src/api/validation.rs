//! Typed request bodies
//!
//! Request DTOs keep every field as `Option` so that absent and `null` fields
//! can be reported together, one entry per field, instead of failing on the
//! first one serde trips over.

use super::error::ApiError;
use super::response::FieldErrors;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// Field-level checks run after a body has been decoded
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Declarative required-field check: `(wire name, present?)` pairs.
pub fn require(fields: &[(&str, bool)]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for (name, present) in fields {
        if !present {
            errors.missing(name);
        }
    }
    errors.into_result()
}

/// JSON body that has been decoded and validated.
///
/// Malformed JSON or wrongly typed fields reject with 400 and the parser
/// message; failed validation rejects with 400 and the field map.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
        value.validate().map_err(ApiError::Validation)?;

        Ok(ValidatedJson(value))
    }
}
