//! Response envelope
//!
//! Every body is one of
//! `{"Status":"success","Data":..}`, `{"Status":"fail","Data":..}` or
//! `{"Status":"error","Message":".."}`.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const MISSING_ARGUMENT: &str = "This argument is missing from the request";

/// Per-field messages for `fail` responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn missing(&mut self, field: &str) {
        self.insert(field, MISSING_ARGUMENT);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Successful handler output
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    data: Value,
    location: Option<String>,
}

impl ApiResponse {
    /// 200 with `data`
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            data,
            location: None,
        }
    }

    /// 201 with a `Location` header pointing at the new entity
    pub fn created(data: Value, location: String) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
            location: Some(location),
        }
    }

    /// 204 acknowledging an update or delete
    pub fn updated() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            data: json!({ "Message": "OK" }),
            location: None,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = envelope(self.status, "success", self.data);
        if let Some(location) = self.location {
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
        }
        response
    }
}

pub(crate) fn envelope(status: StatusCode, kind: &str, data: Value) -> Response {
    (status, Json(json!({ "Status": kind, "Data": data }))).into_response()
}

pub(crate) fn error_envelope(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "Status": "error", "Message": message }))).into_response()
}

/// Absolute URL of an entity, built from the request's Host header
pub fn location_for(headers: &HeaderMap, kind: &str, encoded_key: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}/api/{}/{}", scheme, host, kind, encoded_key)
}
