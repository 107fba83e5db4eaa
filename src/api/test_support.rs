//! Shared fixtures for router-level tests

use super::{create_router, AppState};
use crate::auth::{
    models::{Authority, User},
    password::hash_password,
    token::{generate_refresh_token, AccessToken},
    ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER,
};
use crate::store::{DocumentStore, EntityKey};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub fn test_app() -> (Router, AppState) {
    let state = AppState::new(DocumentStore::in_memory().unwrap());
    (create_router(state.clone()), state)
}

pub fn create_user(state: &AppState, email: &str, password: &str, authority: Authority) -> EntityKey {
    let mut user = User::new("Test User", email, hash_password(password).unwrap(), authority);
    user.refresh_token = generate_refresh_token();
    state.users.insert(&user).unwrap()
}

pub fn token_for(key: &EntityKey) -> String {
    AccessToken::issue(&key.encode()).encode()
}

/// Fire one request at the router and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "anima.test");
    if let Some(token) = token {
        builder = builder.header(ACCESS_TOKEN_HEADER, token);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    read(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_with_refresh(app: &Router, refresh_token: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/tokens")
        .header(REFRESH_TOKEN_HEADER, refresh_token)
        .body(Body::empty())
        .unwrap();

    read(app.clone().oneshot(request).await.unwrap()).await
}

async fn read(response: axum::response::Response) -> (StatusCode, HeaderMap, Value) {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
