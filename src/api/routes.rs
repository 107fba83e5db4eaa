use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use super::{resources::resource_routes, rolls, users, AppState};
use crate::auth::{api as auth_api, auth_middleware};
use crate::middleware::request_logging;
use crate::resources::{Character, Conflict, Eidolon, Power, Scene};

/// Create the API router
///
/// Every `/api` route sits behind the auth middleware; the anonymous
/// allow-list inside it lets registration, login and token refresh through.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/users", post(users::register_user))
        .route(
            "/api/users/:user_key",
            get(users::get_user).put(users::update_user),
        )
        .route("/api/login", post(auth_api::login))
        .route("/api/tokens", get(auth_api::refresh_tokens))
        .route("/api/rolls", get(rolls::reroll))
        .route(
            "/api/characters/:key/traits/:index",
            patch(rolls::toggle_trait),
        )
        .merge(resource_routes::<Character>())
        .merge(resource_routes::<Conflict>())
        .merge(resource_routes::<Eidolon>())
        .merge(resource_routes::<Power>())
        .merge(resource_routes::<Scene>())
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    // Public routes
    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
