//! Authentication API Endpoints
//! Mission: Provide login and token refresh

use crate::api::{
    validation::{require, Validate, ValidatedJson},
    ApiError, ApiResponse, AppState, FieldErrors,
};
use crate::auth::{
    models::{TokenPair, User},
    password::verify_password_blocking,
    token::{generate_refresh_token, AccessToken},
    user_store::UserStore,
    REFRESH_TOKEN_HEADER,
};
use crate::store::EntityKey;
use anyhow::Result;
use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

pub const WRONG_CREDENTIALS: &str = "Wrong password or email";
pub const UNKNOWN_REFRESH_TOKEN: &str = "There is no such refresh token";

/// Login request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Password", self.password.is_some()),
            ("Email", self.email.is_some()),
        ])
    }
}

/// Mint a new access token and rotate the stored refresh token. The previous
/// refresh token stops working as soon as this is saved.
pub fn issue_tokens(users: &UserStore, key: &EntityKey, user: &mut User) -> Result<TokenPair> {
    let access_token = AccessToken::issue(&key.encode()).encode();
    let refresh_token = generate_refresh_token();

    user.refresh_token = refresh_token.clone();
    users.save(key, user)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn token_response(tokens: &TokenPair) -> ApiResponse {
    ApiResponse::ok(json!({
        "AccessToken": tokens.access_token,
        "RefreshToken": tokens.refresh_token,
    }))
}

/// Login endpoint - POST /api/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse, ApiError> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    info!("🔐 Login attempt: {}", email);

    let wrong_credentials = || ApiError::Unauthenticated(WRONG_CREDENTIALS.to_string());

    let Some((key, mut user)) = state.users.find_by_email(&email)? else {
        warn!("❌ Failed login attempt: {}", email);
        return Err(wrong_credentials());
    };

    if !verify_password_blocking(password, user.hash.clone()).await {
        warn!("❌ Failed login attempt: {}", email);
        return Err(wrong_credentials());
    }

    let tokens = issue_tokens(&state.users, &key, &mut user)?;
    info!(
        "✅ Login successful: {} ({})",
        user.email,
        user.authority.as_str()
    );

    Ok(token_response(&tokens))
}

/// Token refresh endpoint - GET /api/tokens
pub async fn refresh_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse, ApiError> {
    let presented = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let Some((key, mut user)) = state.users.find_by_refresh_token(presented)? else {
        warn!("❌ Refresh with unknown token");
        return Err(ApiError::NotFound(UNKNOWN_REFRESH_TOKEN.to_string()));
    };

    let tokens = issue_tokens(&state.users, &key, &mut user)?;
    info!("🔄 Tokens refreshed: {}", user.email);

    Ok(token_response(&tokens))
}
