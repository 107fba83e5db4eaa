//! User self-service endpoints

use super::{
    response::location_for,
    validation::{require, Validate, ValidatedJson},
    ApiError, ApiResponse, AppState, FieldErrors,
};
use crate::auth::{
    authorize,
    models::{Authority, Identity, User, UserResponse},
    password::hash_password_blocking,
    token::{generate_refresh_token, AccessToken},
};
use crate::store::{Entity, EntityKey};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

pub const PASSWORD_MISMATCH: &str = "Make sure this field is exactly the same with Password";
pub const EMAIL_TAKEN: &str = "The email has already been used";

/// Registration body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        require(&[
            ("FullName", self.full_name.is_some()),
            ("Password", self.password.is_some()),
            ("PasswordConfirm", self.password_confirm.is_some()),
            ("Email", self.email.is_some()),
        ])?;

        if self.password != self.password_confirm {
            return Err(FieldErrors::single("PasswordConfirm", PASSWORD_MISMATCH));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub authority: Option<Authority>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

fn email_taken() -> ApiError {
    ApiError::Conflict(FieldErrors::single("Email", EMAIL_TAKEN))
}

fn load_user(state: &AppState, raw_key: &str, not_found: &str) -> Result<(EntityKey, User), ApiError> {
    let missing = || ApiError::NotFound(not_found.to_string());

    let key = EntityKey::decode(raw_key).map_err(|_| missing())?;
    let user = state.users.get(&key)?.ok_or_else(missing)?;
    Ok((key, user))
}

/// Registration - POST /api/users
///
/// Self-registered accounts are always `regular`.
pub async fn register_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<ApiResponse, ApiError> {
    let email = payload.email.unwrap_or_default();

    if state.users.email_in_use(&email)? {
        warn!("❌ Registration with existing email: {}", email);
        return Err(email_taken());
    }

    let hash = hash_password_blocking(payload.password.unwrap_or_default()).await?;
    let mut user = User::new(
        &payload.full_name.unwrap_or_default(),
        &email,
        hash,
        Authority::Regular,
    );
    user.refresh_token = generate_refresh_token();

    let key = state.users.insert(&user)?;
    let encoded = key.encode();
    let token = AccessToken::issue(&encoded).encode();

    Ok(ApiResponse::created(
        json!({
            "Token": token,
            "RefreshToken": user.refresh_token,
        }),
        location_for(&headers, User::KIND, &encoded),
    ))
}

/// GET /api/users/:user_key
pub async fn get_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(raw_key): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let (key, user) = load_user(&state, &raw_key, "There is no such user to retrieve")?;

    if !authorize(&identity, &key.encode()).is_allowed() {
        warn!(user = %identity.key, target = %key, "🚫 user lookup denied");
        return Err(ApiError::Forbidden(
            "You are not eligible to retrieve this user data".to_string(),
        ));
    }

    Ok(ApiResponse::ok(serde_json::to_value(UserResponse::from_user(&user))?))
}

/// PUT /api/users/:user_key
pub async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(raw_key): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<ApiResponse, ApiError> {
    let (key, mut user) = load_user(&state, &raw_key, "There is no such user to update")?;

    if !authorize(&identity, &key.encode()).is_allowed() {
        warn!(user = %identity.key, target = %key, "🚫 user update denied");
        return Err(ApiError::Forbidden(
            "You are not eligible to update this user".to_string(),
        ));
    }

    if let Some(authority) = payload.authority {
        if authority != user.authority && !identity.is_admin() {
            warn!(user = %identity.key, "🚫 Authority change denied");
            return Err(ApiError::Forbidden(
                "You are not eligible to change the authority of this user".to_string(),
            ));
        }
        user.authority = authority;
    }

    if let Some(email) = payload.email {
        if email != user.email && state.users.email_in_use(&email)? {
            return Err(email_taken());
        }
        user.email = email;
    }

    if let Some(full_name) = payload.full_name {
        user.full_name = full_name;
    }

    user.touch();
    state.users.save(&key, &user)?;
    info!("📝 Updated user {}", user.email);

    Ok(ApiResponse::updated())
}
