//! Generic CRUD handlers for owned resources
//!
//! One handler set serves every [`Resource`] kind; `resource_routes::<R>()`
//! mounts it under `/api/{R::KIND}`.

use super::{
    response::location_for,
    validation::ValidatedJson,
    ApiError, ApiResponse, AppState,
};
use crate::auth::{authorize, Identity};
use crate::resources::{NewResource, Resource, ResourcePatch};
use crate::store::EntityKey;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::{info, warn};

/// `POST /api/K` and `GET|PUT|DELETE /api/K/:key`
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    let collection = format!("/api/{}", R::KIND);
    let item = format!("/api/{}/:key", R::KIND);

    Router::new()
        .route(&collection, post(create_resource::<R>))
        .route(
            &item,
            get(get_resource::<R>)
                .put(update_resource::<R>)
                .delete(delete_resource::<R>),
        )
}

/// Load an entity by its encoded key. Undecodable keys and keys of another
/// kind are reported like a missing entity.
pub(crate) fn load<R: Resource>(
    state: &AppState,
    raw_key: &str,
    not_found: &str,
) -> Result<(EntityKey, R), ApiError> {
    let missing = || ApiError::NotFound(not_found.to_string());

    let key = EntityKey::decode(raw_key).map_err(|_| missing())?;
    let entity = state.store.get::<R>(&key)?.ok_or_else(missing)?;
    Ok((key, entity))
}

/// Owner-or-admin gate
pub(crate) fn ensure_authorized<R: Resource>(
    identity: &Identity,
    key: &EntityKey,
    entity: &R,
    action: &str,
) -> Result<(), ApiError> {
    if authorize(identity, entity.parent_key()).is_allowed() {
        return Ok(());
    }

    warn!(
        user = %identity.key,
        kind = R::KIND,
        key = %key,
        "🚫 {} denied",
        action
    );
    Err(ApiError::Forbidden(format!(
        "You are not authorized to {} this {}",
        action,
        R::NOUN
    )))
}

/// Entity fields plus its encoded key as `ID`
fn with_id<R: Resource>(key: &EntityKey, entity: &R) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(entity)?;
    if let Value::Object(map) = &mut value {
        map.insert("ID".to_string(), Value::String(key.encode()));
    }
    Ok(value)
}

pub async fn create_resource<R: Resource>(
    State(state): State<AppState>,
    identity: Identity,
    headers: HeaderMap,
    ValidatedJson(NewResource(fields)): ValidatedJson<NewResource<R::Fields>>,
) -> Result<ApiResponse, ApiError> {
    let entity = R::create(fields, identity.key.clone());
    let key = state.store.insert(&entity)?;
    let encoded = key.encode();

    info!("✨ Created {} {} for {}", R::NOUN, encoded, identity.email);

    Ok(ApiResponse::created(
        json!({ "ID": encoded }),
        location_for(&headers, R::KIND, &encoded),
    ))
}

pub async fn get_resource<R: Resource>(
    State(state): State<AppState>,
    identity: Identity,
    Path(raw_key): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let (key, entity) = load::<R>(&state, &raw_key, &format!("There is no such {}", R::NOUN))?;
    ensure_authorized(&identity, &key, &entity, "retrieve")?;

    Ok(ApiResponse::ok(with_id(&key, &entity)?))
}

pub async fn update_resource<R: Resource>(
    State(state): State<AppState>,
    identity: Identity,
    Path(raw_key): Path<String>,
    ValidatedJson(ResourcePatch(fields)): ValidatedJson<ResourcePatch<R::Fields>>,
) -> Result<ApiResponse, ApiError> {
    let (key, mut entity) = load::<R>(
        &state,
        &raw_key,
        &format!("There is no such {} to update", R::NOUN),
    )?;
    ensure_authorized(&identity, &key, &entity, "update")?;

    entity.update(fields);
    state.store.put(&key, &entity)?;
    info!("📝 Updated {} {}", R::NOUN, raw_key);

    Ok(ApiResponse::updated())
}

pub async fn delete_resource<R: Resource>(
    State(state): State<AppState>,
    identity: Identity,
    Path(raw_key): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let (key, entity) = load::<R>(
        &state,
        &raw_key,
        &format!("There is no such {} to delete", R::NOUN),
    )?;
    ensure_authorized(&identity, &key, &entity, "delete")?;

    state.store.delete::<R>(&key)?;
    info!("🗑️ Deleted {} {}", R::NOUN, raw_key);

    Ok(ApiResponse::updated())
}
