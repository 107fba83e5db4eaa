//! Dice and trait-tick helpers

use super::{
    resources::{ensure_authorized, load},
    ApiError, ApiResponse, AppState,
};
use crate::auth::Identity;
use crate::resources::Character;
use axum::extract::{Path, Query, State};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const MAX_DICE: i64 = 100;
pub const NO_SUCH_TRAIT: &str = "There is no trait with specified index";

/// PATCH /api/characters/:key/traits/:index
///
/// Flips `IsTicked` on one of the character's traits.
pub async fn toggle_trait(
    State(state): State<AppState>,
    identity: Identity,
    Path((raw_key, raw_index)): Path<(String, String)>,
) -> Result<ApiResponse, ApiError> {
    let (key, mut character) = load::<Character>(&state, &raw_key, "There is no such character")?;
    ensure_authorized(&identity, &key, &character, "update")?;

    let index: i64 = raw_index
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid trait index: {}", raw_index)))?;

    let traits_len = character.traits.len();
    let Some(slot) = usize::try_from(index).ok().filter(|&i| i < traits_len) else {
        debug!(index, traits_len, "trait index out of range");
        return Err(ApiError::NotFound(NO_SUCH_TRAIT.to_string()));
    };

    character.traits[slot].toggle();
    state.store.put(&key, &character)?;

    Ok(ApiResponse::updated())
}

#[derive(Debug, Deserialize)]
pub struct RollQuery {
    #[serde(rename = "dieQty")]
    pub die_qty: Option<String>,
}

/// `qty` independent d6 results
pub fn roll_dice(qty: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..qty).map(|_| rng.gen_range(1..=6)).collect()
}

/// GET /api/rolls?dieQty=N
pub async fn reroll(Query(query): Query<RollQuery>) -> Result<ApiResponse, ApiError> {
    let raw = query.die_qty.unwrap_or_default();
    let qty: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid dieQty: {:?}", raw)))?;

    if !(1..=MAX_DICE).contains(&qty) {
        return Err(ApiError::BadRequest(format!(
            "dieQty must be between 1 and {}",
            MAX_DICE
        )));
    }

    Ok(ApiResponse::ok(json!({ "Dice": roll_dice(qty as usize) })))
}
