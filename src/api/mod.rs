//! HTTP API: shared state, routing, response envelope and handlers

pub mod error;
pub mod resources;
pub mod response;
pub mod rolls;
pub mod routes;
pub mod users;
pub mod validation;

#[cfg(test)]
pub mod test_support;

pub use error::ApiError;
pub use response::{ApiResponse, FieldErrors};
pub use routes::create_router;

use crate::auth::{AnonymousEndpoints, AuthState, UserStore};
use crate::store::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub users: UserStore,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        let users = UserStore::new(store.clone());
        let auth = AuthState::new(users.clone(), AnonymousEndpoints::standard());
        Self { store, users, auth }
    }
}
