//! Authentication Module
//! Mission: Stateless access tokens, single-active refresh tokens and ownership checks

pub mod api;
pub mod authz;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;
pub mod user_store;

pub use authz::{authorize, Decision};
pub use middleware::{auth_middleware, AnonymousEndpoints, AuthState};
pub use models::{Authority, Identity, User};
pub use token::AccessToken;
pub use user_store::UserStore;

/// Header carrying the base64 access token
pub const ACCESS_TOKEN_HEADER: &str = "anima-prime-token";
/// Header carrying the raw refresh token (refresh endpoint only)
pub const REFRESH_TOKEN_HEADER: &str = "anima-prime-refresh-token";
