//! Authentication Middleware
//! Mission: Resolve the access token header into an Identity for every non-anonymous request

use crate::api::ApiError;
use crate::auth::{
    models::Identity, token::AccessToken, user_store::UserStore, ACCESS_TOKEN_HEADER,
};
use crate::store::EntityKey;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, Method},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

pub const CANNOT_AUTHENTICATE: &str = "This request cannot be authenticated";
pub const INVALID_TOKEN: &str = "Invalid access token";
pub const TOKEN_EXPIRED: &str = "Your token has expired.";
pub const REQUESTER_NOT_RECOGNIZED: &str = "The requester is not recognized";

/// State the auth middleware needs
#[derive(Clone)]
pub struct AuthState {
    pub users: UserStore,
    pub anonymous: Arc<AnonymousEndpoints>,
}

impl AuthState {
    pub fn new(users: UserStore, anonymous: AnonymousEndpoints) -> Self {
        Self {
            users,
            anonymous: Arc::new(anonymous),
        }
    }
}

/// (method, path) pairs that skip authentication. Built once at startup.
#[derive(Debug, Clone)]
pub struct AnonymousEndpoints {
    entries: Vec<(Method, String)>,
}

impl AnonymousEndpoints {
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Method, P)>,
        P: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(method, path)| (method, path.into()))
                .collect(),
        }
    }

    /// Registration, login and token refresh
    pub fn standard() -> Self {
        Self::new([
            (Method::POST, "/api/users"),
            (Method::POST, "/api/login"),
            (Method::GET, "/api/tokens"),
        ])
    }

    pub fn allows(&self, method: &Method, path: &str) -> bool {
        self.entries
            .iter()
            .any(|(m, p)| m == method && p == path)
    }
}

/// Validate a raw token header value and load the requesting user.
pub fn authenticate(
    state: &AuthState,
    token_header: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Identity, ApiError> {
    let raw = token_header
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated(CANNOT_AUTHENTICATE.to_string()))?;

    let token = AccessToken::decode(raw).map_err(|e| {
        warn!("Rejected access token: {}", e);
        ApiError::BadRequest(INVALID_TOKEN.to_string())
    })?;

    if token.is_expired_at(now) {
        debug!(subject = %token.subject, "Rejected expired access token");
        return Err(ApiError::Unauthenticated(TOKEN_EXPIRED.to_string()));
    }

    let not_recognized = || ApiError::Unauthenticated(REQUESTER_NOT_RECOGNIZED.to_string());

    let key = EntityKey::decode(&token.subject).map_err(|e| {
        warn!("Access token subject is not a user key: {}", e);
        not_recognized()
    })?;
    let user = state.users.get(&key)?.ok_or_else(|| {
        warn!(subject = %token.subject, "Access token for unknown user");
        not_recognized()
    })?;

    Ok(Identity::from_user(&key, &user))
}

/// Auth middleware: anonymous endpoints pass straight through, everything
/// else needs a valid token and gets an [`Identity`] attached.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.anonymous.allows(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let header = match req.headers().get(ACCESS_TOKEN_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::BadRequest(INVALID_TOKEN.to_string()))?,
        ),
        None => None,
    };

    let identity = authenticate(&state, header, Utc::now())?;
    debug!(
        user = %identity.key,
        authority = identity.authority.as_str(),
        "Authenticated request"
    );

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated(CANNOT_AUTHENTICATE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Authority, User};
    use crate::auth::token::TIMESTAMP_FORMAT;
    use crate::store::DocumentStore;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use chrono::Duration;
    use tower::ServiceExt;

    fn create_test_state() -> (AuthState, EntityKey) {
        let users = UserStore::new(DocumentStore::in_memory().unwrap());
        let user = User::new("Test", "test@anima.test", "hash".into(), Authority::Regular);
        let key = users.insert(&user).unwrap();
        (AuthState::new(users, AnonymousEndpoints::standard()), key)
    }

    fn token_issued_at(subject: &str, issued_at: DateTime<Utc>) -> String {
        let raw = format!("{}|{}|1|abcde", subject, issued_at.format(TIMESTAMP_FORMAT));
        BASE64.encode(raw)
    }

    #[test]
    fn test_anonymous_endpoints() {
        let anonymous = AnonymousEndpoints::standard();
        assert!(anonymous.allows(&Method::POST, "/api/users"));
        assert!(anonymous.allows(&Method::POST, "/api/login"));
        assert!(anonymous.allows(&Method::GET, "/api/tokens"));

        assert!(!anonymous.allows(&Method::GET, "/api/users"));
        assert!(!anonymous.allows(&Method::POST, "/api/tokens"));
        assert!(!anonymous.allows(&Method::POST, "/api/users/abc"));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let (state, key) = create_test_state();
        let token = AccessToken::issue(&key.encode()).encode();

        let identity = authenticate(&state, Some(&token), Utc::now()).unwrap();
        assert_eq!(identity.key, key.encode());
        assert_eq!(identity.email, "test@anima.test");
        assert_eq!(identity.authority, Authority::Regular);
    }

    #[test]
    fn test_authenticate_missing_header() {
        let (state, _) = create_test_state();
        for header in [None, Some("")] {
            match authenticate(&state, header, Utc::now()) {
                Err(ApiError::Unauthenticated(msg)) => assert_eq!(msg, CANNOT_AUTHENTICATE),
                other => panic!("expected 401, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_authenticate_malformed_token() {
        let (state, _) = create_test_state();
        let three_fields = BASE64.encode("a|b|c");

        for token in ["@@@", three_fields.as_str()] {
            match authenticate(&state, Some(token), Utc::now()) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, INVALID_TOKEN),
                other => panic!("expected 400, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_authenticate_expired_token() {
        let (state, key) = create_test_state();
        let issued = Utc::now() - Duration::days(2);
        let token = token_issued_at(&key.encode(), issued);

        match authenticate(&state, Some(&token), Utc::now()) {
            Err(ApiError::Unauthenticated(msg)) => assert_eq!(msg, TOKEN_EXPIRED),
            other => panic!("expected 401, got {:?}", other),
        }
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let (state, _) = create_test_state();
        let stranger = EntityKey::generate("users").encode();
        let garbage_subject = "not-a-key";

        for subject in [stranger.as_str(), garbage_subject] {
            let token = AccessToken::issue(subject).encode();
            match authenticate(&state, Some(&token), Utc::now()) {
                Err(ApiError::Unauthenticated(msg)) => assert_eq!(msg, REQUESTER_NOT_RECOGNIZED),
                other => panic!("expected 401, got {:?}", other),
            }
        }
    }

    async fn whoami(identity: Identity) -> String {
        identity.email
    }

    fn test_router(state: AuthState) -> Router {
        Router::new()
            .route("/api/me", get(whoami))
            .route("/api/login", post(|| async { "anonymous ok" }))
            .route_layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    #[tokio::test]
    async fn test_middleware_attaches_identity() {
        let (state, key) = create_test_state();
        let token = AccessToken::issue(&key.encode()).encode();

        let response = test_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/api/me")
                    .header(ACCESS_TOKEN_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"test@anima.test");
    }

    #[tokio::test]
    async fn test_middleware_rejects_without_token() {
        let (state, _) = create_test_state();

        let response = test_router(state)
            .oneshot(HttpRequest::builder().uri("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_lets_anonymous_through() {
        let (state, _) = create_test_state();

        let response = test_router(state)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
