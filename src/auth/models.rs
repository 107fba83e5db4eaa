//! Authentication Models
//! Mission: Define user accounts, authorities and the per-request identity

use crate::store::{Entity, EntityKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account as persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub full_name: String,
    pub email: String,
    pub hash: String, // bcrypt hash
    pub authority: Authority,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Entity for User {
    const KIND: &'static str = "users";
}

impl User {
    pub fn new(full_name: &str, email: &str, hash: String, authority: Authority) -> Self {
        let now = Utc::now();
        Self {
            full_name: full_name.to_string(),
            email: email.to_string(),
            hash,
            authority,
            refresh_token: String::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Coarse role governing the ownership bypass
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Authority {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "regular")]
    #[default]
    Regular,
}

impl Authority {
    pub fn as_str(&self) -> &str {
        match self {
            Authority::Admin => "admin",
            Authority::Regular => "regular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Authority::Admin),
            "regular" => Some(Authority::Regular),
            _ => None,
        }
    }
}

/// Who is making the current request. Built by the auth middleware and
/// handed to handlers through the `Identity` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub key: String, // encoded user key
    pub email: String,
    pub authority: Authority,
}

impl Identity {
    pub fn from_user(key: &EntityKey, user: &User) -> Self {
        Self {
            key: key.encode(),
            email: user.email.clone(),
            authority: user.authority,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.authority == Authority::Admin
    }
}

/// Sanitized user view; never carries the hash or refresh token
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    pub full_name: String,
    pub email: String,
    pub authority: Authority,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            authority: user.authority,
        }
    }
}

/// Freshly minted access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
