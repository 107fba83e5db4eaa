//! Ownership Authorization
//! Mission: Decide whether an identity may touch a record it did not necessarily create

use crate::auth::models::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Admins may touch anything; everyone else only records whose owner key is
/// exactly their own key.
pub fn authorize(identity: &Identity, owner_key: &str) -> Decision {
    if identity.is_admin() || identity.key == owner_key {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
