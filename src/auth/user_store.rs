//! User Storage
//! Mission: Look up and persist user accounts in the document store

use crate::auth::models::{Authority, User};
use crate::auth::password::hash_password;
use crate::auth::token::generate_refresh_token;
use crate::store::{DocumentStore, EntityKey};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// User accounts on top of the shared document store
#[derive(Clone)]
pub struct UserStore {
    store: DocumentStore,
}

impl UserStore {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn get(&self, key: &EntityKey) -> Result<Option<User>> {
        self.store
            .get::<User>(key)
            .with_context(|| format!("Failed to load user {}", key))
    }

    /// Get user by email
    pub fn find_by_email(&self, email: &str) -> Result<Option<(EntityKey, User)>> {
        self.store
            .find_one::<User>("Email", email)
            .context("Failed to query users by email")
    }

    /// Get user holding the given refresh token
    pub fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<(EntityKey, User)>> {
        if refresh_token.is_empty() {
            return Ok(None);
        }
        self.store
            .find_one::<User>("RefreshToken", refresh_token)
            .context("Failed to query users by refresh token")
    }

    /// Pre-insert uniqueness check. Two concurrent registrations can both pass it.
    pub fn email_in_use(&self, email: &str) -> Result<bool> {
        let count = self
            .store
            .count_eq::<User>("Email", email)
            .context("Failed to check email usage")?;
        Ok(count > 0)
    }

    pub fn insert(&self, user: &User) -> Result<EntityKey> {
        let key = self.store.insert(user).context("Failed to insert user")?;
        info!("✅ Created user: {} ({})", user.email, user.authority.as_str());
        Ok(key)
    }

    pub fn save(&self, key: &EntityKey, user: &User) -> Result<()> {
        self.store
            .put(key, user)
            .with_context(|| format!("Failed to save user {}", key))
    }

    /// Create an admin account for initial setup unless one already exists
    pub fn ensure_admin(&self, email: &str, password: &str) -> Result<Option<EntityKey>> {
        let admins = self
            .store
            .count_eq::<User>("Authority", Authority::Admin.as_str())
            .context("Failed to check for admin users")?;
        if admins > 0 {
            return Ok(None);
        }

        if self.email_in_use(email)? {
            warn!(
                "⚠️  Cannot bootstrap admin: {} is already registered as a regular user",
                email
            );
            return Ok(None);
        }

        let mut admin = User::new("Administrator", email, hash_password(password)?, Authority::Admin);
        admin.refresh_token = generate_refresh_token();

        let key = self.insert(&admin)?;
        info!("🔐 Bootstrap admin created: {} ({})", email, key);
        Ok(Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    fn create_test_store() -> UserStore {
        UserStore::new(DocumentStore::in_memory().unwrap())
    }

    fn regular(email: &str) -> User {
        let mut user = User::new("Test User", email, hash_password("secret").unwrap(), Authority::Regular);
        user.refresh_token = generate_refresh_token();
        user
    }

    #[test]
    fn test_create_and_find_by_email() {
        let store = create_test_store();
        let key = store.insert(&regular("a@b.com")).unwrap();

        let (found_key, found) = store.find_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(found_key, key);
        assert_eq!(found.email, "a@b.com");
        assert!(verify_password("secret", &found.hash));

        assert!(store.find_by_email("nobody@b.com").unwrap().is_none());
    }

    #[test]
    fn test_email_in_use() {
        let store = create_test_store();
        assert!(!store.email_in_use("a@b.com").unwrap());

        store.insert(&regular("a@b.com")).unwrap();
        assert!(store.email_in_use("a@b.com").unwrap());
    }

    #[test]
    fn test_refresh_token_lookup_follows_overwrite() {
        let store = create_test_store();
        let user = regular("a@b.com");
        let old_token = user.refresh_token.clone();
        let key = store.insert(&user).unwrap();

        assert!(store.find_by_refresh_token(&old_token).unwrap().is_some());

        let mut updated = store.get(&key).unwrap().unwrap();
        updated.refresh_token = generate_refresh_token();
        store.save(&key, &updated).unwrap();

        assert!(store.find_by_refresh_token(&old_token).unwrap().is_none());
        let (found_key, _) = store
            .find_by_refresh_token(&updated.refresh_token)
            .unwrap()
            .unwrap();
        assert_eq!(found_key, key);
        assert!(store.find_by_refresh_token("").unwrap().is_none());
    }

    #[test]
    fn test_ensure_admin_only_once() {
        let store = create_test_store();

        let first = store.ensure_admin("admin@anima.test", "admin-pass").unwrap();
        assert!(first.is_some());

        let (_, admin) = store.find_by_email("admin@anima.test").unwrap().unwrap();
        assert_eq!(admin.authority, Authority::Admin);

        let second = store.ensure_admin("other@anima.test", "admin-pass").unwrap();
        assert!(second.is_none());
        assert!(store.find_by_email("other@anima.test").unwrap().is_none());
    }

    #[test]
    fn test_ensure_admin_refuses_taken_email() {
        let store = create_test_store();
        store.insert(&regular("taken@anima.test")).unwrap();

        assert!(store.ensure_admin("taken@anima.test", "pw").unwrap().is_none());
        let (_, user) = store.find_by_email("taken@anima.test").unwrap().unwrap();
        assert_eq!(user.authority, Authority::Regular);
    }
}
