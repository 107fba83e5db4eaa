//! Password Hashing
//! Mission: One-way hash and verify stored credentials with bcrypt

use anyhow::{Context, Result};
use tracing::warn;

#[cfg(not(test))]
const HASH_COST: u32 = 14;
// minimum cost bcrypt accepts; keeps the test suite fast
#[cfg(test)]
const HASH_COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).context("Failed to hash password")
}

/// `false` on mismatch and on any verification failure (e.g. a corrupt hash).
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Password verification failed: {}", e);
            false
        }
    }
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task failed")?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or_else(|e| {
            warn!("Password verification task failed: {}", e);
            false
        })
}
