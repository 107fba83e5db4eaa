//! Entity keys
//!
//! Opaque identifiers handed out to clients. A key names both the entity kind
//! and its id, so a key minted for one kind never resolves against another.

use super::StoreError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::fmt;
use uuid::Uuid;

const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    kind: String,
    id: Uuid,
}

impl EntityKey {
    pub fn new(kind: &str, id: Uuid) -> Self {
        Self {
            kind: kind.to_string(),
            id,
        }
    }

    /// Fresh key for a new entity of `kind`
    pub fn generate(kind: &str) -> Self {
        Self::new(kind, Uuid::new_v4())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Encode for transport (URL path segments, token subjects, ParentKey fields).
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}{}{}", self.kind, SEPARATOR, self.id))
    }

    pub fn decode(encoded: &str) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidKey(format!("{}: {}", reason, encoded));

        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|_| invalid("not base64"))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid("not utf-8"))?;
        let (kind, id) = raw
            .split_once(SEPARATOR)
            .ok_or_else(|| invalid("missing separator"))?;

        if kind.is_empty() {
            return Err(invalid("empty kind"));
        }
        let id = Uuid::parse_str(id).map_err(|_| invalid("bad id"))?;

        Ok(Self::new(kind, id))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
