//! Document Store
//!
//! SQLite-backed entity storage. Every entity is a JSON document addressed by
//! an [`EntityKey`]; lookups go by key or by equality on a top-level field.
//!
//! ```sql
//! CREATE TABLE entities (
//!     kind TEXT NOT NULL,
//!     id   TEXT NOT NULL,
//!     body TEXT NOT NULL,
//!     PRIMARY KEY (kind, id)
//! ) WITHOUT ROWID;
//! ```

pub mod key;

pub use key::EntityKey;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Anything that can be written to and read back from the store.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Kind name; also the path segment under `/api/`.
    const KIND: &'static str;
}

/// An entity stamped with the key of the user who created it.
pub trait Owned: Entity {
    fn parent_key(&self) -> &str;
}

/// Shared handle to the entity database.
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Open (or create) a store backed by the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        "#,
        )?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        info!("📦 Document store opened at {}", path.as_ref().display());
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entities (
                kind TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (kind, id)
            ) WITHOUT ROWID",
            [],
        )?;
        Ok(())
    }

    /// Reserve a key for an entity that has not been written yet.
    pub fn allocate_key<E: Entity>(&self) -> EntityKey {
        EntityKey::generate(E::KIND)
    }

    /// Fetch an entity. A key of another kind resolves to `None`.
    pub fn get<E: Entity>(&self, key: &EntityKey) -> Result<Option<E>, StoreError> {
        if key.kind() != E::KIND {
            return Ok(None);
        }

        let conn = self.conn.lock();
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM entities WHERE kind = ?1 AND id = ?2",
                params![E::KIND, key.id().to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// Insert or overwrite the entity stored under `key`.
    pub fn put<E: Entity>(&self, key: &EntityKey, entity: &E) -> Result<(), StoreError> {
        if key.kind() != E::KIND {
            return Err(StoreError::InvalidKey(format!(
                "{} key used for {} entity",
                key.kind(),
                E::KIND
            )));
        }

        let body = serde_json::to_string(entity)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO entities (kind, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (kind, id) DO UPDATE SET body = excluded.body",
            params![E::KIND, key.id().to_string(), body],
        )?;

        debug!(kind = E::KIND, key = %key, "entity written");
        Ok(())
    }

    /// Store a new entity under a freshly allocated key.
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<EntityKey, StoreError> {
        let key = self.allocate_key::<E>();
        self.put(&key, entity)?;
        Ok(key)
    }

    /// All entities of kind `E` whose top-level `field` equals `value`.
    pub fn query_eq<E: Entity>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<(EntityKey, E)>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, body FROM entities
             WHERE kind = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![E::KIND, json_path(field), value], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for (id, body) in rows {
            let id = Uuid::parse_str(&id)
                .map_err(|_| StoreError::InvalidKey(format!("corrupt id in store: {}", id)))?;
            out.push((EntityKey::new(E::KIND, id), serde_json::from_str(&body)?));
        }
        Ok(out)
    }

    /// First match of [`query_eq`](Self::query_eq), if any.
    pub fn find_one<E: Entity>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<(EntityKey, E)>, StoreError> {
        Ok(self.query_eq(field, value)?.into_iter().next())
    }

    pub fn count_eq<E: Entity>(&self, field: &str, value: &str) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entities WHERE kind = ?1 AND json_extract(body, ?2) = ?3",
            params![E::KIND, json_path(field), value],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Remove an entity. Returns whether anything was deleted.
    pub fn delete<E: Entity>(&self, key: &EntityKey) -> Result<bool, StoreError> {
        if key.kind() != E::KIND {
            return Ok(false);
        }

        let conn = self.conn.lock();
        let rows = conn.execute(
            "DELETE FROM entities WHERE kind = ?1 AND id = ?2",
            params![E::KIND, key.id().to_string()],
        )?;

        if rows > 0 {
            debug!(kind = E::KIND, key = %key, "entity deleted");
        }
        Ok(rows > 0)
    }
}

fn json_path(field: &str) -> String {
    format!("$.{}", field)
}

/// Errors from the document store.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serialization(serde_json::Error),
    InvalidKey(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "SQLite error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidKey(reason) => write!(f, "Invalid key: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
