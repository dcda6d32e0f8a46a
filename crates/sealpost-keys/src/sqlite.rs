//! SQLite-backed key store.
//!
//! Keeps one armored key block per `(identity, scope)`. Uses rusqlite with
//! bundled SQLite; lookups block the calling thread, which is what the
//! synchronous [`KeyProvider`] boundary expects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use sealpost_core::{Identity, KeyMaterial, Scope};

use crate::error::{ProviderError, Result, StoreError};
use crate::migration::{self, now_millis};
use crate::provider::KeyProvider;

/// SQLite-based key store.
///
/// Thread-safe via internal Mutex.
#[derive(Clone)]
pub struct SqliteKeyProvider {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyProvider {
    /// Open a key store at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory key store.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }

    /// Store `material` for `identity` at `scope`, replacing any previous
    /// block.
    pub fn put(&self, identity: &Identity, scope: Scope, material: &KeyMaterial) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO key_blocks (identity, scope, material, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (identity, scope)
                 DO UPDATE SET material = excluded.material, updated_at = excluded.updated_at",
                params![identity.as_str(), scope.as_str(), material.as_str(), now_millis()],
            )?;
            Ok(())
        })?;
        tracing::debug!(%identity, %scope, "stored key block");
        Ok(())
    }

    /// Remove a block. Returns true if one existed.
    pub fn remove(&self, identity: &Identity, scope: Scope) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM key_blocks WHERE identity = ?1 AND scope = ?2",
                params![identity.as_str(), scope.as_str()],
            )?;
            Ok(removed > 0)
        })
    }

    /// All identities holding a block at `scope`, sorted.
    pub fn identities(&self, scope: Scope) -> Result<Vec<Identity>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT identity FROM key_blocks WHERE scope = ?1 ORDER BY identity",
            )?;
            let rows = stmt.query_map(params![scope.as_str()], |row| row.get::<_, String>(0))?;

            let mut identities = Vec::new();
            for row in rows {
                identities.push(Identity::from(row?));
            }
            Ok(identities)
        })
    }

    fn lookup(&self, identity: &Identity, scope: Scope) -> Result<Option<KeyMaterial>> {
        self.with_conn(|conn| {
            let material = conn
                .query_row(
                    "SELECT material FROM key_blocks WHERE identity = ?1 AND scope = ?2",
                    params![identity.as_str(), scope.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(material.map(KeyMaterial::from))
        })
    }
}

impl KeyProvider for SqliteKeyProvider {
    fn provide(&self, identity: &Identity, scope: Scope) -> std::result::Result<KeyMaterial, ProviderError> {
        match self.lookup(identity, scope) {
            Ok(Some(material)) => Ok(material),
            Ok(None) => Err(ProviderError::NotFound {
                identity: identity.clone(),
                scope,
            }),
            Err(StoreError::Database(e)) => Err(ProviderError::Database(e)),
            Err(e) => Err(ProviderError::Other(e.into())),
        }
    }
}
