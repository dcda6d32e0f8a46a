//! In-memory key store.
//!
//! Same lookup semantics as the SQLite store but nothing is persisted.
//! Mostly useful for tests and for callers that already hold their keys.

use std::collections::HashMap;
use std::sync::RwLock;

use sealpost_core::{Identity, KeyMaterial, Scope};

use crate::error::ProviderError;
use crate::provider::KeyProvider;

/// In-memory key store keyed by `(identity, scope)`.
///
/// Thread-safe via RwLock.
pub struct MemoryKeyProvider {
    inner: RwLock<HashMap<(Identity, Scope), KeyMaterial>>,
}

impl MemoryKeyProvider {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Store `material` for `identity` at `scope`, replacing any previous
    /// entry.
    pub fn insert(&self, identity: impl Into<Identity>, scope: Scope, material: impl Into<KeyMaterial>) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.insert((identity.into(), scope), material.into());
    }

    /// Store both halves of a key pair.
    pub fn insert_pair(
        &self,
        identity: impl Into<Identity>,
        public: impl Into<KeyMaterial>,
        private: impl Into<KeyMaterial>,
    ) {
        let identity = identity.into();
        self.insert(identity.clone(), Scope::Public, public);
        self.insert(identity, Scope::Private, private);
    }

    /// Builder-style [`insert_pair`](Self::insert_pair).
    pub fn with_pair(
        self,
        identity: impl Into<Identity>,
        public: impl Into<KeyMaterial>,
        private: impl Into<KeyMaterial>,
    ) -> Self {
        self.insert_pair(identity, public, private);
        self
    }

    /// Remove an entry. Returns true if one existed.
    pub fn remove(&self, identity: &Identity, scope: Scope) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.remove(&(identity.clone(), scope)).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyProvider for MemoryKeyProvider {
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("memory key store lock poisoned"))?;

        inner
            .get(&(identity.clone(), scope))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                identity: identity.clone(),
                scope,
            })
    }
}
