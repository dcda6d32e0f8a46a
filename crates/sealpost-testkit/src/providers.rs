//! Key providers for tests.

use std::sync::Mutex;

use sealpost_core::{Identity, KeyMaterial, Scope};
use sealpost_keys::{KeyProvider, MemoryKeyProvider, ProviderError};

use crate::keys::all_fixtures;

/// A memory provider holding both halves of every fixture.
pub fn fixture_provider() -> MemoryKeyProvider {
    let provider = MemoryKeyProvider::new();
    for fixture in all_fixtures() {
        provider.insert_pair(fixture.identity, fixture.public, fixture.secret);
    }
    provider
}

/// Wraps a provider and fails every lookup for one identity.
pub struct FailingProvider<P> {
    inner: P,
    failing: Identity,
}

impl<P: KeyProvider> FailingProvider<P> {
    pub fn new(inner: P, failing: impl Into<Identity>) -> Self {
        Self {
            inner,
            failing: failing.into(),
        }
    }
}

impl<P: KeyProvider> KeyProvider for FailingProvider<P> {
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        if identity == &self.failing {
            return Err(ProviderError::Other(anyhow::anyhow!(
                "key server unavailable for {identity}"
            )));
        }
        self.inner.provide(identity, scope)
    }
}

/// Wraps a provider and records every call in order.
pub struct RecordingProvider<P> {
    inner: P,
    calls: Mutex<Vec<(Identity, Scope)>>,
}

impl<P: KeyProvider> RecordingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(identity, scope)` requested so far.
    pub fn calls(&self) -> Vec<(Identity, Scope)> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Just the identities requested so far.
    pub fn identities(&self) -> Vec<Identity> {
        self.calls().into_iter().map(|(identity, _)| identity).collect()
    }
}

impl<P: KeyProvider> KeyProvider for RecordingProvider<P> {
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((identity.clone(), scope));
        self.inner.provide(identity, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::keys::{OPEN, QWERT};

    #[test]
    fn test_fixture_provider_serves_both_scopes() {
        let provider = fixture_provider();
        let public = provider.provide(&QWERT.identity(), Scope::Public).unwrap();
        let secret = provider.provide(&QWERT.identity(), Scope::Private).unwrap();
        assert_eq!(public.as_str(), QWERT.public);
        assert_eq!(secret.as_str(), QWERT.secret);
    }

    #[test]
    fn test_failing_provider_only_fails_its_identity() {
        let provider = FailingProvider::new(fixture_provider(), QWERT.identity());
        assert!(provider.provide(&QWERT.identity(), Scope::Public).is_err());
        assert!(provider.provide(&OPEN.identity(), Scope::Public).is_ok());
    }

    #[test]
    fn test_recording_provider_keeps_order() {
        let provider = RecordingProvider::new(fixture_provider());
        let _ = provider.provide(&OPEN.identity(), Scope::Private);
        let _ = provider.provide(&QWERT.identity(), Scope::Public);

        assert_eq!(
            provider.calls(),
            vec![
                (OPEN.identity(), Scope::Private),
                (QWERT.identity(), Scope::Public)
            ]
        );
    }
}
