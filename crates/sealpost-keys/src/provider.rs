//! The key lookup boundary.

use std::fmt;
use std::sync::Arc;

use sealpost_core::{Identity, KeyMaterial, Scope};

use crate::error::ProviderError;

/// Looks up armored key material for an identity.
///
/// Called once per identity per operation. Implementations may block on
/// I/O; the resolver never caches what they return.
pub trait KeyProvider: Send + Sync {
    /// Return the key block for `identity` at `scope`.
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError>;
}

impl<P: KeyProvider + ?Sized> KeyProvider for Arc<P> {
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        (**self).provide(identity, scope)
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for Box<P> {
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        (**self).provide(identity, scope)
    }
}

/// Adapter turning a closure into a [`KeyProvider`].
pub struct FnProvider<F>(F);

/// Use a closure as a key provider.
///
/// ```
/// use sealpost_keys::{from_fn, KeyProvider, ProviderError};
///
/// let provider = from_fn(|identity, scope| {
///     Err(ProviderError::NotFound { identity: identity.clone(), scope })
/// });
/// assert!(provider.provide(&"nobody@mail.xy".into(), sealpost_core::Scope::Public).is_err());
/// ```
pub fn from_fn<F>(f: F) -> FnProvider<F>
where
    F: Fn(&Identity, Scope) -> Result<KeyMaterial, ProviderError> + Send + Sync,
{
    FnProvider(f)
}

impl<F> KeyProvider for FnProvider<F>
where
    F: Fn(&Identity, Scope) -> Result<KeyMaterial, ProviderError> + Send + Sync,
{
    fn provide(&self, identity: &Identity, scope: Scope) -> Result<KeyMaterial, ProviderError> {
        (self.0)(identity, scope)
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnProvider")
    }
}
