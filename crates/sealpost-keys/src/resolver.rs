//! Key resolution: provider lookup, parsing and scope validation per
//! identity.
//!
//! Multi-identity resolution is all-or-nothing. Identities are processed in
//! input order and the first failure aborts the whole resolution.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use sealpost_core::{
    parse_entity, validate_scope, Identity, KeyEntity, Passphrase, PublicEntity, Scope,
    ScopeError, UnlockedEntity, ValidatedEntity,
};

use crate::error::{ProviderError, ResolutionError};
use crate::provider::KeyProvider;

/// Fetch and parse the key block for `identity`, without scope checks.
fn fetch<P>(identity: &Identity, provider: &P, scope: Scope) -> Result<KeyEntity, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    debug!(%identity, %scope, "resolving key");

    let material = provider.provide(identity, scope).map_err(|source| {
        warn!(%identity, %scope, "key provider failed");
        ResolutionError::ProviderFailed {
            identity: identity.clone(),
            source,
        }
    })?;

    parse_entity(&material).map_err(|source| ResolutionError::ParseFailed {
        identity: identity.clone(),
        source,
    })
}

fn resolve_with<P, T, V>(
    identity: &Identity,
    provider: &P,
    scope: Scope,
    validate: V,
) -> Result<T, ResolutionError>
where
    P: KeyProvider + ?Sized,
    V: FnOnce(KeyEntity) -> Result<T, ScopeError>,
{
    let entity = fetch(identity, provider, scope)?;
    validate(entity).map_err(|source| ResolutionError::ScopeInvalid {
        identity: identity.clone(),
        source,
    })
}

/// Resolve one identity for `scope`.
pub fn resolve_one<P>(
    identity: &Identity,
    provider: &P,
    scope: Scope,
    passphrase: Option<&Passphrase>,
) -> Result<ValidatedEntity, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    resolve_with(identity, provider, scope, |entity| {
        validate_scope(entity, scope, passphrase)
    })
}

/// Resolve one identity for encryption.
pub fn resolve_public<P>(identity: &Identity, provider: &P) -> Result<PublicEntity, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    resolve_with(identity, provider, Scope::Public, KeyEntity::into_public)
}

/// Resolve one identity for signing or decryption, unlocking every secret
/// component with `passphrase`.
pub fn resolve_private<P>(
    identity: &Identity,
    provider: &P,
    passphrase: Option<&Passphrase>,
) -> Result<UnlockedEntity, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    resolve_with(identity, provider, Scope::Private, |entity| {
        entity.unlock(passphrase)
    })
}

/// Fetch the public key block for `identity` for signature verification.
///
/// Verification only needs the signer's certificate, so unlike
/// [`resolve_public`] this does not require an encryption-capable key.
pub fn resolve_signer<P>(identity: &Identity, provider: &P) -> Result<KeyEntity, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    fetch(identity, provider, Scope::Public)
}

/// Resolve every identity for `scope`, in input order.
///
/// Returns exactly one entity per identity or the first failure. Providers
/// are not called for identities after the failing one. Private scope uses
/// the empty passphrase.
pub fn resolve_many<P>(
    identities: &[Identity],
    provider: &P,
    scope: Scope,
) -> Result<Vec<ValidatedEntity>, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    identities
        .iter()
        .map(|identity| resolve_one(identity, provider, scope, None))
        .collect()
}

/// Resolve every identity for encryption, in input order.
pub fn resolve_public_many<P>(
    identities: &[Identity],
    provider: &P,
) -> Result<Vec<PublicEntity>, ResolutionError>
where
    P: KeyProvider + ?Sized,
{
    let entities = identities
        .iter()
        .map(|identity| resolve_public(identity, provider))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = entities.len(), "resolved recipients");
    Ok(entities)
}

/// Concurrent [`resolve_many`].
///
/// Provider calls run on blocking workers with at most `max_in_flight` in
/// progress. Results are inspected in input order, so the error reported is
/// the one a sequential scan would report. Lookups for identities after the
/// failing one may already have been issued; their results are discarded.
///
/// Must be called from within a tokio runtime.
pub async fn resolve_many_concurrent<P>(
    identities: &[Identity],
    provider: Arc<P>,
    scope: Scope,
    max_in_flight: usize,
) -> Result<Vec<ValidatedEntity>, ResolutionError>
where
    P: KeyProvider + ?Sized + 'static,
{
    concurrent(identities, provider, scope, max_in_flight, move |entity| {
        validate_scope(entity, scope, None)
    })
    .await
}

/// Concurrent [`resolve_public_many`].
pub async fn resolve_public_many_concurrent<P>(
    identities: &[Identity],
    provider: Arc<P>,
    max_in_flight: usize,
) -> Result<Vec<PublicEntity>, ResolutionError>
where
    P: KeyProvider + ?Sized + 'static,
{
    concurrent(
        identities,
        provider,
        Scope::Public,
        max_in_flight,
        KeyEntity::into_public,
    )
    .await
}

async fn concurrent<P, T, V>(
    identities: &[Identity],
    provider: Arc<P>,
    scope: Scope,
    max_in_flight: usize,
    validate: V,
) -> Result<Vec<T>, ResolutionError>
where
    P: KeyProvider + ?Sized + 'static,
    T: Send + 'static,
    V: Fn(KeyEntity) -> Result<T, ScopeError> + Copy + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));

    let handles: Vec<_> = identities
        .iter()
        .cloned()
        .map(|identity| {
            let permits = Arc::clone(&permits);
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                tokio::task::spawn_blocking(move || {
                    resolve_with(&identity, &*provider, scope, validate)
                })
                .await
            })
        })
        .collect();

    let mut resolved = Vec::with_capacity(handles.len());
    let mut pending = identities.iter().zip(handles);
    while let Some((identity, handle)) = pending.next() {
        let outcome = match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) | Err(e) => Err(ResolutionError::ProviderFailed {
                identity: identity.clone(),
                source: ProviderError::Other(anyhow::anyhow!("lookup task failed: {e}")),
            }),
        };

        match outcome {
            Ok(entity) => resolved.push(entity),
            Err(e) => {
                for (_, rest) in pending {
                    rest.abort();
                }
                return Err(e);
            }
        }
    }

    debug!(count = resolved.len(), %scope, "resolved identities concurrently");
    Ok(resolved)
}
