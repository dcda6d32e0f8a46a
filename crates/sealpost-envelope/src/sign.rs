//! Detached signatures.

use std::io::{Read, Write};

use sequoia_openpgp::policy::StandardPolicy;

use sealpost_core::{Identity, Passphrase, UnlockedEntity, UnlockedKey};
use sealpost_keys::{resolve_private, KeyProvider};

use crate::artifact::SignatureEnvelope;
use crate::error::SignError;
use crate::pipeline::{EnvelopeOptions, EnvelopePipeline};

/// Resolve `sender`'s private key through `provider`, unlock it with
/// `passphrase` and produce a detached signature over `plaintext`.
pub fn sign<R, P>(
    plaintext: R,
    sender: &Identity,
    provider: &P,
    passphrase: Option<&Passphrase>,
    options: &EnvelopeOptions,
) -> Result<SignatureEnvelope, SignError>
where
    R: Read,
    P: KeyProvider + ?Sized,
{
    let entity = resolve_private(sender, provider, passphrase)?;
    sign_with(plaintext, &entity, options)
}

/// Produce a detached signature with an already unlocked entity.
///
/// The plaintext is buffered in full before signing.
pub fn sign_with<R: Read>(
    mut plaintext: R,
    signer: &UnlockedEntity,
    options: &EnvelopeOptions,
) -> Result<SignatureEnvelope, SignError> {
    let mut message = Vec::new();
    plaintext.read_to_end(&mut message).map_err(SignError::Io)?;

    let key = signing_key(signer)?;
    let keypair = key
        .keypair()
        .map_err(|e| SignError::SigningFailed(e.to_string()))?;

    let mut pipeline = EnvelopePipeline::detached_signature(keypair, options)?;
    pipeline.write_all(&message).map_err(SignError::Io)?;
    let signature = SignatureEnvelope::from_pipeline(pipeline.finish()?)?;

    tracing::debug!(
        key = %key.key_id(),
        message_len = message.len(),
        "signed message"
    );
    Ok(signature)
}

/// The newest valid signing-capable key, primary included.
fn signing_key(entity: &UnlockedEntity) -> Result<&UnlockedKey, SignError> {
    let policy = StandardPolicy::new();
    let fingerprint = entity
        .cert()
        .keys()
        .with_policy(&policy, None)
        .supported()
        .revoked(false)
        .for_signing()
        .max_by_key(|ka| ka.key().creation_time())
        .map(|ka| ka.key().fingerprint())
        .ok_or_else(|| SignError::SigningFailed("no signing-capable key".into()))?;

    entity
        .unlocked_key(&fingerprint)
        .ok_or_else(|| SignError::SigningFailed(format!("signing key {} has no secret", fingerprint)))
}
