//! Multi-recipient encryption.

use std::io::{self, Read};

use sequoia_openpgp::policy::StandardPolicy;
use sequoia_openpgp::serialize::stream::Recipient;

use sealpost_core::{Identity, PublicEntity};
use sealpost_keys::{resolve_public_many, KeyProvider};

use crate::artifact::EncryptedEnvelope;
use crate::error::EncryptError;
use crate::pipeline::{EnvelopeOptions, EnvelopePipeline};

/// Resolve `recipients` through `provider` and seal `plaintext` for all of
/// them.
///
/// One unresolvable recipient fails the whole call.
pub fn encrypt<R, P>(
    plaintext: R,
    recipients: &[Identity],
    provider: &P,
    options: &EnvelopeOptions,
) -> Result<EncryptedEnvelope, EncryptError>
where
    R: Read,
    P: KeyProvider + ?Sized,
{
    if recipients.is_empty() {
        return Err(EncryptError::NoRecipients);
    }

    let entities = resolve_public_many(recipients, provider)?;
    encrypt_for(plaintext, &entities, options)
}

/// Seal `plaintext` for already resolved recipients.
///
/// Every valid encryption-capable key of every recipient gets a copy of the
/// session key.
pub fn encrypt_for<R: Read>(
    mut plaintext: R,
    recipients: &[PublicEntity],
    options: &EnvelopeOptions,
) -> Result<EncryptedEnvelope, EncryptError> {
    if recipients.is_empty() {
        return Err(EncryptError::NoRecipients);
    }

    let policy = StandardPolicy::new();
    let mut keys: Vec<Recipient<'_>> = Vec::new();
    for entity in recipients {
        let before = keys.len();
        for key in entity
            .cert()
            .keys()
            .with_policy(&policy, None)
            .supported()
            .revoked(false)
            .for_transport_encryption()
            .for_storage_encryption()
        {
            keys.push(key.into());
        }

        if keys.len() == before {
            return Err(EncryptError::Crypto(format!(
                "no usable encryption key for {}",
                entity.cert().fingerprint()
            )));
        }
    }

    let mut pipeline = EnvelopePipeline::encrypt_for(keys, options)?;
    io::copy(&mut plaintext, &mut pipeline).map_err(EncryptError::Io)?;
    let envelope = EncryptedEnvelope::from_pipeline(pipeline.finish()?)?;

    tracing::debug!(
        recipients = recipients.len(),
        envelope_len = envelope.len(),
        "sealed envelope"
    );
    Ok(envelope)
}
