//! The Sealer: unified API over key resolution and envelopes.
//!
//! A Sealer owns one key provider and a configuration. Every call resolves
//! keys afresh through the provider; nothing is cached between calls.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sealpost_core::{Identity, KeyEntity, Passphrase, Scope, ValidatedEntity};
use sealpost_envelope::{
    EncryptError, EncryptedEnvelope, EnvelopeOptions, SignatureEnvelope,
};
use sealpost_keys::{resolve_one, resolve_public_many_concurrent, KeyProvider};

use crate::body::SealedBody;
use crate::error::{Result, SealError};

/// Configuration for the Sealer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealerConfig {
    /// `Comment:` header added to every armored envelope.
    pub armor_comment: Option<String>,
    /// Upper bound on concurrent provider lookups in
    /// [`Sealer::encrypt_async`].
    pub max_concurrent_lookups: usize,
}

impl Default for SealerConfig {
    fn default() -> Self {
        Self {
            armor_comment: None,
            max_concurrent_lookups: 8,
        }
    }
}

impl SealerConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SealError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_lookups == 0 {
            return Err(SealError::Config(
                "max_concurrent_lookups must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn envelope_options(&self) -> EnvelopeOptions {
        EnvelopeOptions {
            armor_comment: self.armor_comment.clone(),
        }
    }
}

/// The main Sealer struct.
///
/// Provides a unified API for:
/// - Encrypting for recipients resolved by identity
/// - Detached signing with a passphrase-unlocked sender key
/// - Decrypting and verifying
/// - Composer-facing sealed bodies
pub struct Sealer<P: KeyProvider> {
    /// Where key material comes from.
    provider: Arc<P>,
    /// Configuration.
    config: SealerConfig,
}

impl<P: KeyProvider> Sealer<P> {
    /// Create a new sealer.
    pub fn new(provider: P, config: SealerConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Get the provider reference.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &SealerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt `plaintext` for every recipient.
    ///
    /// Fails as a whole if any recipient cannot be resolved.
    pub fn encrypt<R: Read>(&self, plaintext: R, recipients: &[Identity]) -> Result<EncryptedEnvelope> {
        Ok(sealpost_envelope::encrypt(
            plaintext,
            recipients,
            &*self.provider,
            &self.config.envelope_options(),
        )?)
    }

    /// Produce a detached signature over `plaintext` as `sender`.
    pub fn sign<R: Read>(
        &self,
        plaintext: R,
        sender: &Identity,
        passphrase: &Passphrase,
    ) -> Result<SignatureEnvelope> {
        Ok(sealpost_envelope::sign(
            plaintext,
            sender,
            &*self.provider,
            Some(passphrase),
            &self.config.envelope_options(),
        )?)
    }

    /// Wrap `body` for `recipients`; encryption happens when the composer
    /// drains it.
    pub fn seal_body(&self, body: impl Into<Vec<u8>>, recipients: Vec<Identity>) -> SealedBody<'_, P> {
        SealedBody::new(self, body.into(), recipients)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Open `envelope` as `recipient`.
    pub fn decrypt(
        &self,
        envelope: &str,
        recipient: &Identity,
        passphrase: &Passphrase,
    ) -> Result<Vec<u8>> {
        Ok(sealpost_envelope::decrypt(
            envelope,
            recipient,
            &*self.provider,
            Some(passphrase),
        )?)
    }

    /// Check a detached signature against an entity already in hand.
    pub fn verify<E>(&self, signature: &str, signer: &E, message: &[u8]) -> Result<bool>
    where
        E: AsRef<KeyEntity> + ?Sized,
    {
        Ok(sealpost_envelope::verify(signature, signer, message)?)
    }

    /// Check a detached signature against `signer`'s public key from the
    /// provider.
    pub fn verify_from(&self, signature: &str, signer: &Identity, message: &[u8]) -> Result<bool> {
        Ok(sealpost_envelope::verify_from(
            signature,
            signer,
            &*self.provider,
            message,
        )?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keys
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve and validate a single identity.
    pub fn resolve(
        &self,
        identity: &Identity,
        scope: Scope,
        passphrase: Option<&Passphrase>,
    ) -> Result<ValidatedEntity> {
        Ok(resolve_one(identity, &*self.provider, scope, passphrase)?)
    }
}

impl<P: KeyProvider + 'static> Sealer<P> {
    /// [`encrypt`](Self::encrypt) with recipient lookups run concurrently,
    /// at most `max_concurrent_lookups` at a time.
    ///
    /// The reported failure is the first one in recipient order.
    pub async fn encrypt_async<R: Read>(
        &self,
        plaintext: R,
        recipients: &[Identity],
    ) -> Result<EncryptedEnvelope> {
        if recipients.is_empty() {
            return Err(EncryptError::NoRecipients.into());
        }

        let entities = resolve_public_many_concurrent(
            recipients,
            Arc::clone(&self.provider),
            self.config.max_concurrent_lookups,
        )
        .await
        .map_err(EncryptError::from)?;

        Ok(sealpost_envelope::encrypt_for(
            plaintext,
            &entities,
            &self.config.envelope_options(),
        )?)
    }
}
