//! Opening encrypted envelopes.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sequoia_openpgp as openpgp;
use openpgp::crypto::{KeyPair, SessionKey};
use openpgp::packet::{PKESK, SKESK};
use openpgp::parse::stream::{
    DecryptionHelper, DecryptorBuilder, MessageStructure, VerificationHelper,
};
use openpgp::parse::Parse;
use openpgp::policy::StandardPolicy;
use openpgp::types::SymmetricAlgorithm;
use openpgp::{Cert, KeyHandle};

use sealpost_core::{armor, ArmorKind, Identity, Passphrase, UnlockedEntity};
use sealpost_keys::{resolve_private, KeyProvider};

use crate::error::DecryptError;

/// Resolve `recipient`'s private key through `provider`, unlock it with
/// `passphrase` and open `envelope`.
pub fn decrypt<P>(
    envelope: &str,
    recipient: &Identity,
    provider: &P,
    passphrase: Option<&Passphrase>,
) -> Result<Vec<u8>, DecryptError>
where
    P: KeyProvider + ?Sized,
{
    let entity = resolve_private(recipient, provider, passphrase)?;
    decrypt_with(envelope, &entity)
}

/// Open `envelope` with an already unlocked entity.
pub fn decrypt_with(envelope: &str, entity: &UnlockedEntity) -> Result<Vec<u8>, DecryptError> {
    let block = armor::decode(envelope).map_err(malformed)?;
    if block.kind != ArmorKind::Message {
        return Err(DecryptError::MalformedEnvelope(format!(
            "expected a PGP MESSAGE block, found {}",
            block.kind
        )));
    }

    let keypairs = entity
        .unlocked_keys()
        .map(|key| key.keypair())
        .collect::<openpgp::Result<Vec<_>>>()
        .map_err(malformed)?;
    let outcome = Arc::new(Outcome::default());
    let helper = Keyring {
        cert: entity.cert().clone(),
        keypairs,
        outcome: Arc::clone(&outcome),
    };

    let policy = StandardPolicy::new();
    let mut plaintext = Vec::new();
    let result = DecryptorBuilder::from_bytes(&block.body)
        .and_then(|builder| builder.with_policy(&policy, None, helper))
        .and_then(|mut decryptor| {
            decryptor.read_to_end(&mut plaintext)?;
            Ok(())
        });

    match result {
        Ok(()) if outcome.opened.load(Ordering::SeqCst) => {
            tracing::debug!(plaintext_len = plaintext.len(), "opened envelope");
            Ok(plaintext)
        }
        Ok(()) => Err(DecryptError::MalformedEnvelope(
            "message is not encrypted".into(),
        )),
        Err(_) if outcome.unaddressed.load(Ordering::SeqCst) => {
            tracing::warn!(fingerprint = %entity.cert().fingerprint(), "envelope not addressed to any key");
            Err(DecryptError::NoMatchingKey)
        }
        Err(e) => Err(malformed(e)),
    }
}

fn malformed(err: impl std::fmt::Display) -> DecryptError {
    DecryptError::MalformedEnvelope(err.to_string())
}

/// What the helper saw while the codec drove it.
#[derive(Default)]
struct Outcome {
    opened: AtomicBool,
    /// No recipient packet names any of our keys.
    unaddressed: AtomicBool,
}

/// Codec callback that tries every unlocked component against the
/// recipient packets addressed to it.
struct Keyring {
    cert: Cert,
    keypairs: Vec<KeyPair>,
    outcome: Arc<Outcome>,
}

impl VerificationHelper for Keyring {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(Vec::new())
    }

    fn check(&mut self, _structure: MessageStructure) -> openpgp::Result<()> {
        Ok(())
    }
}

impl DecryptionHelper for Keyring {
    fn decrypt(
        &mut self,
        pkesks: &[PKESK],
        _skesks: &[SKESK],
        sym_algo: Option<SymmetricAlgorithm>,
        decrypt: &mut dyn FnMut(Option<SymmetricAlgorithm>, &SessionKey) -> bool,
    ) -> openpgp::Result<Option<Cert>> {
        let mut addressed = false;
        for pkesk in pkesks {
            for keypair in &mut self.keypairs {
                if !addressed_to(pkesk, keypair) {
                    continue;
                }
                addressed = true;

                if let Some((algo, session_key)) = pkesk.decrypt(keypair, sym_algo) {
                    if decrypt(algo, &session_key) {
                        self.outcome.opened.store(true, Ordering::SeqCst);
                        return Ok(Some(self.cert.clone()));
                    }
                }
            }
        }

        if !addressed {
            self.outcome.unaddressed.store(true, Ordering::SeqCst);
            return Err(openpgp::Error::MissingSessionKey("no matching key".into()).into());
        }
        Err(openpgp::Error::MissingSessionKey("session key did not decrypt".into()).into())
    }
}

/// A wildcard recipient is addressed to every key.
fn addressed_to(pkesk: &PKESK, keypair: &KeyPair) -> bool {
    match pkesk.recipient() {
        None => true,
        Some(handle) => handle.aliases(KeyHandle::from(keypair.public().fingerprint())),
    }
}
