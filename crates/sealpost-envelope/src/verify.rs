//! Detached signature verification.
//!
//! The codec's standard policy decides which hash algorithms are
//! acceptable. Signatures over MD5, SHA-1 or RIPEMD-160 digests therefore
//! verify as `false` rather than erroring.

use sequoia_openpgp as openpgp;
use openpgp::parse::stream::{
    DetachedVerifierBuilder, MessageLayer, MessageStructure, VerificationHelper,
};
use openpgp::parse::Parse;
use openpgp::policy::StandardPolicy;
use openpgp::{Cert, KeyHandle, Packet, PacketPile};

use sealpost_core::{armor, ArmorKind, Identity, KeyEntity};
use sealpost_keys::{resolve_signer, KeyProvider};

use crate::error::VerifyError;

/// Check a detached `signature` over `message` against `signer`.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify:
/// tampered message, different signer, or a rejected hash algorithm.
pub fn verify<E>(signature: &str, signer: &E, message: &[u8]) -> Result<bool, VerifyError>
where
    E: AsRef<KeyEntity> + ?Sized,
{
    let block = armor::decode(signature).map_err(malformed)?;
    if block.kind != ArmorKind::Signature {
        return Err(VerifyError::WrongBlockType { found: block.kind });
    }

    let pile = PacketPile::from_bytes(&block.body).map_err(malformed)?;
    let hash_algo = pile
        .descendants()
        .find_map(|packet| match packet {
            Packet::Signature(sig) => Some(sig.hash_algo()),
            _ => None,
        })
        .ok_or_else(|| VerifyError::MalformedEnvelope("no signature packet".into()))?;

    let signer = signer.as_ref();
    tracing::debug!(signer = %signer.fingerprint(), hash = %hash_algo, "verifying signature");

    let policy = StandardPolicy::new();
    let helper = SignerCheck {
        cert: signer.cert().clone(),
        good: false,
    };
    let mut verifier = DetachedVerifierBuilder::from_bytes(&block.body)
        .and_then(|builder| builder.with_policy(&policy, None, helper))
        .map_err(malformed)?;

    let checked = verifier.verify_bytes(message).is_ok();
    let good = verifier.into_helper().good;
    Ok(checked && good)
}

/// Resolve `signer`'s public key block through `provider`, then
/// [`verify`].
pub fn verify_from<P>(
    signature: &str,
    signer: &Identity,
    provider: &P,
    message: &[u8],
) -> Result<bool, VerifyError>
where
    P: KeyProvider + ?Sized,
{
    let entity = resolve_signer(signer, provider)?;
    verify(signature, &entity, message)
}

fn malformed(err: impl std::fmt::Display) -> VerifyError {
    VerifyError::MalformedEnvelope(err.to_string())
}

struct SignerCheck {
    cert: Cert,
    good: bool,
}

impl VerificationHelper for SignerCheck {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(vec![self.cert.clone()])
    }

    fn check(&mut self, structure: MessageStructure) -> openpgp::Result<()> {
        for layer in structure.iter() {
            if let MessageLayer::SignatureGroup { results } = layer {
                self.good |= results.iter().any(|result| result.is_ok());
            }
        }
        Ok(())
    }
}
