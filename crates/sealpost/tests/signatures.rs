//! Detached signatures produced and checked through the Sealer.

use sealpost::core::ArmorKind;
use sealpost::envelope::VerifyError;
use sealpost::{Passphrase, SealError, Sealer, SealerConfig};
use sealpost_testkit::{fixture_provider, MALLORY, OPEN, QWERT, SIGNER};

#[test]
fn test_sign_and_verify() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let message = b"Hello World";

    let signature = sealer
        .sign(&message[..], &QWERT.identity(), &QWERT.passphrase())
        .unwrap();
    assert!(signature
        .as_str()
        .starts_with("-----BEGIN PGP SIGNATURE-----"));

    assert!(sealer
        .verify(signature.as_str(), &QWERT.public_entity(), message)
        .unwrap());
    assert!(sealer
        .verify_from(signature.as_str(), &QWERT.identity(), message)
        .unwrap());
}

#[test]
fn test_tampered_message_does_not_verify() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let signature = sealer
        .sign(&b"pay 10"[..], &QWERT.identity(), &QWERT.passphrase())
        .unwrap();

    assert!(!sealer
        .verify(signature.as_str(), &QWERT.public_entity(), b"pay 1000")
        .unwrap());
}

#[test]
fn test_other_signer_does_not_verify() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let signature = sealer
        .sign(&b"from mallory"[..], &MALLORY.identity(), &MALLORY.passphrase())
        .unwrap();

    assert!(!sealer
        .verify(signature.as_str(), &QWERT.public_entity(), b"from mallory")
        .unwrap());
    assert!(!sealer
        .verify_from(signature.as_str(), &OPEN.identity(), b"from mallory")
        .unwrap());
}

#[test]
fn test_signing_only_key_signs_and_verifies() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let signature = sealer
        .sign(&b"release v1"[..], &SIGNER.identity(), &Passphrase::empty())
        .unwrap();

    assert!(sealer
        .verify_from(signature.as_str(), &SIGNER.identity(), b"release v1")
        .unwrap());
    assert!(sealer
        .verify(signature.as_str(), &SIGNER.public_entity_raw(), b"release v1")
        .unwrap());
}

#[test]
fn test_message_block_is_wrong_block_type() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let envelope = sealer.encrypt(&b"x"[..], &[OPEN.identity()]).unwrap();

    let err = sealer
        .verify(envelope.as_str(), &OPEN.public_entity(), b"x")
        .unwrap_err();
    assert!(matches!(
        err,
        SealError::Verify(VerifyError::WrongBlockType {
            found: ArmorKind::Message
        })
    ));
}

#[test]
fn test_wrong_passphrase_cannot_sign() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let err = sealer
        .sign(&b"x"[..], &QWERT.identity(), &Passphrase::from("nope"))
        .unwrap_err();
    assert!(matches!(err, SealError::Sign(_)));
}
