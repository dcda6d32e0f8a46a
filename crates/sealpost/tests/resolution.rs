//! Scope enforcement and fail-fast resolution as seen through the Sealer.

use sealpost::core::ScopeError;
use sealpost::envelope::{DecryptError, EncryptError, SignError};
use sealpost::keys::{ProviderError, ResolutionError};
use sealpost::{Identity, MemoryKeyProvider, Passphrase, Scope, SealError, Sealer, SealerConfig};
use sealpost_testkit::{
    fixture_provider, FailingProvider, RecordingProvider, MALLORY, OPEN, QWERT, SIGNER, SPLIT,
};

fn scope_error(err: SealError) -> ScopeError {
    let resolution = match err {
        SealError::Encrypt(EncryptError::RecipientResolution(e)) => e,
        SealError::Decrypt(DecryptError::RecipientResolution(e)) => e,
        SealError::Sign(SignError::SenderResolution(e)) => e,
        SealError::Resolution(e) => e,
        other => panic!("not a resolution error: {other}"),
    };
    match resolution {
        ResolutionError::ScopeInvalid { source, .. } => source,
        other => panic!("not a scope error: {other}"),
    }
}

#[test]
fn test_signing_only_key_cannot_receive() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());

    let err = sealer
        .encrypt(&b"x"[..], &[SIGNER.identity()])
        .unwrap_err();
    assert!(matches!(scope_error(err), ScopeError::MissingPublicKey));
}

#[test]
fn test_public_block_in_private_slot_is_rejected() {
    let provider = MemoryKeyProvider::new();
    provider.insert(QWERT.identity, Scope::Private, QWERT.public);
    let sealer = Sealer::new(provider, SealerConfig::default());

    let err = sealer
        .sign(&b"x"[..], &QWERT.identity(), &QWERT.passphrase())
        .unwrap_err();
    assert!(matches!(scope_error(err), ScopeError::MissingPrivateKey));
}

#[test]
fn test_wrong_passphrase_fails_unlock() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let envelope = sealer.encrypt(&b"x"[..], &[QWERT.identity()]).unwrap();

    let err = sealer
        .decrypt(envelope.as_str(), &QWERT.identity(), &Passphrase::from("qwert124"))
        .unwrap_err();
    assert!(matches!(
        scope_error(err),
        ScopeError::UnlockFailed { .. }
    ));
}

#[test]
fn test_missing_passphrase_fails_for_protected_key() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());

    let err = sealer
        .resolve(&MALLORY.identity(), Scope::Private, None)
        .unwrap_err();
    assert!(matches!(scope_error(err), ScopeError::UnlockFailed { .. }));

    let ok = sealer.resolve(&OPEN.identity(), Scope::Private, None).unwrap();
    assert_eq!(ok.scope(), Scope::Private);
}

#[test]
fn test_subkey_with_other_passphrase_fails_whole_resolution() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());

    let err = sealer
        .resolve(&SPLIT.identity(), Scope::Private, None)
        .unwrap_err();
    assert_eq!(
        scope_error(err),
        ScopeError::UnlockFailed {
            key: "5A3F1A01845BF1F1".into()
        }
    );

    let envelope = sealer.encrypt(&b"x"[..], &[SPLIT.identity()]).unwrap();
    let err = sealer
        .decrypt(envelope.as_str(), &SPLIT.identity(), &Passphrase::empty())
        .unwrap_err();
    assert!(matches!(scope_error(err), ScopeError::UnlockFailed { .. }));

    let plaintext = sealer
        .decrypt(envelope.as_str(), &SPLIT.identity(), &SPLIT.passphrase())
        .unwrap();
    assert_eq!(plaintext, b"x");
}

#[test]
fn test_resolution_stops_at_first_failure() {
    let provider = RecordingProvider::new(FailingProvider::new(
        fixture_provider(),
        MALLORY.identity(),
    ));
    let sealer = Sealer::new(provider, SealerConfig::default());

    let recipients = [QWERT.identity(), MALLORY.identity(), OPEN.identity()];
    let err = sealer.encrypt(&b"x"[..], &recipients).unwrap_err();

    match err {
        SealError::Encrypt(EncryptError::RecipientResolution(ResolutionError::ProviderFailed {
            identity,
            source: ProviderError::Other(_),
        })) => assert_eq!(identity, MALLORY.identity()),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(
        sealer.provider().identities(),
        vec![QWERT.identity(), MALLORY.identity()]
    );
    assert!(sealer
        .provider()
        .calls()
        .iter()
        .all(|(_, scope)| *scope == Scope::Public));
}

#[test]
fn test_unknown_identity_is_not_found() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let stranger = Identity::from("stranger@mail.xy");

    let err = sealer.encrypt(&b"x"[..], &[stranger.clone()]).unwrap_err();
    match err {
        SealError::Encrypt(EncryptError::RecipientResolution(ResolutionError::ProviderFailed {
            identity,
            source: ProviderError::NotFound { scope, .. },
        })) => {
            assert_eq!(identity, stranger);
            assert_eq!(scope, Scope::Public);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_no_recipients_is_an_error() {
    let sealer = Sealer::new(fixture_provider(), SealerConfig::default());
    let err = sealer.encrypt(&b"x"[..], &[]).unwrap_err();
    assert!(matches!(err, SealError::Encrypt(EncryptError::NoRecipients)));
}
