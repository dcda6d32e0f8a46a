//! End-to-end encryption and decryption through the Sealer.

use proptest::prelude::*;
use sealpost::body::{
    multipart_content_type, CONTROL_BODY, CONTROL_CONTENT_TYPE, PAYLOAD_CONTENT_TYPE,
};
use sealpost::envelope::DecryptError;
use sealpost::{Identity, Passphrase, SealError, Sealer, SealerConfig};
use sealpost_testkit::{fixture_provider, generators, init_tracing, MALLORY, OPEN, QWERT};

fn sealer() -> Sealer<sealpost::MemoryKeyProvider> {
    Sealer::new(fixture_provider(), SealerConfig::default())
}

#[test]
fn test_hello_world() {
    init_tracing();
    let sealer = sealer();

    let envelope = sealer
        .encrypt(&b"Hello World"[..], &[QWERT.identity()])
        .unwrap();
    assert!(envelope.as_str().starts_with("-----BEGIN PGP MESSAGE-----"));
    assert!(!envelope.as_str().contains("Hello World"));

    let plaintext = sealer
        .decrypt(envelope.as_str(), &QWERT.identity(), &Passphrase::from("qwert123"))
        .unwrap();
    assert_eq!(plaintext, b"Hello World");
}

#[test]
fn test_every_recipient_can_open() {
    let sealer = sealer();
    let recipients = [QWERT.identity(), MALLORY.identity(), OPEN.identity()];

    let envelope = sealer.encrypt(&b"to all of you"[..], &recipients).unwrap();

    for fixture in [QWERT, MALLORY, OPEN] {
        let plaintext = sealer
            .decrypt(envelope.as_str(), &fixture.identity(), &fixture.passphrase())
            .unwrap();
        assert_eq!(plaintext, b"to all of you");
    }
}

#[test]
fn test_non_recipient_cannot_open() {
    let sealer = sealer();
    let envelope = sealer.encrypt(&b"qwert only"[..], &[QWERT.identity()]).unwrap();

    let err = sealer
        .decrypt(envelope.as_str(), &MALLORY.identity(), &MALLORY.passphrase())
        .unwrap_err();
    assert!(matches!(
        err,
        SealError::Decrypt(DecryptError::NoMatchingKey)
    ));
}

#[test]
fn test_empty_plaintext_round_trips() {
    let sealer = sealer();
    let envelope = sealer.encrypt(&b""[..], &[OPEN.identity()]).unwrap();

    let plaintext = sealer
        .decrypt(envelope.as_str(), &OPEN.identity(), &Passphrase::empty())
        .unwrap();
    assert!(plaintext.is_empty());
}

#[test]
fn test_sealed_body_opens_for_recipient() {
    let sealer = sealer();
    let body = sealer.seal_body("Hello World", vec![QWERT.identity(), OPEN.identity()]);
    assert_eq!(body.recipients().len(), 2);

    let mut part = Vec::new();
    body.write_to(&mut part).unwrap();
    let part = String::from_utf8(part).unwrap();

    let plaintext = sealer
        .decrypt(&part, &OPEN.identity(), &Passphrase::empty())
        .unwrap();
    assert_eq!(plaintext, b"Hello World");
}

#[test]
fn test_pgp_mime_message_payload_opens() {
    let sealer = sealer();
    let boundary = "sealpost-boundary";

    let mut mime = Vec::new();
    mime.extend_from_slice(
        format!("Content-Type: {}\r\n\r\n", multipart_content_type(boundary)).as_bytes(),
    );
    mime.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: {CONTROL_CONTENT_TYPE}\r\n\r\n{CONTROL_BODY}\r\n"
        )
        .as_bytes(),
    );
    mime.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: {PAYLOAD_CONTENT_TYPE}\r\n\r\n").as_bytes(),
    );
    sealer
        .seal_body("Hello World", vec![QWERT.identity()])
        .write_to(&mut mime)
        .unwrap();
    mime.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    let mime = String::from_utf8(mime).unwrap();

    let parts: Vec<&str> = mime.split(&format!("--{boundary}")).collect();
    assert_eq!(parts.len(), 4);
    assert!(parts[0].contains("protocol=\"application/pgp-encrypted\""));
    assert!(parts[1].ends_with("Version: 1\r\n"));

    let (headers, payload) = parts[2].split_once("\r\n\r\n").unwrap();
    assert!(headers.contains("application/octet-stream"));
    let plaintext = sealer
        .decrypt(payload.trim_end(), &QWERT.identity(), &QWERT.passphrase())
        .unwrap();
    assert_eq!(plaintext, b"Hello World");
}

#[tokio::test]
async fn test_encrypt_async_round_trip() {
    let sealer = sealer();
    let recipients = vec![QWERT.identity(), OPEN.identity()];

    let envelope = sealer
        .encrypt_async(&b"concurrent"[..], &recipients)
        .await
        .unwrap();

    let plaintext = sealer
        .decrypt(envelope.as_str(), &QWERT.identity(), &QWERT.passphrase())
        .unwrap();
    assert_eq!(plaintext, b"concurrent");
}

#[tokio::test]
async fn test_encrypt_async_reports_first_failure_in_order() {
    let sealer = sealer();
    let recipients = vec![
        QWERT.identity(),
        Identity::from("nobody@mail.xy"),
        Identity::from("ghost@mail.xy"),
    ];

    let err = sealer
        .encrypt_async(&b"x"[..], &recipients)
        .await
        .unwrap_err();
    match err {
        SealError::Encrypt(sealpost::envelope::EncryptError::RecipientResolution(e)) => {
            assert_eq!(e.identity().as_str(), "nobody@mail.xy");
        }
        other => panic!("unexpected error: {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_sealed_body_round_trips(body in generators::plaintext(2048)) {
        let sealer = sealer();
        let mut part = Vec::new();
        sealer
            .seal_body(body.clone(), vec![OPEN.identity()])
            .write_to(&mut part)
            .unwrap();

        let part = String::from_utf8(part).unwrap();
        let opened = sealer.decrypt(&part, &OPEN.identity(), &Passphrase::empty()).unwrap();
        prop_assert_eq!(opened, body);
    }

    #[test]
    fn prop_unknown_recipients_never_encrypt(strangers in generators::identities(4)) {
        let sealer = sealer();
        let err = sealer.encrypt(&b"x"[..], &strangers).unwrap_err();
        match err {
            SealError::Encrypt(sealpost::envelope::EncryptError::RecipientResolution(e)) => {
                prop_assert_eq!(e.identity(), &strangers[0]);
            }
            other => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
