//! The SQLite key store behind a Sealer.

use proptest::prelude::*;
use sealpost::keys::SqliteKeyProvider;
use sealpost::{KeyProvider, Passphrase, Scope, Sealer, SealerConfig};
use sealpost_testkit::{all_fixtures, generators, QWERT, SIGNER};
use tempfile::TempDir;

fn populated_store(dir: &TempDir) -> SqliteKeyProvider {
    let store = SqliteKeyProvider::open(dir.path().join("keys.db")).unwrap();
    for fixture in all_fixtures() {
        store
            .put(&fixture.identity(), Scope::Public, &fixture.public_material())
            .unwrap();
        store
            .put(&fixture.identity(), Scope::Private, &fixture.secret_material())
            .unwrap();
    }
    store
}

#[test]
fn test_round_trip_from_reopened_store() {
    let dir = TempDir::new().unwrap();
    drop(populated_store(&dir));

    let store = SqliteKeyProvider::open(dir.path().join("keys.db")).unwrap();
    let sealer = Sealer::new(store, SealerConfig::default());

    let envelope = sealer
        .encrypt(&b"Hello World"[..], &[QWERT.identity()])
        .unwrap();
    let plaintext = sealer
        .decrypt(envelope.as_str(), &QWERT.identity(), &Passphrase::from("qwert123"))
        .unwrap();
    assert_eq!(plaintext, b"Hello World");
}

#[test]
fn test_removed_key_is_no_longer_served() {
    let dir = TempDir::new().unwrap();
    let store = populated_store(&dir);
    assert!(store.remove(&QWERT.identity(), Scope::Public).unwrap());

    let sealer = Sealer::new(store, SealerConfig::default());
    assert!(sealer.encrypt(&b"x"[..], &[QWERT.identity()]).is_err());

    // The private half is still there.
    let signature = sealer
        .sign(&b"x"[..], &QWERT.identity(), &QWERT.passphrase())
        .unwrap();
    assert!(!signature.is_empty());
}

#[test]
fn test_identities_listing() {
    let dir = TempDir::new().unwrap();
    let store = populated_store(&dir);

    let identities = store.identities(Scope::Private).unwrap();
    assert_eq!(identities.len(), all_fixtures().len());
    assert!(identities.contains(&SIGNER.identity()));
}

#[tokio::test]
async fn test_async_encrypt_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let sealer = Sealer::new(populated_store(&dir), SealerConfig::default());

    let envelope = sealer
        .encrypt_async(&b"from the store"[..], &[QWERT.identity()])
        .await
        .unwrap();
    let plaintext = sealer
        .decrypt(envelope.as_str(), &QWERT.identity(), &QWERT.passphrase())
        .unwrap();
    assert_eq!(plaintext, b"from the store");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_store_serves_only_the_stored_scope(
        identity in generators::identity(),
        scope in generators::scope(),
    ) {
        let dir = TempDir::new().unwrap();
        let store = SqliteKeyProvider::open(dir.path().join("keys.db")).unwrap();
        store.put(&identity, scope, &QWERT.public_material()).unwrap();

        let other = match scope {
            Scope::Public => Scope::Private,
            Scope::Private => Scope::Public,
        };
        prop_assert_eq!(store.provide(&identity, scope).unwrap(), QWERT.public_material());
        prop_assert!(store.provide(&identity, other).is_err());
        prop_assert_eq!(store.identities(scope).unwrap(), vec![identity]);
    }
}
