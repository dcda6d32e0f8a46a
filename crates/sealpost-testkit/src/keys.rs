//! Armored key fixtures.
//!
//! | fixture   | identity          | algorithm              | passphrase |
//! |-----------|-------------------|------------------------|------------|
//! | [`QWERT`]   | `qwert@mail.xy`   | RSA-3072 + RSA subkey  | `qwert123` |
//! | [`MALLORY`] | `mallory@mail.xy` | Ed25519 + Cv25519      | `zxcv987`  |
//! | [`OPEN`]    | `open@mail.xy`    | Ed25519 + Cv25519      | none       |
//! | [`SIGNER`]  | `signer@mail.xy`  | Ed25519, no subkeys    | none       |
//! | [`SPLIT`]   | `split@mail.xy`   | Ed25519 + Cv25519      | subkey only: `split-subkey` |
//!
//! `SIGNER` has no encryption-capable key, so it fails public-scope
//! validation while still being able to sign. `SPLIT` has an unprotected
//! primary and a protected subkey, so the empty passphrase gets past the
//! primary and fails on the subkey.

use sealpost_core::{
    parse_entity, Identity, KeyEntity, KeyMaterial, Passphrase, PublicEntity, UnlockedEntity,
};

/// A key pair with its identity and passphrase.
#[derive(Debug, Clone, Copy)]
pub struct KeyFixture {
    pub identity: &'static str,
    pub public: &'static str,
    pub secret: &'static str,
    pub passphrase: &'static str,
}

impl KeyFixture {
    pub fn identity(&self) -> Identity {
        Identity::from(self.identity)
    }

    pub fn public_material(&self) -> KeyMaterial {
        KeyMaterial::from(self.public)
    }

    pub fn secret_material(&self) -> KeyMaterial {
        KeyMaterial::from(self.secret)
    }

    pub fn passphrase(&self) -> Passphrase {
        Passphrase::from(self.passphrase)
    }

    /// The parsed public block.
    pub fn public_entity_raw(&self) -> KeyEntity {
        parse_entity(&self.public_material()).expect("fixture public key parses")
    }

    /// The public block validated for encryption.
    ///
    /// Panics for [`SIGNER`], which has no encryption key.
    pub fn public_entity(&self) -> PublicEntity {
        self.public_entity_raw()
            .into_public()
            .expect("fixture has an encryption key")
    }

    /// The secret block unlocked with the fixture passphrase.
    pub fn unlocked_entity(&self) -> UnlockedEntity {
        parse_entity(&self.secret_material())
            .expect("fixture secret key parses")
            .unlock(Some(&self.passphrase()))
            .expect("fixture passphrase unlocks")
    }
}

/// RSA key pair protected with `qwert123`.
pub const QWERT: KeyFixture = KeyFixture {
    identity: "qwert@mail.xy",
    public: include_str!("../fixtures/qwert.pub.asc"),
    secret: include_str!("../fixtures/qwert.sec.asc"),
    passphrase: "qwert123",
};

/// Unrelated protected key pair, for wrong-recipient and wrong-signer cases.
pub const MALLORY: KeyFixture = KeyFixture {
    identity: "mallory@mail.xy",
    public: include_str!("../fixtures/mallory.pub.asc"),
    secret: include_str!("../fixtures/mallory.sec.asc"),
    passphrase: "zxcv987",
};

/// Unprotected key pair. Cheap to unlock.
pub const OPEN: KeyFixture = KeyFixture {
    identity: "open@mail.xy",
    public: include_str!("../fixtures/open.pub.asc"),
    secret: include_str!("../fixtures/open.sec.asc"),
    passphrase: "",
};

/// Unprotected signing-only key.
pub const SIGNER: KeyFixture = KeyFixture {
    identity: "signer@mail.xy",
    public: include_str!("../fixtures/signer.pub.asc"),
    secret: include_str!("../fixtures/signer.sec.asc"),
    passphrase: "",
};

/// Unprotected primary with a passphrase-protected encryption subkey.
pub const SPLIT: KeyFixture = KeyFixture {
    identity: "split@mail.xy",
    public: include_str!("../fixtures/split.pub.asc"),
    secret: include_str!("../fixtures/split.sec.asc"),
    passphrase: "split-subkey",
};

/// Every fixture, in a stable order.
pub fn all_fixtures() -> [KeyFixture; 5] {
    [QWERT, MALLORY, OPEN, SIGNER, SPLIT]
}
