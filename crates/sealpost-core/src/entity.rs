//! Parsed key entities and the lock state of their secret material.
//!
//! A [`KeyEntity`] is what the parser produces. It is never used directly
//! for cryptography: scope validation consumes it and returns either a
//! [`PublicEntity`] or an [`UnlockedEntity`].

use std::fmt;

use sequoia_openpgp::cert::prelude::*;
use sequoia_openpgp::crypto::KeyPair;
use sequoia_openpgp::packet::key::{SecretParts, UnspecifiedRole};
use sequoia_openpgp::packet::Key;
use sequoia_openpgp::policy::StandardPolicy;
use sequoia_openpgp::{Cert, Fingerprint, KeyID};

use crate::error::ScopeError;
use crate::types::Passphrase;

type SecretKeyPacket = Key<SecretParts, UnspecifiedRole>;

/// Secret key material that has not been unlocked in this call.
///
/// Unprotected keys start out locked too; unlocking them is a no-op.
pub struct LockedKey {
    key: SecretKeyPacket,
}

impl LockedKey {
    pub fn key_id(&self) -> KeyID {
        self.key.keyid()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.key.fingerprint()
    }

    /// True if the secret is passphrase-protected.
    pub fn is_protected(&self) -> bool {
        self.key.secret().is_encrypted()
    }

    /// Unlock with `passphrase`. The locked key is consumed either way.
    pub fn unlock(self, passphrase: &Passphrase) -> Result<UnlockedKey, ScopeError> {
        if !self.is_protected() {
            return Ok(UnlockedKey { key: self.key });
        }

        let key_id = self.key.keyid();
        self.key
            .decrypt_secret(passphrase.password())
            .map(|key| UnlockedKey { key })
            .map_err(|_| ScopeError::UnlockFailed {
                key: key_id.to_hex(),
            })
    }
}

impl fmt::Debug for LockedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LockedKey({})", self.key.keyid())
    }
}

/// Secret key material that is usable for signing and decryption.
///
/// Only [`LockedKey::unlock`] creates one.
pub struct UnlockedKey {
    key: SecretKeyPacket,
}

impl UnlockedKey {
    pub fn key_id(&self) -> KeyID {
        self.key.keyid()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.key.fingerprint()
    }

    /// A codec key pair for signing or session-key decryption.
    pub fn keypair(&self) -> sequoia_openpgp::Result<KeyPair> {
        self.key.clone().into_keypair()
    }
}

impl fmt::Debug for UnlockedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnlockedKey({})", self.key.keyid())
    }
}

/// Lock state of one secret key component.
#[derive(Debug)]
pub enum SecretKey {
    Locked(LockedKey),
    Unlocked(UnlockedKey),
}

impl SecretKey {
    pub fn key_id(&self) -> KeyID {
        match self {
            SecretKey::Locked(k) => k.key_id(),
            SecretKey::Unlocked(k) => k.key_id(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, SecretKey::Unlocked(_))
    }

    /// Move to the unlocked state. Already-unlocked keys pass through, so a
    /// component is never unlocked twice.
    pub fn unlock(self, passphrase: &Passphrase) -> Result<UnlockedKey, ScopeError> {
        match self {
            SecretKey::Locked(k) => k.unlock(passphrase),
            SecretKey::Unlocked(k) => Ok(k),
        }
    }

    pub fn as_unlocked(&self) -> Option<&UnlockedKey> {
        match self {
            SecretKey::Unlocked(k) => Some(k),
            SecretKey::Locked(_) => None,
        }
    }
}

/// A subkey of an entity, with its optional secret half.
#[derive(Debug)]
pub struct KeyComponent {
    pub(crate) fingerprint: Fingerprint,
    pub(crate) secret: Option<SecretKey>,
}

impl KeyComponent {
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn secret(&self) -> Option<&SecretKey> {
        self.secret.as_ref()
    }
}

/// A parsed key block.
pub struct KeyEntity {
    pub(crate) cert: Cert,
    pub(crate) identities: Vec<String>,
    pub(crate) encryption_keys: Vec<Fingerprint>,
    pub(crate) private: Option<SecretKey>,
    pub(crate) subkeys: Vec<KeyComponent>,
}

impl KeyEntity {
    /// Split a certificate into its components. All secrets start locked.
    pub(crate) fn from_cert(cert: Cert) -> Self {
        let policy = StandardPolicy::new();
        let encryption_keys = cert
            .keys()
            .with_policy(&policy, None)
            .supported()
            .revoked(false)
            .for_transport_encryption()
            .for_storage_encryption()
            .map(|ka| ka.key().fingerprint())
            .collect();

        let identities = cert
            .userids()
            .map(|ua| String::from_utf8_lossy(ua.userid().value()).into_owned())
            .collect();

        let primary = cert.fingerprint();
        let mut private = None;
        let mut subkeys = Vec::new();
        for ka in cert.keys() {
            let fingerprint = ka.key().fingerprint();
            let secret = ka
                .key()
                .clone()
                .parts_into_secret()
                .ok()
                .map(|key| SecretKey::Locked(LockedKey { key }));

            if fingerprint == primary {
                private = secret;
            } else {
                subkeys.push(KeyComponent {
                    fingerprint,
                    secret,
                });
            }
        }

        Self {
            cert,
            identities,
            encryption_keys,
            private,
            subkeys,
        }
    }

    /// The underlying certificate. Its public parts are what recipients and
    /// verifiers need.
    pub fn cert(&self) -> &Cert {
        &self.cert
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.cert.fingerprint()
    }

    pub fn key_id(&self) -> KeyID {
        self.cert.keyid()
    }

    /// User ID labels, e.g. `qwert <qwert@mail.xy>`.
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    /// True if any user ID mentions `address`.
    pub fn has_identity(&self, address: &str) -> bool {
        self.identities.iter().any(|uid| uid.contains(address))
    }

    /// Fingerprints of the keys usable for encryption.
    pub fn encryption_keys(&self) -> &[Fingerprint] {
        &self.encryption_keys
    }

    pub fn has_public(&self) -> bool {
        !self.encryption_keys.is_empty()
    }

    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    pub fn private(&self) -> Option<&SecretKey> {
        self.private.as_ref()
    }

    pub fn subkeys(&self) -> &[KeyComponent] {
        &self.subkeys
    }

    /// Every secret component, primary first.
    pub(crate) fn secrets(&self) -> impl Iterator<Item = &SecretKey> {
        self.private
            .iter()
            .chain(self.subkeys.iter().filter_map(|c| c.secret.as_ref()))
    }
}

impl fmt::Debug for KeyEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEntity")
            .field("fingerprint", &self.cert.fingerprint())
            .field("identities", &self.identities)
            .field("encryption_keys", &self.encryption_keys.len())
            .field("private", &self.private)
            .field("subkeys", &self.subkeys)
            .finish()
    }
}

impl AsRef<KeyEntity> for KeyEntity {
    fn as_ref(&self) -> &KeyEntity {
        self
    }
}

/// An entity proven to carry a public key usable for encryption.
#[derive(Debug)]
pub struct PublicEntity {
    pub(crate) entity: KeyEntity,
}

impl PublicEntity {
    pub fn cert(&self) -> &Cert {
        self.entity.cert()
    }

    pub fn entity(&self) -> &KeyEntity {
        &self.entity
    }

    pub fn into_entity(self) -> KeyEntity {
        self.entity
    }
}

impl AsRef<KeyEntity> for PublicEntity {
    fn as_ref(&self) -> &KeyEntity {
        &self.entity
    }
}

/// An entity whose primary secret and every secret subkey are unlocked.
#[derive(Debug)]
pub struct UnlockedEntity {
    pub(crate) entity: KeyEntity,
}

impl UnlockedEntity {
    pub fn cert(&self) -> &Cert {
        self.entity.cert()
    }

    pub fn entity(&self) -> &KeyEntity {
        &self.entity
    }

    /// All unlocked key components, primary first.
    pub fn unlocked_keys(&self) -> impl Iterator<Item = &UnlockedKey> {
        self.entity.secrets().filter_map(SecretKey::as_unlocked)
    }

    /// The unlocked component with the given fingerprint, if any.
    pub fn unlocked_key(&self, fingerprint: &Fingerprint) -> Option<&UnlockedKey> {
        self.unlocked_keys()
            .find(|k| &k.fingerprint() == fingerprint)
    }
}

impl AsRef<KeyEntity> for UnlockedEntity {
    fn as_ref(&self) -> &KeyEntity {
        &self.entity
    }
}
