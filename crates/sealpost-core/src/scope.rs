//! Scope validation.
//!
//! Validation consumes a [`KeyEntity`] and hands back a value whose type
//! records what it was validated for. There is no way to flip a parsed
//! entity into the unlocked state in place.

use crate::entity::{KeyEntity, PublicEntity, SecretKey, UnlockedEntity};
use crate::error::ScopeError;
use crate::types::{Passphrase, Scope};

/// An entity validated for one scope.
#[derive(Debug)]
pub enum ValidatedEntity {
    Public(PublicEntity),
    Private(UnlockedEntity),
}

impl ValidatedEntity {
    pub fn scope(&self) -> Scope {
        match self {
            ValidatedEntity::Public(_) => Scope::Public,
            ValidatedEntity::Private(_) => Scope::Private,
        }
    }

    pub fn entity(&self) -> &KeyEntity {
        match self {
            ValidatedEntity::Public(e) => e.entity(),
            ValidatedEntity::Private(e) => e.entity(),
        }
    }

    pub fn into_public(self) -> Option<PublicEntity> {
        match self {
            ValidatedEntity::Public(e) => Some(e),
            ValidatedEntity::Private(_) => None,
        }
    }

    pub fn into_unlocked(self) -> Option<UnlockedEntity> {
        match self {
            ValidatedEntity::Private(e) => Some(e),
            ValidatedEntity::Public(_) => None,
        }
    }
}

impl AsRef<KeyEntity> for ValidatedEntity {
    fn as_ref(&self) -> &KeyEntity {
        self.entity()
    }
}

/// Validate `entity` for `scope`.
///
/// The passphrase is only consulted for [`Scope::Private`]; an absent one
/// means the empty passphrase.
pub fn validate_scope(
    entity: KeyEntity,
    scope: Scope,
    passphrase: Option<&Passphrase>,
) -> Result<ValidatedEntity, ScopeError> {
    match scope {
        Scope::Public => entity.into_public().map(ValidatedEntity::Public),
        Scope::Private => entity.unlock(passphrase).map(ValidatedEntity::Private),
    }
}

impl KeyEntity {
    /// Require a public key usable for encryption.
    pub fn into_public(self) -> Result<PublicEntity, ScopeError> {
        if !self.has_public() {
            return Err(ScopeError::MissingPublicKey);
        }
        Ok(PublicEntity { entity: self })
    }

    /// Require a private component and unlock it together with every secret
    /// subkey, all with the same passphrase.
    ///
    /// The first failure aborts; the partially unlocked entity is dropped.
    pub fn unlock(mut self, passphrase: Option<&Passphrase>) -> Result<UnlockedEntity, ScopeError> {
        let empty = Passphrase::empty();
        let passphrase = passphrase.unwrap_or(&empty);

        let primary = self.private.take().ok_or(ScopeError::MissingPrivateKey)?;
        let primary = unlock_logged(primary, passphrase)?;
        self.private = Some(SecretKey::Unlocked(primary));

        for component in &mut self.subkeys {
            if let Some(secret) = component.secret.take() {
                let unlocked = unlock_logged(secret, passphrase)?;
                component.secret = Some(SecretKey::Unlocked(unlocked));
            }
        }

        tracing::debug!(
            fingerprint = %self.fingerprint(),
            components = self.secrets().count(),
            "unlocked key entity"
        );
        Ok(UnlockedEntity { entity: self })
    }
}

fn unlock_logged(
    secret: SecretKey,
    passphrase: &Passphrase,
) -> Result<crate::entity::UnlockedKey, ScopeError> {
    let key_id = secret.key_id();
    secret.unlock(passphrase).map_err(|e| {
        tracing::warn!(key = %key_id, "key unlock failed");
        e
    })
}
