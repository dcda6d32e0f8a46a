//! Key material parser.

use sequoia_openpgp::parse::Parse;
use sequoia_openpgp::Cert;

use crate::armor;
use crate::entity::KeyEntity;
use crate::error::{ArmorError, ParseError, Result};
use crate::types::KeyMaterial;

/// Parse one armored key block into a [`KeyEntity`].
///
/// The block must open with a public or private key armor header. Anything
/// that decodes but does not form exactly one certificate is a
/// [`ParseError::CorruptKeyPacket`].
pub fn parse_entity(material: &KeyMaterial) -> Result<KeyEntity> {
    let block = armor::decode(material.as_str())?;
    if !block.kind.is_key() {
        return Err(ParseError::MalformedArmor(ArmorError::MissingHeader));
    }
    if block.body.is_empty() {
        return Err(ParseError::CorruptKeyPacket("empty key block".into()));
    }

    let cert =
        Cert::from_bytes(&block.body).map_err(|e| ParseError::CorruptKeyPacket(e.to_string()))?;

    let entity = KeyEntity::from_cert(cert);
    tracing::debug!(
        fingerprint = %entity.fingerprint(),
        subkeys = entity.subkeys().len(),
        has_private = entity.has_private(),
        "parsed key block"
    );
    Ok(entity)
}
