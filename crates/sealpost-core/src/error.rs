//! Error types for Sealpost Core.

use thiserror::Error;

/// Errors from decoding an ASCII-armored block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArmorError {
    #[error("missing or unrecognized armor header")]
    MissingHeader,

    #[error("undecodable armor: {0}")]
    Undecodable(String),
}

/// Errors from turning key text into a [`KeyEntity`](crate::KeyEntity).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed key armor: {0}")]
    MalformedArmor(#[from] ArmorError),

    #[error("corrupt key packet: {0}")]
    CorruptKeyPacket(String),
}

/// Result type for key parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors from checking an entity against the scope an operation needs.
///
/// `UnlockFailed` carries the key ID only, never the passphrase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("key has no public component usable for encryption")]
    MissingPublicKey,

    #[error("key has no private component")]
    MissingPrivateKey,

    #[error("failed to unlock key {key}")]
    UnlockFailed { key: String },
}

/// A scope string that is neither `public` nor `private`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown key scope: {0:?}")]
pub struct UnknownScope(pub String);
