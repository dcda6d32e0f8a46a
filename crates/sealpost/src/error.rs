//! Error types for the Sealer.

use std::io;

use sealpost_envelope::{DecryptError, EncryptError, SignError, VerifyError};
use sealpost_keys::{ResolutionError, StoreError};
use thiserror::Error;

/// Errors that can occur during Sealer operations.
#[derive(Debug, Error)]
pub enum SealError {
    /// Key resolution error outside an envelope operation.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Encryption error.
    #[error("encryption error: {0}")]
    Encrypt(#[from] EncryptError),

    /// Signing error.
    #[error("signing error: {0}")]
    Sign(#[from] SignError),

    /// Decryption error.
    #[error("decryption error: {0}")]
    Decrypt(#[from] DecryptError),

    /// Verification error.
    #[error("verification error: {0}")]
    Verify(#[from] VerifyError),

    /// Key store error.
    #[error("key store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing a sealed body failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for Sealer operations.
pub type Result<T> = std::result::Result<T, SealError>;
