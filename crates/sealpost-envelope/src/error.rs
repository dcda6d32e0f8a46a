//! Error types for envelope operations.
//!
//! Codec errors are flattened to their message; the codec never puts key
//! material into error text.

use std::io;

use thiserror::Error;

use sealpost_core::ArmorKind;
use sealpost_keys::ResolutionError;

/// Errors from building or tearing down a writer stack.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The codec rejected a layer.
    #[error("codec error: {0}")]
    Codec(String),

    /// Writing through the stack failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    pub(crate) fn codec(err: impl std::fmt::Display) -> Self {
        PipelineError::Codec(err.to_string())
    }
}

/// Result type for writer stacks.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors from sealing a message for recipients.
#[derive(Debug, Error)]
pub enum EncryptError {
    #[error("recipient resolution failed: {0}")]
    RecipientResolution(#[from] ResolutionError),

    #[error("no recipients")]
    NoRecipients,

    #[error("encryption failed: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<PipelineError> for EncryptError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Codec(msg) => EncryptError::Crypto(msg),
            PipelineError::Io(e) => EncryptError::Io(e),
        }
    }
}

/// Errors from producing a detached signature.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("sender resolution failed: {0}")]
    SenderResolution(#[from] ResolutionError),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<PipelineError> for SignError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Codec(msg) => SignError::SigningFailed(msg),
            PipelineError::Io(e) => SignError::Io(e),
        }
    }
}

/// Errors from opening an encrypted envelope.
#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("recipient resolution failed: {0}")]
    RecipientResolution(#[from] ResolutionError),

    #[error("no key component matches the envelope recipients")]
    NoMatchingKey,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

/// Errors from checking a detached signature.
///
/// A signature that is well formed but does not verify is not an error; see
/// [`verify`](crate::verify()).
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed signature: {0}")]
    MalformedEnvelope(String),

    #[error("expected a PGP SIGNATURE block, found {found}")]
    WrongBlockType { found: ArmorKind },

    #[error("signer resolution failed: {0}")]
    SignerResolution(#[from] ResolutionError),
}
