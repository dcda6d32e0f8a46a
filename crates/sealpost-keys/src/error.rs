//! Error types for key lookup and resolution.

use thiserror::Error;

use sealpost_core::{Identity, ParseError, Scope, ScopeError};

/// Errors a [`KeyProvider`](crate::KeyProvider) reports.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The store has no key for this identity and scope.
    #[error("no {scope} key for {identity}")]
    NotFound { identity: Identity, scope: Scope },

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Anything else a custom provider wants to report.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from resolving an identity into a validated entity.
///
/// Each variant names the stage that failed and the identity it failed for.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("key provider failed for {identity}: {source}")]
    ProviderFailed {
        identity: Identity,
        source: ProviderError,
    },

    #[error("key for {identity} did not parse: {source}")]
    ParseFailed {
        identity: Identity,
        source: ParseError,
    },

    #[error("key for {identity} is not valid for this use: {source}")]
    ScopeInvalid {
        identity: Identity,
        source: ScopeError,
    },
}

impl ResolutionError {
    /// The identity whose resolution failed.
    pub fn identity(&self) -> &Identity {
        match self {
            ResolutionError::ProviderFailed { identity, .. }
            | ResolutionError::ParseFailed { identity, .. }
            | ResolutionError::ScopeInvalid { identity, .. } => identity,
        }
    }
}

/// Errors from managing the SQLite key store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for key store management.
pub type Result<T> = std::result::Result<T, StoreError>;
