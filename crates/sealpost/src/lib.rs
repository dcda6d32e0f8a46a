//! # Sealpost
//!
//! Message-level confidentiality and authenticity for outbound mail:
//! OpenPGP encryption and detached signatures with keys resolved per
//! identity through an injected provider.
//!
//! ## Overview
//!
//! - **Key providers**: key material comes from a [`KeyProvider`] asked per
//!   identity and scope, never from a local keyring
//! - **Scope checks**: encryption needs a public encryption key; signing and
//!   decryption need private material unlocked with the caller's passphrase
//! - **Envelopes**: armored `PGP MESSAGE` and `PGP SIGNATURE` blocks,
//!   interoperable with GnuPG
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealpost::{Identity, Passphrase, Sealer, SealerConfig};
//! use sealpost::keys::SqliteKeyProvider;
//!
//! let store = SqliteKeyProvider::open("keys.db").unwrap();
//! let sealer = Sealer::new(store, SealerConfig::default());
//!
//! let qwert = Identity::from("qwert@mail.xy");
//! let envelope = sealer.encrypt(&b"Hello World"[..], &[qwert.clone()]).unwrap();
//!
//! let plaintext = sealer
//!     .decrypt(envelope.as_str(), &qwert, &Passphrase::from("qwert123"))
//!     .unwrap();
//! assert_eq!(plaintext, b"Hello World");
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `sealpost::core` - Identities, key parsing, scope validation
//! - `sealpost::keys` - Key providers, stores and resolution
//! - `sealpost::envelope` - Encryption, signing, decryption, verification

pub mod body;
pub mod error;
pub mod sealer;

// Re-export component crates
pub use sealpost_core as core;
pub use sealpost_envelope as envelope;
pub use sealpost_keys as keys;

// Re-export main types for convenience
pub use body::SealedBody;
pub use error::{Result, SealError};
pub use sealer::{Sealer, SealerConfig};

pub use sealpost_core::{Identity, KeyEntity, KeyMaterial, Passphrase, Scope};
pub use sealpost_envelope::{EncryptedEnvelope, SignatureEnvelope};
pub use sealpost_keys::{KeyProvider, MemoryKeyProvider, ProviderError, SqliteKeyProvider};
