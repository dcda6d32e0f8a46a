//! # Sealpost Envelope
//!
//! OpenPGP envelopes around outbound payloads.
//!
//! ## Overview
//!
//! Every operation has two forms: one that resolves keys through a
//! [`KeyProvider`](sealpost_keys::KeyProvider) by identity, and a `*_with` /
//! `*_for` form that takes already validated entities.
//!
//! - [`encrypt`] / [`encrypt_for`] - seal for one or more recipients
//! - [`sign`] / [`sign_with`] - detached signature
//! - [`decrypt`] / [`decrypt_with`] - open an envelope
//! - [`verify()`] / [`verify_from`] - check a detached signature
//!
//! ## Writer Stacks
//!
//! Output is produced by an [`EnvelopePipeline`] that owns all of its
//! layers. Layers are finalized innermost first by
//! [`EnvelopePipeline::finish`]; an envelope is never visible before that.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealpost_core::{Identity, Passphrase};
//! use sealpost_envelope::{decrypt, encrypt, EnvelopeOptions};
//! use sealpost_keys::MemoryKeyProvider;
//!
//! let provider = MemoryKeyProvider::new();
//! let qwert = Identity::from("qwert@mail.xy");
//!
//! let envelope = encrypt(&b"Hello World"[..], &[qwert.clone()], &provider, &EnvelopeOptions::default()).unwrap();
//! let plaintext = decrypt(envelope.as_str(), &qwert, &provider, Some(&Passphrase::from("qwert123"))).unwrap();
//! assert_eq!(plaintext, b"Hello World");
//! ```

pub mod artifact;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod pipeline;
pub mod sign;
pub mod verify;

pub use artifact::{Armored, BlockKind, EncryptedEnvelope, MessageBlock, SignatureBlock, SignatureEnvelope};
pub use decrypt::{decrypt, decrypt_with};
pub use encrypt::{encrypt, encrypt_for};
pub use error::{DecryptError, EncryptError, PipelineError, Result, SignError, VerifyError};
pub use pipeline::{EnvelopeOptions, EnvelopePipeline};
pub use sign::{sign, sign_with};
pub use verify::{verify, verify_from};
