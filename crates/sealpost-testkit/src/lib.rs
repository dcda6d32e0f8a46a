//! # Sealpost Testkit
//!
//! Testing utilities for Sealpost.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Key fixtures**: Armored key pairs with known identities and passphrases
//! - **Providers**: Ready-made and misbehaving [`KeyProvider`](sealpost_keys::KeyProvider)s
//! - **Generators**: Proptest strategies for identities and payloads
//!
//! ## Key Fixtures
//!
//! ```rust
//! use sealpost_testkit::keys::QWERT;
//!
//! let recipient = QWERT.public_entity();
//! assert!(recipient.entity().has_identity("qwert@mail.xy"));
//! ```
//!
//! ## Providers
//!
//! ```rust
//! use sealpost_keys::KeyProvider;
//! use sealpost_core::Scope;
//! use sealpost_testkit::{keys::OPEN, providers::fixture_provider};
//!
//! let provider = fixture_provider();
//! assert!(provider.provide(&OPEN.identity(), Scope::Private).is_ok());
//! ```

pub mod generators;
pub mod keys;
pub mod providers;

pub use keys::{all_fixtures, KeyFixture, MALLORY, OPEN, QWERT, SIGNER, SPLIT};
pub use providers::{fixture_provider, FailingProvider, RecordingProvider};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
