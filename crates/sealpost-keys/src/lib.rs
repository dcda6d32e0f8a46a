//! # Sealpost Keys
//!
//! Key lookup for Sealpost. Key material is never held in a local keyring;
//! every operation asks a [`KeyProvider`] for the identities it needs and
//! turns the answers into validated entities.
//!
//! ## Key Types
//!
//! - [`KeyProvider`] - The lookup boundary, `(identity, scope) -> key block`
//! - [`MemoryKeyProvider`] - In-memory store, mostly for tests
//! - [`SqliteKeyProvider`] - SQLite-backed persistent store
//! - [`ResolutionError`] - Which stage failed, for which identity
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealpost_core::{Identity, KeyMaterial, Scope};
//! use sealpost_keys::{resolve_public_many, SqliteKeyProvider};
//!
//! let store = SqliteKeyProvider::open("keys.db").unwrap();
//! # let armored_public_key = String::new();
//! store
//!     .put(&Identity::from("qwert@mail.xy"), Scope::Public, &KeyMaterial::from(armored_public_key))
//!     .unwrap();
//!
//! let recipients = resolve_public_many(&[Identity::from("qwert@mail.xy")], &store).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **All or nothing**: resolving N identities yields N entities or the
//!   first failure in input order
//! - **No caching**: every call goes back to the provider

pub mod error;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod resolver;
pub mod sqlite;

pub use error::{ProviderError, ResolutionError, Result, StoreError};
pub use memory::MemoryKeyProvider;
pub use provider::{from_fn, FnProvider, KeyProvider};
pub use resolver::{
    resolve_many, resolve_many_concurrent, resolve_one, resolve_private, resolve_public,
    resolve_public_many, resolve_public_many_concurrent, resolve_signer,
};
pub use sqlite::SqliteKeyProvider;
