//! # Sealpost Core
//!
//! Pure primitives for Sealpost: identities, armored key parsing, and the
//! lock-state types that scope validation produces.
//!
//! This crate performs no I/O and never talks to a key store. It turns
//! armored key text into a [`KeyEntity`] and proves, at the type level, that
//! an entity is fit for the operation it is about to be used for.
//!
//! ## Key Types
//!
//! - [`Identity`] - Opaque address naming a key owner
//! - [`Scope`] - Which half of a key pair an operation needs
//! - [`KeyMaterial`] - Armored key text as returned by a key store
//! - [`KeyEntity`] - Parsed certificate with its components in lock state
//! - [`PublicEntity`] / [`UnlockedEntity`] - Entities validated for a scope
//!
//! ## Validation
//!
//! [`parse_entity`] followed by [`validate_scope`] is the only path from raw
//! key text to a usable entity. An [`UnlockedKey`] cannot be built any other
//! way.

pub mod armor;
pub mod entity;
pub mod error;
pub mod parse;
pub mod scope;
pub mod types;

pub use armor::{ArmorBlock, ArmorKind};
pub use entity::{
    KeyComponent, KeyEntity, LockedKey, PublicEntity, SecretKey, UnlockedEntity, UnlockedKey,
};
pub use error::{ArmorError, ParseError, Result, ScopeError, UnknownScope};
pub use parse::parse_entity;
pub use scope::{validate_scope, ValidatedEntity};
pub use types::{Identity, KeyMaterial, Passphrase, Scope};

/// Re-export of the OpenPGP codec so downstream crates agree on one version.
pub use sequoia_openpgp as openpgp;
