//! Proptest generators for property-based testing.

use proptest::prelude::*;

use sealpost_core::{Identity, Scope};

/// Generate a plausible mail address identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    ("[a-z][a-z0-9]{0,11}", "[a-z]{2,8}", "[a-z]{2,3}")
        .prop_map(|(local, domain, tld)| Identity::new(format!("{local}@{domain}.{tld}")))
}

/// Generate a list of distinct identities.
pub fn identities(max_len: usize) -> impl Strategy<Value = Vec<Identity>> {
    prop::collection::btree_set(identity(), 1..=max_len.max(1))
        .prop_map(|set| set.into_iter().collect())
}

/// Generate a Scope.
pub fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Public), Just(Scope::Private)]
}

/// Generate payload bytes of specified max length.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}
