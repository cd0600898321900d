// ============================================
// File: crates/veilwire-core/src/handshake/resolver.rs
// ============================================
//! # Peer Key Resolution
//!
//! ## Creation Reason
//! Models the external trust root: the source of truth binding an
//! identity locator to its authorized long-term public key. The core
//! consults it, never implements it; static maps, RPC-backed lookups,
//! or on-chain registries can be swapped without touching the
//! handshake logic.
//!
//! ## Main Functionality
//! - `PeerKeyResolver`: Single-method trust-root trait
//! - `StaticKeyResolver`: In-memory map implementation
//! - `ResolverFn`: Adapter so plain closures work as resolvers
//!
//! ## Contract
//! `resolve` returns the trusted 32-byte key for a locator, or `None`.
//! Callers must treat "not found" and "found but different key"
//! identically as authorization failure; the coordinator does exactly
//! that and never trusts a handshake message's embedded key without
//! this independent check.
//!
//! ## Last Modified
//! v0.1.0 - Initial resolver implementation

use std::collections::HashMap;

use veilwire_common::types::Locator;

use crate::crypto::ED25519_PUBLIC_KEY_SIZE;

// ============================================
// PeerKeyResolver Trait
// ============================================

/// The external trust root consulted during a handshake.
///
/// # Purpose
/// Maps a claimed identity to the public key the caller actually
/// trusts for it. Lookups are synchronous from the core's point of
/// view; callers wanting asynchronous resolution must finish the
/// lookup before invoking `complete_handshake`.
///
/// # Example
/// ```
/// use veilwire_core::handshake::{Locator, PeerKeyResolver, StaticKeyResolver};
///
/// let alice_key = [0x11u8; 32];
/// let resolver = StaticKeyResolver::new().with_key(
///     Locator::new("alice").unwrap(),
///     alice_key,
/// );
///
/// let locator = Locator::new("alice").unwrap();
/// assert_eq!(resolver.resolve(&locator), Some(alice_key));
/// ```
pub trait PeerKeyResolver: Send + Sync {
    /// Resolves a locator to the trusted public key bound to it.
    ///
    /// Returns `None` when no binding exists.
    fn resolve(&self, locator: &Locator) -> Option<[u8; ED25519_PUBLIC_KEY_SIZE]>;
}

// ============================================
// ResolverFn
// ============================================

/// Adapter turning a plain lookup function into a resolver.
///
/// # Example
/// ```
/// use veilwire_core::handshake::{Locator, PeerKeyResolver, ResolverFn};
///
/// let resolver = ResolverFn(|loc: &Locator| {
///     (loc.as_str() == "alice").then_some([0x11u8; 32])
/// });
///
/// let locator = Locator::new("alice").unwrap();
/// assert_eq!(resolver.resolve(&locator), Some([0x11u8; 32]));
/// ```
pub struct ResolverFn<F>(
    /// The wrapped lookup function.
    pub F,
);

impl<F> PeerKeyResolver for ResolverFn<F>
where
    F: Fn(&Locator) -> Option<[u8; ED25519_PUBLIC_KEY_SIZE]> + Send + Sync,
{
    fn resolve(&self, locator: &Locator) -> Option<[u8; ED25519_PUBLIC_KEY_SIZE]> {
        (self.0)(locator)
    }
}

// ============================================
// StaticKeyResolver
// ============================================

/// In-memory resolver backed by a fixed map.
///
/// # Purpose
/// The simplest trust root: locators bound to keys at construction
/// time. Useful for tests, demos, and deployments whose peer set is
/// known up front. Production systems typically substitute an
/// implementation backed by their real registry.
#[derive(Debug, Default, Clone)]
pub struct StaticKeyResolver {
    keys: HashMap<Locator, [u8; ED25519_PUBLIC_KEY_SIZE]>,
}

impl StaticKeyResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, builder-style.
    #[must_use]
    pub fn with_key(mut self, locator: Locator, key: [u8; ED25519_PUBLIC_KEY_SIZE]) -> Self {
        self.keys.insert(locator, key);
        self
    }

    /// Adds or replaces a binding.
    pub fn insert(&mut self, locator: Locator, key: [u8; ED25519_PUBLIC_KEY_SIZE]) {
        self.keys.insert(locator, key);
    }

    /// Removes a binding, returning the key if one existed.
    pub fn remove(&mut self, locator: &Locator) -> Option<[u8; ED25519_PUBLIC_KEY_SIZE]> {
        self.keys.remove(locator)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no bindings exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl PeerKeyResolver for StaticKeyResolver {
    fn resolve(&self, locator: &Locator) -> Option<[u8; ED25519_PUBLIC_KEY_SIZE]> {
        self.keys.get(locator).copied()
    }
}

// ============================================
// Tests
// ============================================
