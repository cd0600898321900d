// ============================================
// File: crates/veilwire-core/src/crypto/kdf.rs
// ============================================
//! # Session Key Derivation
//!
//! ## Creation Reason
//! Turns the raw X25519 shared value into a uniformly random,
//! context-bound session key. The raw shared secret is never used as a
//! key directly.
//!
//! ## Main Functionality
//! - `derive_session_key`: Validates the peer key, performs the
//!   exchange, and expands the result through HKDF-SHA256
//!
//! ## Derivation
//! ```text
//! shared_secret = X25519(our_ephemeral_private, their_ephemeral_public)
//! session_key   = HKDF-SHA256(ikm: shared_secret, salt: -, info: context_label)
//! ```
//!
//! The derivation is salt-less; the context label carries the domain
//! separation. Both sides must use the same label or their keys will
//! not match.
//!
//! ## ⚠️ Important Note for Next Developer
//! - The raw shared value is zeroized before this function returns
//! - Changing the label or adding a salt breaks wire compatibility
//!
//! ## Last Modified
//! v0.1.0 - Initial key derivation

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::trace;
use zeroize::Zeroize;

use super::keys::{EphemeralKeyPair, SessionKey};
use super::{CHACHA20_KEY_SIZE, X25519_PUBLIC_KEY_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// Key Derivation
// ============================================

/// Derives a session key from an ephemeral key pair and the peer's
/// ephemeral public key bytes.
///
/// # Arguments
/// * `ephemeral` - Our ephemeral key pair, consumed by the exchange
/// * `their_public` - Peer's X25519 public key, validated to 32 bytes
/// * `context_label` - HKDF info parameter binding the derived key to
///   its purpose (see [`super::SESSION_CONTEXT`])
///
/// # Returns
/// A 32-byte session key suitable for ChaCha20-Poly1305.
///
/// # Errors
/// - `KeyFormat` if `their_public` is not exactly 32 bytes
/// - `KeyDerivation` if HKDF expansion fails
///
/// # Example
/// ```
/// use veilwire_core::crypto::{derive_session_key, EphemeralKeyPair, SESSION_CONTEXT};
///
/// let alice = EphemeralKeyPair::generate();
/// let bob = EphemeralKeyPair::generate();
/// let alice_public = alice.public_key_bytes();
/// let bob_public = bob.public_key_bytes();
///
/// let alice_key = derive_session_key(alice, &bob_public, SESSION_CONTEXT).unwrap();
/// let bob_key = derive_session_key(bob, &alice_public, SESSION_CONTEXT).unwrap();
///
/// assert_eq!(alice_key, bob_key);
/// ```
pub fn derive_session_key(
    ephemeral: EphemeralKeyPair,
    their_public: &[u8],
    context_label: &[u8],
) -> Result<SessionKey> {
    if their_public.len() != X25519_PUBLIC_KEY_SIZE {
        return Err(CoreError::key_format(
            X25519_PUBLIC_KEY_SIZE,
            their_public.len(),
        ));
    }
    let mut peer = [0u8; X25519_PUBLIC_KEY_SIZE];
    peer.copy_from_slice(their_public);

    let mut shared_secret = ephemeral.exchange(&peer);

    let hk = Hkdf::<Sha256>::new(None, &shared_secret);
    let mut key_bytes = [0u8; CHACHA20_KEY_SIZE];
    let expanded = hk.expand(context_label, &mut key_bytes);

    // Clear the raw shared value regardless of the expansion outcome
    shared_secret.zeroize();

    expanded.map_err(|_| CoreError::key_derivation("HKDF expansion failed"))?;

    trace!(
        label_len = context_label.len(),
        "session key derived from ephemeral exchange"
    );

    Ok(SessionKey::from_bytes(key_bytes))
}

// ============================================
// Tests
// ============================================
