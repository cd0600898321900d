// ============================================
// File: crates/veilwire-core/src/protocol/messages.rs
// ============================================
//! # Wire Message Definitions
//!
//! ## Creation Reason
//! Defines the structure of the two messages Veilwire parties exchange:
//! the handshake message and the encrypted envelope.
//!
//! ## Main Functionality
//! - `HandshakeMessage`: Signed ephemeral key offer (fixed 128 bytes)
//! - `Envelope`: Nonce plus AEAD ciphertext for one session message
//!
//! ## Message Sizes
//! | Message | Size (bytes) |
//! |---------|--------------|
//! | HandshakeMessage | 128 |
//! | Envelope | 28 + plaintext length |
//!
//! ## ⚠️ Important Note for Next Developer
//! - Field order is critical - DO NOT reorder
//! - A HandshakeMessage is immutable once constructed and travels as
//!   a unit; the signature covers exactly the ephemeral public bytes
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use std::fmt;

use crate::crypto::{
    nonce_counter, CHACHA20_NONCE_SIZE, ED25519_PUBLIC_KEY_SIZE, ED25519_SIGNATURE_SIZE,
    POLY1305_TAG_SIZE, X25519_PUBLIC_KEY_SIZE,
};

// ============================================
// Size Constants
// ============================================

/// Size of a serialized HandshakeMessage in bytes.
pub const HANDSHAKE_MESSAGE_SIZE: usize =
    X25519_PUBLIC_KEY_SIZE + ED25519_PUBLIC_KEY_SIZE + ED25519_SIGNATURE_SIZE;

/// Minimum size of a serialized Envelope in bytes (nonce + tag).
pub const ENVELOPE_MIN_SIZE: usize = CHACHA20_NONCE_SIZE + POLY1305_TAG_SIZE;

// ============================================
// HandshakeMessage
// ============================================

/// A party's signed ephemeral key offer.
///
/// # Purpose
/// Carries everything a peer needs to authenticate this party and
/// derive the session key: the fresh X25519 ephemeral public key, the
/// long-term Ed25519 identity key, and the identity's signature over
/// the raw ephemeral public bytes.
///
/// # Wire Format (128 bytes, no prefixes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ ephemeral_public (32 bytes)   │ X25519     │
/// ├────────────────────────────────────────────┤
/// │ identity_public (32 bytes)    │ Ed25519    │
/// ├────────────────────────────────────────────┤
/// │ signature (64 bytes)          │ Ed25519    │
/// └────────────────────────────────────────────┘
/// ```
///
/// # Trust
/// The embedded `identity_public` is a claim, not a fact: receivers
/// must check it against their resolver before verifying the signature
/// means anything.
#[derive(Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    /// Fresh X25519 ephemeral public key for this handshake.
    pub ephemeral_public: [u8; X25519_PUBLIC_KEY_SIZE],
    /// Long-term Ed25519 identity public key (claimed).
    pub identity_public: [u8; ED25519_PUBLIC_KEY_SIZE],
    /// Ed25519 signature over `ephemeral_public`.
    pub signature: [u8; ED25519_SIGNATURE_SIZE],
}

impl HandshakeMessage {
    /// Creates a new HandshakeMessage from its parts.
    #[must_use]
    pub fn new(
        ephemeral_public: [u8; X25519_PUBLIC_KEY_SIZE],
        identity_public: [u8; ED25519_PUBLIC_KEY_SIZE],
        signature: [u8; ED25519_SIGNATURE_SIZE],
    ) -> Self {
        Self {
            ephemeral_public,
            identity_public,
            signature,
        }
    }

    /// Returns the size of a serialized HandshakeMessage.
    #[must_use]
    pub const fn wire_size() -> usize {
        HANDSHAKE_MESSAGE_SIZE
    }
}

impl fmt::Debug for HandshakeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeMessage")
            .field("ephemeral_public", &hex_prefix(&self.ephemeral_public))
            .field("identity_public", &hex_prefix(&self.identity_public))
            .field("signature", &hex_prefix(&self.signature))
            .finish()
    }
}

// ============================================
// Envelope
// ============================================

/// One encrypted session message.
///
/// # Purpose
/// Pairs the nonce a message was sealed under with the opaque
/// ciphertext region. The 16-byte Poly1305 tag is the suffix of
/// `ciphertext`, exactly as the AEAD primitive emits it.
///
/// # Wire Format (28 + N bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ nonce (12 bytes)              │ counter‖rnd│
/// ├────────────────────────────────────────────┤
/// │ ciphertext (N bytes)          │ ChaCha20   │
/// │ └─ tag (16-byte suffix)       │ Poly1305   │
/// └────────────────────────────────────────────┘
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Nonce the message was sealed under.
    pub nonce: [u8; CHACHA20_NONCE_SIZE],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Creates a new Envelope.
    #[must_use]
    pub fn new(nonce: [u8; CHACHA20_NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    /// Returns the sender's nonce counter for this message.
    #[must_use]
    pub fn counter(&self) -> u64 {
        nonce_counter(&self.nonce)
    }

    /// Returns the total wire size of this envelope.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        CHACHA20_NONCE_SIZE + self.ciphertext.len()
    }

    /// Returns the plaintext length this envelope decrypts to, if its
    /// ciphertext region is at least tag-sized.
    #[must_use]
    pub fn plaintext_len(&self) -> Option<usize> {
        self.ciphertext.len().checked_sub(POLY1305_TAG_SIZE)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("counter", &self.counter())
            .field("nonce", &hex_prefix(&self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

// Truncated hex rendering for Debug output
fn hex_prefix(bytes: &[u8]) -> String {
    let take = bytes.len().min(4);
    format!("{}...", hex::encode(&bytes[..take]))
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_message_size() {
        // 32 + 32 + 64 = 128
        assert_eq!(HandshakeMessage::wire_size(), 128);
        assert_eq!(HANDSHAKE_MESSAGE_SIZE, 128);
    }

    #[test]
    fn test_envelope_min_size() {
        // 12 + 16 = 28
        assert_eq!(ENVELOPE_MIN_SIZE, 28);
    }

    #[test]
    fn test_envelope_counter() {
        let mut nonce = [0u8; CHACHA20_NONCE_SIZE];
        nonce[..8].copy_from_slice(&42u64.to_be_bytes());

        let envelope = Envelope::new(nonce, vec![0u8; 20]);
        assert_eq!(envelope.counter(), 42);
        assert_eq!(envelope.wire_size(), 32);
        assert_eq!(envelope.plaintext_len(), Some(4));
    }

    #[test]
    fn test_envelope_plaintext_len_short() {
        let envelope = Envelope::new([0u8; CHACHA20_NONCE_SIZE], vec![0u8; 10]);
        assert_eq!(envelope.plaintext_len(), None);
    }

    #[test]
    fn test_debug_truncates_material() {
        let msg = HandshakeMessage::new([0xAB; 32], [0xCD; 32], [0xEF; 64]);
        let debug = format!("{msg:?}");

        assert!(debug.contains("abababab..."));
        // Full signature never rendered
        assert!(!debug.contains(&"ef".repeat(64)));
    }
}
