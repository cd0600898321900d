// ============================================
// File: crates/veilwire-core/src/crypto/keys.rs
// ============================================
//! # Cryptographic Key Types
//!
//! ## Creation Reason
//! Defines key types used throughout the Veilwire protocol with proper
//! security properties (Zeroize on drop, constant-time comparison).
//!
//! ## Main Functionality
//! - `IdentityKeyPair`: Long-term Ed25519 signing keys
//! - `EphemeralKeyPair`: Per-handshake X25519 key exchange keys
//! - `SessionKey`: Derived symmetric encryption key
//! - `verify_detached`: Length-tolerant boolean signature verification
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  IdentityKeyPair (Long-term)                               │
//! │  ├─ Created and stored outside the core                    │
//! │  ├─ Used for signing ephemeral public keys                 │
//! │  └─ Identifies the endpoint to the resolver                │
//! │                                                            │
//! │  EphemeralKeyPair (Per-handshake)                          │
//! │  ├─ Generated fresh for each handshake attempt             │
//! │  ├─ Consumed by the X25519 exchange (move semantics)       │
//! │  └─ Zeroized on drop, never persisted or reused            │
//! │                                                            │
//! │  SessionKey (Per-session)                                  │
//! │  ├─ Derived from the key exchange                          │
//! │  ├─ Used for ChaCha20-Poly1305 encryption                  │
//! │  └─ Zeroized when the session closes                       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL key types MUST implement Zeroize
//! - Private keys should NEVER be logged or serialized carelessly
//! - Use constant-time comparison for key equality
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{
    CHACHA20_KEY_SIZE, ED25519_PUBLIC_KEY_SIZE, ED25519_SIGNATURE_SIZE, X25519_PUBLIC_KEY_SIZE,
};
use crate::error::{CoreError, Result};

// ============================================
// IdentityKeyPair (Ed25519)
// ============================================

/// Long-term Ed25519 identity key pair for signing.
///
/// # Purpose
/// Signs the ephemeral public key during a handshake, proving the
/// identity of the sender without revealing the private key. Lifecycle
/// management (storage, rotation) is an external concern; the core only
/// signs with the private half and verifies with the public half.
///
/// # Security
/// - Private key is zeroed on drop (by `ed25519-dalek`)
/// - Never serialize the private key to untrusted storage
/// - Generated from the OS random number generator
///
/// # Example
/// ```
/// use veilwire_core::crypto::IdentityKeyPair;
///
/// let identity = IdentityKeyPair::generate();
///
/// let message = b"hello world";
/// let signature = identity.sign(message);
///
/// assert!(identity.public_key().verify(message, &signature).is_ok());
/// ```
pub struct IdentityKeyPair {
    /// Ed25519 signing key (private)
    signing_key: SigningKey,
}

impl IdentityKeyPair {
    /// Generates a new random identity key pair.
    ///
    /// Uses the operating system's secure random number generator;
    /// an entropy-source failure aborts rather than degrading.
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Creates an identity key pair from raw private key bytes.
    ///
    /// # Arguments
    /// * `bytes` - 32-byte Ed25519 private key seed
    ///
    /// # Errors
    /// Returns `KeyFormat` if bytes length is incorrect.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(CoreError::key_format(32, bytes.len()));
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(bytes);
        let signing_key = SigningKey::from_bytes(&key_bytes);
        key_bytes.zeroize();
        Ok(Self { signing_key })
    }

    /// Returns the public key component.
    #[must_use]
    pub fn public_key(&self) -> IdentityPublicKey {
        IdentityPublicKey(self.signing_key.verifying_key())
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_SIZE] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Signs a message using this identity.
    ///
    /// Ed25519 signing is deterministic: no randomness dependency
    /// beyond the key itself.
    ///
    /// # Arguments
    /// * `message` - Data to sign
    ///
    /// # Returns
    /// 64-byte Ed25519 signature
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; ED25519_SIGNATURE_SIZE] {
        let signature = self.signing_key.sign(message);
        signature.to_bytes()
    }

    /// Exports the private key bytes for secure storage.
    ///
    /// # Security Warning
    /// Handle the returned bytes with extreme care. They should be
    /// encrypted before storage and zeroed after use.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for IdentityKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private key material
        f.debug_struct("IdentityKeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

// ============================================
// IdentityPublicKey
// ============================================

/// Public component of an Ed25519 identity key.
///
/// Safe to share publicly. Used to verify signatures from the
/// corresponding private key holder.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IdentityPublicKey(VerifyingKey);

impl IdentityPublicKey {
    /// Creates a public key from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - 32-byte Ed25519 public key
    ///
    /// # Errors
    /// Returns `KeyFormat` if the bytes do not encode a valid point.
    pub fn from_bytes(bytes: &[u8; ED25519_PUBLIC_KEY_SIZE]) -> Result<Self> {
        let key = VerifyingKey::from_bytes(bytes)
            .map_err(|_| CoreError::key_format(ED25519_PUBLIC_KEY_SIZE, bytes.len()))?;
        Ok(Self(key))
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_SIZE] {
        self.0.as_bytes()
    }

    /// Returns the raw public key bytes (owned).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Verifies a signature against this public key.
    ///
    /// # Errors
    /// Returns `SignatureInvalid` if verification fails.
    pub fn verify(&self, message: &[u8], signature: &[u8; ED25519_SIGNATURE_SIZE]) -> Result<()> {
        let sig = Signature::from_bytes(signature);
        self.0
            .verify(message, &sig)
            .map_err(|_| CoreError::SignatureInvalid)
    }
}

impl fmt::Debug for IdentityPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show truncated hex for debugging
        let bytes = self.0.as_bytes();
        write!(
            f,
            "IdentityPublicKey({:02x}{:02x}{:02x}{:02x}...)",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

impl fmt::Display for IdentityPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64.encode(self.0.as_bytes()))
    }
}

impl Serialize for IdentityPublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&BASE64.encode(self.0.as_bytes()))
        } else {
            serializer.serialize_bytes(self.0.as_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for IdentityPublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            BASE64.decode(&s).map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        if bytes.len() != ED25519_PUBLIC_KEY_SIZE {
            return Err(serde::de::Error::invalid_length(bytes.len(), &"32 bytes"));
        }
        let mut arr = [0u8; ED25519_PUBLIC_KEY_SIZE];
        arr.copy_from_slice(&bytes);
        Self::from_bytes(&arr).map_err(serde::de::Error::custom)
    }
}

// ============================================
// Detached Verification
// ============================================

/// Verifies a detached signature given raw byte inputs.
///
/// Returns `false` on wrong-length public key, wrong-length signature,
/// an invalid key encoding, or cryptographic mismatch. It never raises
/// an error that could be mistaken for success, which makes it the
/// right primitive for accepting untrusted handshake bytes. The length
/// checks operate on public data only; the signature check itself is
/// constant-time inside `ed25519-dalek`.
///
/// # Example
/// ```
/// use veilwire_core::crypto::{verify_detached, IdentityKeyPair};
///
/// let identity = IdentityKeyPair::generate();
/// let signature = identity.sign(b"payload");
///
/// assert!(verify_detached(&identity.public_key_bytes(), b"payload", &signature));
/// assert!(!verify_detached(&identity.public_key_bytes(), b"other", &signature));
/// assert!(!verify_detached(&[0u8; 16], b"payload", &signature));
/// ```
#[must_use]
pub fn verify_detached(public: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public) = <[u8; ED25519_PUBLIC_KEY_SIZE]>::try_from(public) else {
        return false;
    };
    let Ok(signature) = <[u8; ED25519_SIGNATURE_SIZE]>::try_from(signature) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&public) else {
        return false;
    };
    let sig = Signature::from_bytes(&signature);
    key.verify(message, &sig).is_ok()
}

// ============================================
// EphemeralKeyPair (X25519)
// ============================================

/// Ephemeral X25519 key pair for Diffie-Hellman key exchange.
///
/// # Purpose
/// Generated fresh for each handshake attempt to provide forward
/// secrecy. The private scalar is consumed by the exchange and cannot
/// be reused; `x25519-dalek` zeroizes it on drop.
///
/// # Security
/// - Single-use design (consumed by `exchange`)
/// - Never persisted, never reused across sessions
///
/// # Example
/// ```
/// use veilwire_core::crypto::EphemeralKeyPair;
///
/// let alice = EphemeralKeyPair::generate();
/// let bob = EphemeralKeyPair::generate();
///
/// let alice_public = alice.public_key_bytes();
/// let bob_public = bob.public_key_bytes();
///
/// // Exchange consumes the private keys
/// let alice_shared = alice.exchange(&bob_public);
/// let bob_shared = bob.exchange(&alice_public);
///
/// assert_eq!(alice_shared, bob_shared);
/// ```
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: X25519PublicKey,
}

impl EphemeralKeyPair {
    /// Generates a new random ephemeral key pair.
    ///
    /// Uses the operating system's secure random number generator;
    /// an entropy-source failure aborts rather than degrading.
    #[must_use]
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Returns the public key bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; X25519_PUBLIC_KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Performs key exchange with a peer's public key.
    ///
    /// # Consumes Self
    /// This method consumes the key pair, ensuring the private key
    /// cannot be reused (single-use ephemeral keys).
    ///
    /// # Arguments
    /// * `peer_public` - 32-byte X25519 public key of the peer
    ///
    /// # Returns
    /// 32-byte raw shared secret. Callers must run it through the KDF
    /// before using it as a key; see [`super::kdf::derive_session_key`].
    #[must_use]
    pub fn exchange(self, peer_public: &[u8; X25519_PUBLIC_KEY_SIZE]) -> [u8; 32] {
        let peer_key = X25519PublicKey::from(*peer_public);
        let shared = self.secret.diffie_hellman(&peer_key);
        shared.to_bytes()
    }
}

impl fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.public.as_bytes();
        f.debug_struct("EphemeralKeyPair")
            .field(
                "public",
                &format_args!(
                    "{:02x}{:02x}{:02x}{:02x}...",
                    bytes[0], bytes[1], bytes[2], bytes[3]
                ),
            )
            .finish_non_exhaustive()
    }
}

// ============================================
// SessionKey
// ============================================

/// Symmetric session key for message encryption.
///
/// # Purpose
/// Derived from the X25519 key exchange, used for ChaCha20-Poly1305
/// authenticated encryption of all session messages. Only exists after
/// a successful handshake; never transmitted.
///
/// # Security
/// - Zeroed on drop
/// - Never logged or serialized
/// - Constant-time comparison
///
/// # Derivation
/// ```text
/// shared_secret = X25519(our_ephemeral, their_ephemeral)
/// session_key   = HKDF-SHA256(ikm: shared_secret, info: context_label)
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; CHACHA20_KEY_SIZE]);

impl SessionKey {
    /// Creates a session key from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - 32-byte key material
    #[must_use]
    pub fn from_bytes(bytes: [u8; CHACHA20_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    ///
    /// # Security Warning
    /// Handle the returned reference carefully. Do not log or
    /// store the key material in unprotected storage.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CHACHA20_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SessionKey([REDACTED])")
    }
}

impl PartialEq for SessionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SessionKey {}

// ============================================
// Tests
// ============================================
