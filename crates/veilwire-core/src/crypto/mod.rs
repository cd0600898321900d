// ============================================
// File: crates/veilwire-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes all cryptographic operations for the Veilwire secure
//! channel, using audited RustCrypto implementations.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: Key types and generation (Ed25519, X25519)
//! - [`kdf`]: Session key derivation (X25519 + HKDF-SHA256)
//! - [`cipher`]: Message encryption (ChaCha20-Poly1305) and nonces
//!
//! ### Key Types
//! - `IdentityKeyPair`: Long-term Ed25519 keys for signing
//! - `EphemeralKeyPair`: Per-handshake X25519 keys for key exchange
//! - `SessionKey`: Derived symmetric key for session encryption
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Handshake Phase                          │
//! │  Initiator                                    Responder     │
//! │    │                                              │         │
//! │    │  X25519 Ephemeral Key ────────────────────►  │         │
//! │    │  Ed25519 Identity Key ────────────────────►  │         │
//! │    │  Signature over ephemeral ────────────────►  │         │
//! │    │                                              │         │
//! │    │ ◄──────────────────── X25519 Ephemeral Key   │         │
//! │    │ ◄──────────────────── Ed25519 Identity Key   │         │
//! │    │ ◄─────────────── Signature over ephemeral    │         │
//! │    │                                              │         │
//! │    │        X25519 Key Exchange                   │         │
//! │    │              │                               │         │
//! │    │              ▼                               │         │
//! │    │      HKDF-SHA256 ─────► Session Key          │         │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Session Phase                           │
//! │                                                             │
//! │  Session Key + Counter Nonce ──► ChaCha20-Poly1305 ──► Wire │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//! - **Forward Secrecy**: Fresh ephemeral keys per handshake
//! - **Authentication**: Ed25519 signatures over ephemeral keys
//! - **Confidentiality**: ChaCha20 stream cipher
//! - **Integrity**: Poly1305 authentication tag
//! - **Nonce Discipline**: Strictly increasing counters, never reused
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited)
//! - NEVER roll your own crypto
//! - ALL sensitive keys implement Zeroize
//! - Changing `SESSION_CONTEXT` breaks wire compatibility
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export primary types at module level
pub use cipher::{build_nonce, nonce_counter, open, random_suffix, seal};
pub use kdf::derive_session_key;
pub use keys::{verify_detached, EphemeralKeyPair, IdentityKeyPair, IdentityPublicKey, SessionKey};

// ============================================
// Constants
// ============================================

/// Size of Ed25519 public key in bytes.
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of Ed25519 signature in bytes.
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Size of X25519 public key in bytes.
pub const X25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of ChaCha20-Poly1305 key in bytes.
pub const CHACHA20_KEY_SIZE: usize = 32;

/// Size of ChaCha20-Poly1305 nonce in bytes.
pub const CHACHA20_NONCE_SIZE: usize = 12;

/// Size of Poly1305 authentication tag in bytes.
pub const POLY1305_TAG_SIZE: usize = 16;

/// Size of the big-endian counter prefix of a nonce.
pub const NONCE_COUNTER_SIZE: usize = 8;

/// Size of the random suffix of a nonce.
pub const NONCE_SUFFIX_SIZE: usize = 4;

/// Default HKDF context label binding derived session keys.
pub const SESSION_CONTEXT: &[u8] = b"veilwire-session-v1";
