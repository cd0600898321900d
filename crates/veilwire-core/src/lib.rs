// ============================================
// File: crates/veilwire-core/src/lib.rs
// ============================================
//! # Veilwire Core - Handshake & Session Cryptography
//!
//! ## Creation Reason
//! Establishes a mutually authenticated, encrypted session between two
//! parties over an untrusted channel: ephemeral key agreement bound to
//! long-term identity keys, followed by authenticated symmetric
//! encryption of application messages.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - Key types (`IdentityKeyPair`, `EphemeralKeyPair`, `SessionKey`)
//! - Session key derivation (X25519 + HKDF-SHA256)
//! - Message encryption (ChaCha20-Poly1305)
//!
//! ### Protocol Module ([`protocol`])
//! - `HandshakeMessage` and `Envelope` wire structures
//! - Fixed-layout binary codec
//!
//! ### Handshake Module ([`handshake`])
//! - `PeerKeyResolver` trust-root boundary
//! - `HandshakeCoordinator` state machine
//!
//! ### Session Module ([`session`])
//! - `SessionCipher` with nonce discipline and replay tracking
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │          caller (transport, registry, app)          │
//! │                    │                                │
//! │                    ▼                                │
//! │             veilwire-core  ◄── You are here         │
//! │                    │                                │
//! │                    ▼                                │
//! │             veilwire-common                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Transport I/O, key-registry lookups, and identity-key storage are
//! the caller's responsibility; the core performs no blocking I/O and
//! every operation is a synchronous function call.
//!
//! ## Security Guarantees
//! - **Confidentiality**: ChaCha20-Poly1305 authenticated encryption
//! - **Integrity**: Poly1305 tag on every session message
//! - **Authenticity**: Ed25519 signatures over ephemeral keys, checked
//!   against an independent trust root
//! - **Forward Secrecy**: X25519 ephemeral key exchange per session
//! - **Nonce Discipline**: Strictly increasing counters, never reused
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - NEVER implement custom crypto primitives
//! - ALL keys MUST implement Zeroize for secure cleanup
//! - Wire format changes break interoperability
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod handshake;
pub mod protocol;
pub mod session;

// Re-export commonly used items
pub use crypto::{EphemeralKeyPair, IdentityKeyPair, IdentityPublicKey, SessionKey};
pub use error::{CoreError, Result};
pub use handshake::{
    HandshakeCoordinator, HandshakeState, Locator, PeerKeyResolver, RejectReason,
    StaticKeyResolver,
};
pub use protocol::{Envelope, HandshakeMessage};
pub use session::{SessionCipher, SessionPolicy};
