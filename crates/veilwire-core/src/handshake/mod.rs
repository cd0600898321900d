// ============================================
// File: crates/veilwire-core/src/handshake/mod.rs
// ============================================
//! # Handshake Module
//!
//! ## Creation Reason
//! Orchestrates the authenticated key agreement: signing ephemeral keys
//! with long-term identities, checking claimed identities against the
//! caller's trust root, and deriving the session key only when both
//! checks pass.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`resolver`]: `PeerKeyResolver` trust-root boundary
//! - [`coordinator`]: `HandshakeCoordinator` state machine
//!
//! ## Handshake Flow
//! ```text
//! Party A                                          Party B
//!   │                                               │
//!   │  begin_handshake()                            │
//!   │  ├─ ephemeral_public (X25519)                 │
//!   │  ├─ identity_public (Ed25519)                 │
//!   │  └─ signature ─────────────────────────────►  │
//!   │                                               │
//!   │                         begin_handshake()     │
//!   │  ◄──────────────────────── HandshakeMessage   │
//!   │                                               │
//!   │  complete_handshake(msg, "bob", resolver)     │
//!   │  ├─ 1. resolver binds "bob" to the key?       │
//!   │  ├─ 2. signature covers ephemeral bytes?      │
//!   │  └─ 3. derive session key                     │
//!   │                                               │
//!   │ ═══════════ Encrypted Session ═══════════════ │
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The resolver check runs BEFORE signature verification; an
//!   unauthorized identity fails safely with no crypto work
//! - A session key is never observable unless both checks passed
//!
//! ## Last Modified
//! v0.1.0 - Initial handshake implementation

pub mod coordinator;
pub mod resolver;

// Re-export primary types
pub use coordinator::{HandshakeCoordinator, HandshakeState, RejectReason};
pub use resolver::{PeerKeyResolver, ResolverFn, StaticKeyResolver};

// The locator type resolvers key on lives in the common crate
pub use veilwire_common::types::Locator;
