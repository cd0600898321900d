// ============================================
// File: crates/veilwire-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the wire formats for Veilwire communication: the handshake
//! message and the encrypted message envelope, plus their binary codec.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Wire message structures
//! - [`codec`]: Binary serialization/deserialization
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Handshake Phase                          │
//! │                                                             │
//! │  Party A ────── HandshakeMessage (128 bytes) ────► Party B  │
//! │  Party A ◄───── HandshakeMessage (128 bytes) ────  Party B  │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     Session Phase                           │
//! │                                                             │
//! │  Party A ══════ Envelope (nonce ‖ ciphertext) ════ Party B  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format Principles
//! - Fixed-layout fields, no length prefixes or type tags
//! - The handshake message is exactly 128 bytes
//! - The envelope is the 12-byte nonce followed by an opaque
//!   ciphertext region with the tag as its 16-byte suffix
//! - Multi-byte integers inside nonces are big-endian
//!
//! ## ⚠️ Important Note for Next Developer
//! - Field order is critical - DO NOT reorder
//! - Framing (delimiting messages on a stream) is the transport's job;
//!   this codec assumes it is handed one whole message
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod messages;

// Re-export primary types
pub use codec::{Codec, WireCodec};
pub use messages::{Envelope, HandshakeMessage, ENVELOPE_MIN_SIZE, HANDSHAKE_MESSAGE_SIZE};
