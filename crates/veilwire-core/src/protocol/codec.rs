// ============================================
// File: crates/veilwire-core/src/protocol/codec.rs
// ============================================
//! # Protocol Codec
//!
//! ## Creation Reason
//! Provides binary serialization and deserialization for the wire
//! messages, enabling fixed-layout encoding with no prefixes.
//!
//! ## Main Functionality
//! - `Codec` trait: Generic encode/decode interface
//! - `WireCodec`: Implementation for both message types
//!
//! ## Parsing Strategy
//! 1. Check minimum message length
//! 2. Copy fixed-size fields in declaration order
//! 3. Treat any remainder (envelopes only) as the ciphertext region
//!
//! ## ⚠️ Important Note for Next Developer
//! - Always validate buffer lengths before reading
//! - The handshake layout is exactly 128 bytes; a decoder handed a
//!   longer buffer takes the first 128 and leaves the rest in place
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::crypto::CHACHA20_NONCE_SIZE;
use crate::error::{CoreError, Result};
use crate::protocol::messages::{
    Envelope, HandshakeMessage, ENVELOPE_MIN_SIZE, HANDSHAKE_MESSAGE_SIZE,
};

// ============================================
// Codec Trait
// ============================================

/// Trait for encoding and decoding wire messages.
///
/// # Type Parameters
/// * `T` - The message type to encode/decode
pub trait Codec<T> {
    /// Encodes a message into a byte buffer.
    ///
    /// # Arguments
    /// * `msg` - The message to encode
    /// * `buf` - Buffer to write encoded bytes
    fn encode(&self, msg: &T, buf: &mut BytesMut);

    /// Decodes a message from bytes.
    ///
    /// # Arguments
    /// * `buf` - Bytes to decode
    ///
    /// # Errors
    /// Returns `MessageTooShort` if the buffer cannot hold the message.
    fn decode(&self, buf: &mut Bytes) -> Result<T>;
}

// ============================================
// WireCodec
// ============================================

/// Codec implementation for all wire messages.
#[derive(Debug, Default, Clone)]
pub struct WireCodec;

impl WireCodec {
    /// Creates a new wire codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// ============================================
// HandshakeMessage Codec
// ============================================

impl Codec<HandshakeMessage> for WireCodec {
    fn encode(&self, msg: &HandshakeMessage, buf: &mut BytesMut) {
        buf.reserve(HANDSHAKE_MESSAGE_SIZE);
        buf.put_slice(&msg.ephemeral_public);
        buf.put_slice(&msg.identity_public);
        buf.put_slice(&msg.signature);
    }

    fn decode(&self, buf: &mut Bytes) -> Result<HandshakeMessage> {
        if buf.len() < HANDSHAKE_MESSAGE_SIZE {
            return Err(CoreError::too_short(HANDSHAKE_MESSAGE_SIZE, buf.len()));
        }

        let mut ephemeral_public = [0u8; 32];
        buf.copy_to_slice(&mut ephemeral_public);

        let mut identity_public = [0u8; 32];
        buf.copy_to_slice(&mut identity_public);

        let mut signature = [0u8; 64];
        buf.copy_to_slice(&mut signature);

        Ok(HandshakeMessage {
            ephemeral_public,
            identity_public,
            signature,
        })
    }
}

// ============================================
// Envelope Codec
// ============================================

impl Codec<Envelope> for WireCodec {
    fn encode(&self, msg: &Envelope, buf: &mut BytesMut) {
        buf.reserve(CHACHA20_NONCE_SIZE + msg.ciphertext.len());
        buf.put_slice(&msg.nonce);
        buf.put_slice(&msg.ciphertext);
    }

    fn decode(&self, buf: &mut Bytes) -> Result<Envelope> {
        // Smallest valid envelope: nonce plus an empty-plaintext tag
        if buf.len() < ENVELOPE_MIN_SIZE {
            return Err(CoreError::too_short(ENVELOPE_MIN_SIZE, buf.len()));
        }

        let mut nonce = [0u8; CHACHA20_NONCE_SIZE];
        buf.copy_to_slice(&mut nonce);

        // Remaining bytes are the ciphertext region (tag suffix included)
        let ciphertext = buf.to_vec();

        Ok(Envelope { nonce, ciphertext })
    }
}

// ============================================
// Convenience Functions
// ============================================

/// Encodes a HandshakeMessage to bytes.
#[must_use]
pub fn encode_handshake(msg: &HandshakeMessage) -> BytesMut {
    let mut buf = BytesMut::with_capacity(HANDSHAKE_MESSAGE_SIZE);
    WireCodec.encode(msg, &mut buf);
    buf
}

/// Decodes a HandshakeMessage from bytes.
///
/// # Errors
/// Returns `MessageTooShort` if fewer than 128 bytes are supplied.
pub fn decode_handshake(buf: &[u8]) -> Result<HandshakeMessage> {
    let mut bytes = Bytes::copy_from_slice(buf);
    WireCodec.decode(&mut bytes)
}

/// Encodes an Envelope to bytes.
#[must_use]
pub fn encode_envelope(msg: &Envelope) -> BytesMut {
    let mut buf = BytesMut::with_capacity(msg.wire_size());
    WireCodec.encode(msg, &mut buf);
    buf
}

/// Decodes an Envelope from bytes.
///
/// # Errors
/// Returns `MessageTooShort` if the buffer cannot hold a nonce and tag.
pub fn decode_envelope(buf: &[u8]) -> Result<Envelope> {
    let mut bytes = Bytes::copy_from_slice(buf);
    WireCodec.decode(&mut bytes)
}

// ============================================
// Tests
// ============================================
