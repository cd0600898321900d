// ============================================
// File: crates/veilwire-core/src/crypto/cipher.rs
// ============================================
//! # Message Encryption
//!
//! ## Creation Reason
//! Provides authenticated encryption for session messages using the
//! ChaCha20-Poly1305 AEAD cipher, together with nonce construction.
//!
//! ## Main Functionality
//! - `seal` / `open`: Stateless AEAD primitives over a `SessionKey`
//! - `build_nonce` / `nonce_counter`: Counter-disciplined nonce layout
//! - `random_suffix`: Fresh entropy for the nonce tail
//!
//! ## Nonce Construction
//! ```text
//! nonce (12 bytes) = counter (8 bytes, big-endian) || random (4 bytes)
//! ```
//!
//! The counter half makes uniqueness auditable (strictly increasing per
//! sender per key); the random half adds entropy. The counter is
//! recoverable from the wire for replay tracking.
//!
//! ## Security Properties
//! - **AEAD**: Authenticated Encryption with Associated Data
//! - **Tag**: 16-byte Poly1305 tag appended to the ciphertext
//! - **No partial plaintext**: Decryption only returns data after the
//!   tag verifies
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never reuse a (key, nonce) pair - catastrophic security failure
//! - Counter allocation lives in the session layer; these primitives
//!   trust the caller to hand them a unique nonce
//!
//! ## Last Modified
//! v0.1.0 - Initial cipher implementation

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use super::keys::SessionKey;
use super::{CHACHA20_NONCE_SIZE, NONCE_COUNTER_SIZE, NONCE_SUFFIX_SIZE, POLY1305_TAG_SIZE};
use crate::error::{CoreError, Result};
use veilwire_common::error::CommonError;

// ============================================
// Nonce Construction
// ============================================

/// Builds a 12-byte nonce from a counter and a random suffix.
///
/// # Format
/// ```text
/// nonce[0..8]  = counter (big-endian)
/// nonce[8..12] = suffix (random)
/// ```
#[must_use]
pub fn build_nonce(counter: u64, suffix: [u8; NONCE_SUFFIX_SIZE]) -> [u8; CHACHA20_NONCE_SIZE] {
    let mut nonce = [0u8; CHACHA20_NONCE_SIZE];
    nonce[..NONCE_COUNTER_SIZE].copy_from_slice(&counter.to_be_bytes());
    nonce[NONCE_COUNTER_SIZE..].copy_from_slice(&suffix);
    nonce
}

/// Extracts the big-endian counter prefix from a nonce.
#[must_use]
pub fn nonce_counter(nonce: &[u8; CHACHA20_NONCE_SIZE]) -> u64 {
    let mut counter = [0u8; NONCE_COUNTER_SIZE];
    counter.copy_from_slice(&nonce[..NONCE_COUNTER_SIZE]);
    u64::from_be_bytes(counter)
}

/// Generates a fresh random nonce suffix.
#[must_use]
pub fn random_suffix() -> [u8; NONCE_SUFFIX_SIZE] {
    let mut suffix = [0u8; NONCE_SUFFIX_SIZE];
    OsRng.fill_bytes(&mut suffix);
    suffix
}

// ============================================
// Seal / Open
// ============================================

/// Encrypts and authenticates a message.
///
/// # Arguments
/// * `key` - 32-byte session key
/// * `nonce` - 12-byte nonce, unique for this key
/// * `plaintext` - Data to encrypt
/// * `associated_data` - Authenticated but not encrypted
///
/// # Returns
/// Ciphertext with the 16-byte authentication tag appended.
///
/// # Errors
/// Returns an internal error if the cipher rejects the inputs (does not
/// happen with a valid 32-byte key).
pub fn seal(
    key: &SessionKey,
    nonce: &[u8; CHACHA20_NONCE_SIZE],
    plaintext: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CommonError::internal("AEAD cipher construction failed"))?;
    let nonce = Nonce::from(*nonce);

    cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: associated_data,
            },
        )
        .map_err(|_| CommonError::internal("AEAD encryption failed").into())
}

/// Verifies and decrypts a message.
///
/// # Arguments
/// * `key` - 32-byte session key
/// * `nonce` - 12-byte nonce the sender used
/// * `ciphertext` - Ciphertext including the 16-byte tag suffix
/// * `associated_data` - Must match what the sender authenticated
///
/// # Returns
/// The plaintext, only if the tag verifies.
///
/// # Errors
/// Returns `AuthenticationFailure` on tag mismatch, wrong key, wrong
/// nonce, mismatched associated data, or a ciphertext shorter than the
/// tag. No partial or tentative plaintext is ever returned.
pub fn open(
    key: &SessionKey,
    nonce: &[u8; CHACHA20_NONCE_SIZE],
    ciphertext: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    if ciphertext.len() < POLY1305_TAG_SIZE {
        return Err(CoreError::AuthenticationFailure);
    }

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CoreError::AuthenticationFailure)?;
    let nonce = Nonce::from(*nonce);

    cipher
        .decrypt(
            &nonce,
            Payload {
                msg: ciphertext,
                aad: associated_data,
            },
        )
        .map_err(|_| CoreError::AuthenticationFailure)
}

// ============================================
// Tests
// ============================================
