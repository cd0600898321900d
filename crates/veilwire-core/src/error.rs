// ============================================
// File: crates/veilwire-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines error types specific to the handshake and session
//! cryptography in the Veilwire core crate.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//!
//! ## Error Categories
//! 1. **Key material errors**: Malformed lengths, failed derivation
//! 2. **Handshake errors**: Unauthorized identity, invalid signature
//! 3. **Session errors**: Authentication failure, nonce exhaustion, replay
//! 4. **Wire errors**: Truncated or malformed messages
//! 5. **State errors**: Operations invoked outside their valid state
//!
//! ## Propagation Policy
//! All non-state errors are terminal for the artifact in question (a
//! handshake attempt or a single message). They surface to the caller
//! and are never silently retried or downgraded to success.
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - Keep error messages informative but secure
//! - All errors should be loggable without leaking secrets
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use veilwire_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for handshake and session operations.
///
/// # Security Note
/// Error messages are designed to be informative for debugging
/// without revealing sensitive information like key material.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Key Material Errors
    // ========================================

    /// Key material has the wrong length.
    #[error("Malformed key material: expected {expected} bytes, got {actual}")]
    KeyFormat {
        /// Expected length in bytes
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// Key derivation failed.
    #[error("Key derivation failed: {reason}")]
    KeyDerivation {
        /// Why derivation failed
        reason: String,
    },

    // ========================================
    // Handshake Errors
    // ========================================

    /// The resolver does not bind the claimed identity to the
    /// presented key (not found, or found with a different key).
    #[error("Claimed identity '{locator}' is not authorized by the resolver")]
    ResolverMismatch {
        /// The claimed identity locator
        locator: String,
    },

    /// Handshake signature verification failed.
    #[error("Handshake signature verification failed")]
    SignatureInvalid,

    // ========================================
    // Session Errors
    // ========================================

    /// AEAD authentication failed on decrypt (tampered or wrong key).
    #[error("Decryption failed: authentication error")]
    AuthenticationFailure,

    /// The nonce counter would leave its 8-byte range. Fatal for the
    /// session: it must be discarded and re-established, never wrapped.
    #[error("Nonce counter exhausted: session must be re-established")]
    NonceExhausted,

    /// Replay detected (counter already covered by the window).
    #[error("Replay detected: counter {received} already covered (highest seen {highest})")]
    ReplayDetected {
        /// Counter value received
        received: u64,
        /// Highest counter seen so far
        highest: u64,
    },

    // ========================================
    // Wire Errors
    // ========================================

    /// Message is too short to be valid.
    #[error("Message too short: expected at least {expected} bytes, got {actual}")]
    MessageTooShort {
        /// Minimum expected length
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// Message is malformed.
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },

    // ========================================
    // State Errors
    // ========================================

    /// Operation not valid in current state.
    #[error("Invalid state for operation: {operation} requires {required_state}")]
    InvalidState {
        /// What operation was attempted
        operation: String,
        /// What state was required
        required_state: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `KeyFormat` error.
    #[must_use]
    pub const fn key_format(expected: usize, actual: usize) -> Self {
        Self::KeyFormat { expected, actual }
    }

    /// Creates a `KeyDerivation` error.
    pub fn key_derivation(reason: impl Into<String>) -> Self {
        Self::KeyDerivation {
            reason: reason.into(),
        }
    }

    /// Creates a `ResolverMismatch` error.
    pub fn resolver_mismatch(locator: impl Into<String>) -> Self {
        Self::ResolverMismatch {
            locator: locator.into(),
        }
    }

    /// Creates a `ReplayDetected` error.
    #[must_use]
    pub const fn replay(received: u64, highest: u64) -> Self {
        Self::ReplayDetected { received, highest }
    }

    /// Creates a `MessageTooShort` error.
    #[must_use]
    pub const fn too_short(expected: usize, actual: usize) -> Self {
        Self::MessageTooShort { expected, actual }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidState` error.
    pub fn invalid_state(
        operation: impl Into<String>,
        required_state: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            required_state: required_state.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a cryptographic error.
    ///
    /// Crypto errors might indicate an attack or implementation bug.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::KeyFormat { .. }
                | Self::KeyDerivation { .. }
                | Self::SignatureInvalid
                | Self::AuthenticationFailure
        )
    }

    /// Returns `true` if this error aborts a handshake attempt.
    ///
    /// A rejected handshake never auto-retries; the caller must start
    /// a fresh one with new ephemeral material.
    #[must_use]
    pub const fn is_handshake_rejection(&self) -> bool {
        matches!(self, Self::ResolverMismatch { .. } | Self::SignatureInvalid)
    }

    /// Returns `true` if this error might indicate an attack.
    ///
    /// These errors warrant additional logging/monitoring.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(
            self,
            Self::ResolverMismatch { .. }
                | Self::SignatureInvalid
                | Self::AuthenticationFailure
                | Self::ReplayDetected { .. }
        )
    }
}

// ============================================
// Tests
// ============================================
