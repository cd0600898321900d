// ============================================
// File: crates/veilwire-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes fundamental type definitions used throughout the Veilwire
//! stack, ensuring type safety and consistent representations.
//!
//! ## Main Functionality
//! - `Locator`: Validated identity locator handed to key resolvers
//!
//! ## Main Logical Flow
//! 1. The caller names a peer ("alice") when completing a handshake
//! 2. The locator is passed to the configured resolver
//! 3. The resolver maps it to the trusted long-term public key
//!
//! ## ⚠️ Important Note for Next Developer
//! - A `Locator` carries no trust by itself - it is only a lookup key.
//!   The resolver is the source of truth for the key binding.
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, Result};

// ============================================
// Constants
// ============================================

/// Maximum accepted locator length in bytes.
pub const MAX_LOCATOR_LEN: usize = 255;

// ============================================
// Locator
// ============================================

/// Identity locator used to look up a peer's trusted public key.
///
/// # Purpose
/// Names the identity a handshake peer claims to be ("alice",
/// "node-7.example"). The locator is resolved to a trusted 32-byte
/// public key by the caller's `PeerKeyResolver` implementation; the
/// claimed key embedded in a handshake message is never trusted
/// without that independent check.
///
/// # Validation
/// Non-empty, at most [`MAX_LOCATOR_LEN`] bytes.
///
/// # Example
/// ```
/// use veilwire_common::types::Locator;
///
/// let locator = Locator::new("alice").unwrap();
/// assert_eq!(locator.as_str(), "alice");
///
/// assert!(Locator::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Creates a validated locator.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the locator is empty or longer than
    /// [`MAX_LOCATOR_LEN`] bytes.
    pub fn new(locator: impl Into<String>) -> Result<Self> {
        let locator = locator.into();
        if locator.is_empty() {
            return Err(CommonError::invalid_input("locator", "must not be empty"));
        }
        if locator.len() > MAX_LOCATOR_LEN {
            return Err(CommonError::invalid_input(
                "locator",
                format!("must be at most {MAX_LOCATOR_LEN} bytes"),
            ));
        }
        Ok(Self(locator))
    }

    /// Returns the locator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({:?})", self.0)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locator {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Locator {
    type Error = CommonError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ============================================
// Tests
// ============================================
