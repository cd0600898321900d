// ============================================
// File: crates/veilwire-core/src/session/mod.rs
// ============================================
//! # Session Module
//!
//! ## Creation Reason
//! Provides the stateful AEAD session built on top of an established
//! handshake: nonce discipline, replay tracking, and key teardown.
//!
//! ## Main Functionality
//! - `SessionCipher`: Encrypt/decrypt state machine over a `SessionKey`
//! - `SessionPolicy`: Replay-protection and fail-closed knobs
//! - [`replay`]: Sliding-window counter tracking
//!
//! ## Session Lifecycle
//! ```text
//! ┌───────────────┐   SessionCipher::new    ┌───────┐
//! │ (no session)  │ ──────────────────────► │ Ready │
//! └───────────────┘   (after Established)   └───┬───┘
//!                                               │
//!                          ┌────────────────────┼──────────────┐
//!                          │                    │              │
//!                          ▼                    ▼              ▼
//!                    explicit close    fail-closed policy   (drop)
//!                          │                    │
//!                          └─────────┬──────────┘
//!                                    ▼
//!                               ┌────────┐
//!                               │ Closed │
//!                               └────────┘
//! ```
//!
//! ## Concurrency
//! - The nonce counter is a single atomic read-modify-write; concurrent
//!   senders on one cipher can never allocate the same counter
//! - The key sits behind a RwLock so ordinary operations share a read
//!   guard while close (explicit or fail-closed) retires it exclusively
//! - The replay window is guarded by a mutex on the decrypt path
//!
//! ## ⚠️ Important Note for Next Developer
//! - Counter MUST be unique per message per session key
//! - Never reuse a (key, nonce) pair - catastrophic security failure
//! - Counter exhaustion is fatal; the session is discarded, not wrapped
//!
//! ## Last Modified
//! v0.1.0 - Initial session implementation

pub mod replay;

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use veilwire_common::time::AtomicInstant;

use crate::crypto::{build_nonce, open, random_suffix, seal, SessionKey};
use crate::error::{CoreError, Result};
use crate::protocol::messages::Envelope;

pub use replay::{CounterCheck, ReplayWindow, REPLAY_WINDOW_SIZE};

// ============================================
// SessionPolicy
// ============================================

/// Tunable session behavior.
///
/// # Defaults
/// - Replay protection: on (2048-counter sliding window)
/// - Fail-closed threshold: off (a tag failure drops only the
///   offending message)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    replay_protection: bool,
    fail_closed_after: Option<u32>,
}

impl SessionPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            replay_protection: true,
            fail_closed_after: None,
        }
    }

    /// Enables or disables replay tracking of remote nonce counters.
    #[must_use]
    pub const fn replay_protection(mut self, enabled: bool) -> Self {
        self.replay_protection = enabled;
        self
    }

    /// Closes the session after `limit` authentication failures.
    ///
    /// By default a failed tag check drops only the offending message;
    /// this opt-in makes repeated failures terminal for the session.
    #[must_use]
    pub const fn fail_closed_after(mut self, limit: u32) -> Self {
        self.fail_closed_after = Some(limit);
        self
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================
// SessionCipher
// ============================================

/// AEAD encryption state for one established session.
///
/// # Purpose
/// Consumes the `SessionKey` a successful handshake produced and
/// provides `encrypt`/`decrypt` with the nonce discipline the key
/// requires. Has no dependency on handshake internals.
///
/// # States
/// `Ready` on construction; `Closed` after [`close`](Self::close) (or
/// the fail-closed policy), at which point every operation fails with
/// `InvalidState` and the key has been zeroized.
///
/// # Example
/// ```
/// use veilwire_core::crypto::SessionKey;
/// use veilwire_core::session::SessionCipher;
///
/// let key = SessionKey::from_bytes([7u8; 32]);
/// let sender = SessionCipher::new(key.clone());
/// let receiver = SessionCipher::new(key);
///
/// let envelope = sender.encrypt(b"hello", b"header").unwrap();
/// let plaintext = receiver.decrypt(&envelope, b"header").unwrap();
/// assert_eq!(plaintext, b"hello");
/// ```
pub struct SessionCipher {
    /// Session key; `None` once closed
    key: RwLock<Option<SessionKey>>,
    /// Strictly increasing counter for outgoing nonces
    send_counter: AtomicU64,
    /// Tracking of remote counters for replay rejection
    replay: Mutex<ReplayWindow>,
    /// Count of AEAD authentication failures observed
    auth_failures: AtomicU32,
    /// Behavior knobs
    policy: SessionPolicy,
    /// Last successful encrypt/decrypt
    last_activity: AtomicInstant,
}

impl SessionCipher {
    /// Creates a session cipher with the default policy.
    ///
    /// # Arguments
    /// * `key` - Session key from an `Established` handshake
    #[must_use]
    pub fn new(key: SessionKey) -> Self {
        Self::with_policy(key, SessionPolicy::default())
    }

    /// Creates a session cipher with an explicit policy.
    #[must_use]
    pub fn with_policy(key: SessionKey, policy: SessionPolicy) -> Self {
        Self {
            key: RwLock::new(Some(key)),
            send_counter: AtomicU64::new(0),
            replay: Mutex::new(ReplayWindow::new()),
            auth_failures: AtomicU32::new(0),
            policy,
            last_activity: AtomicInstant::now(),
        }
    }

    /// Encrypts one message.
    ///
    /// Allocates the next nonce (strictly increasing counter plus a
    /// fresh random suffix) and seals the plaintext under the session
    /// key.
    ///
    /// # Arguments
    /// * `plaintext` - Data to encrypt
    /// * `associated_data` - Authenticated but not encrypted
    ///
    /// # Errors
    /// - `InvalidState` if the session is closed
    /// - `NonceExhausted` if the counter would overflow its 8-byte
    ///   range; the session must be discarded and re-established
    pub fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Envelope> {
        let guard = self.key.read();
        let key = guard
            .as_ref()
            .ok_or_else(|| CoreError::invalid_state("encrypt", "Ready"))?;

        // Single atomic RMW; concurrent senders never share a counter.
        let counter = self
            .send_counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_add(1))
            .map_err(|_| CoreError::NonceExhausted)?;

        let nonce = build_nonce(counter, random_suffix());
        let ciphertext = seal(key, &nonce, plaintext, associated_data)?;

        self.last_activity.touch();

        Ok(Envelope::new(nonce, ciphertext))
    }

    /// Decrypts one message.
    ///
    /// Verifies the tag before any plaintext is released; when replay
    /// protection is on, the envelope's counter is then checked against
    /// the sliding window (recorded only after authentication, so
    /// forged counters cannot poison the window).
    ///
    /// # Arguments
    /// * `envelope` - The received envelope
    /// * `associated_data` - Must match what the sender authenticated
    ///
    /// # Errors
    /// - `InvalidState` if the session is closed
    /// - `AuthenticationFailure` on tag mismatch; never partial
    ///   plaintext. Counts toward the fail-closed threshold if one is
    ///   configured
    /// - `ReplayDetected` for counters the window has already seen or
    ///   can no longer judge
    pub fn decrypt(&self, envelope: &Envelope, associated_data: &[u8]) -> Result<Vec<u8>> {
        let plaintext = {
            let guard = self.key.read();
            let key = guard
                .as_ref()
                .ok_or_else(|| CoreError::invalid_state("decrypt", "Ready"))?;

            match open(key, &envelope.nonce, &envelope.ciphertext, associated_data) {
                Ok(plaintext) => plaintext,
                Err(err) => {
                    drop(guard);
                    self.note_auth_failure();
                    return Err(err);
                }
            }
        };

        if self.policy.replay_protection {
            let counter = envelope.counter();
            let mut window = self.replay.lock();
            match window.check_and_record(counter) {
                CounterCheck::Accept => {}
                CounterCheck::Replay | CounterCheck::Stale => {
                    let highest = window.highest_seen();
                    drop(window);
                    warn!(counter, highest, "replayed envelope rejected");
                    return Err(CoreError::replay(counter, highest));
                }
            }
        }

        self.last_activity.touch();

        Ok(plaintext)
    }

    /// Closes the session, zeroizing the key.
    ///
    /// Idempotent; all subsequent operations fail with `InvalidState`.
    pub fn close(&self) {
        let mut guard = self.key.write();
        if guard.take().is_some() {
            debug!("session closed");
        }
        // Dropping the SessionKey zeroizes it
    }

    /// Returns `true` once the session is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.key.read().is_none()
    }

    /// Returns the number of messages encrypted so far.
    #[must_use]
    pub fn messages_sent(&self) -> u64 {
        self.send_counter.load(Ordering::SeqCst)
    }

    /// Returns the number of authentication failures observed.
    #[must_use]
    pub fn auth_failures(&self) -> u32 {
        self.auth_failures.load(Ordering::Relaxed)
    }

    /// Returns how long the session has been idle.
    #[must_use]
    pub fn idle_for(&self) -> std::time::Duration {
        self.last_activity.elapsed()
    }

    /// Records a tag failure and applies the fail-closed policy.
    fn note_auth_failure(&self) {
        let failures = self.auth_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(limit) = self.policy.fail_closed_after {
            if failures >= limit {
                warn!(failures, limit, "failure threshold reached, closing session");
                self.close();
            }
        }
    }

    /// Positions the outgoing counter, for exhaustion tests.
    #[cfg(test)]
    fn set_send_counter(&self, value: u64) {
        self.send_counter.store(value, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for SessionCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCipher")
            .field("closed", &self.is_closed())
            .field("messages_sent", &self.messages_sent())
            .field("auth_failures", &self.auth_failures())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================
