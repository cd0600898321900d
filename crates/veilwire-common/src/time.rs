// ============================================
// File: crates/veilwire-common/src/time.rs
// ============================================
//! # Time Utilities
//!
//! ## Creation Reason
//! Provides atomic time tracking so sessions can record last activity
//! without taking locks on the hot path.
//!
//! ## Main Functionality
//! - `AtomicInstant`: Thread-safe wrapper around `Instant`
//!
//! ## Main Logical Flow
//! 1. A session stores an `AtomicInstant` at creation
//! 2. Encrypt/decrypt handlers touch it atomically without locks
//! 3. Callers read `elapsed` to implement idle timeouts
//!
//! ## ⚠️ Important Note for Next Developer
//! - `AtomicInstant` uses `AtomicU64` internally (nanoseconds since start)
//! - Be aware of potential overflow after ~584 years of uptime
//!
//! ## Last Modified
//! v0.1.0 - Initial time utilities

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ============================================
// AtomicInstant
// ============================================

/// Thread-safe wrapper around [`Instant`] for concurrent access.
///
/// # Purpose
/// Allows multiple threads to read/write timestamps without locks,
/// used for session last-activity tracking.
///
/// # Implementation
/// Stores nanoseconds elapsed since a reference instant (program start).
/// Uses `AtomicU64` with relaxed ordering for performance.
///
/// # Example
/// ```
/// use veilwire_common::time::AtomicInstant;
/// use std::time::Instant;
///
/// let atomic = AtomicInstant::now();
/// let instant = atomic.load();
///
/// // Update from another thread
/// atomic.store(Instant::now());
/// ```
#[derive(Debug)]
pub struct AtomicInstant {
    /// Nanoseconds since the reference instant
    nanos: AtomicU64,
}

impl AtomicInstant {
    /// Reference instant (lazily initialized at program start).
    fn reference() -> Instant {
        use std::sync::OnceLock;
        static REFERENCE: OnceLock<Instant> = OnceLock::new();
        *REFERENCE.get_or_init(Instant::now)
    }

    /// Creates a new `AtomicInstant` set to the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_instant(Instant::now())
    }

    /// Creates a new `AtomicInstant` from an `Instant`.
    #[must_use]
    pub fn from_instant(instant: Instant) -> Self {
        let reference = Self::reference();
        let nanos = instant
            .checked_duration_since(reference)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            nanos: AtomicU64::new(nanos),
        }
    }

    /// Loads the stored instant.
    ///
    /// Uses `Relaxed` ordering for best performance.
    #[must_use]
    pub fn load(&self) -> Instant {
        let nanos = self.nanos.load(Ordering::Relaxed);
        Self::reference() + Duration::from_nanos(nanos)
    }

    /// Stores a new instant.
    ///
    /// Uses `Relaxed` ordering for best performance.
    pub fn store(&self, instant: Instant) {
        let reference = Self::reference();
        let nanos = instant
            .checked_duration_since(reference)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        self.nanos.store(nanos, Ordering::Relaxed);
    }

    /// Updates to the current time and returns the previous value.
    pub fn touch(&self) -> Instant {
        let old = self.load();
        self.store(Instant::now());
        old
    }

    /// Returns the elapsed time since the stored instant.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.load().elapsed()
    }

    /// Checks if more than `duration` has elapsed since the stored instant.
    #[must_use]
    pub fn has_elapsed(&self, duration: Duration) -> bool {
        self.elapsed() > duration
    }
}

impl Default for AtomicInstant {
    fn default() -> Self {
        Self::now()
    }
}

impl Clone for AtomicInstant {
    fn clone(&self) -> Self {
        Self {
            nanos: AtomicU64::new(self.nanos.load(Ordering::Relaxed)),
        }
    }
}

// ============================================
// Tests
// ============================================
