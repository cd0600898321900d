// ============================================
// File: crates/veilwire-core/src/session/replay.rs
// ============================================
//! # Sliding Window Replay Detection
//!
//! ## Creation Reason
//! Tracks which nonce counters have been seen from the remote sender so
//! replayed envelopes can be rejected, while tolerating the reordering
//! real transports produce.
//!
//! ## Algorithm
//! ```text
//! Window size: 2048 counters
//!
//!     ◄─────────── WINDOW_SIZE ───────────►
//!     ┌─────────────────────────────────────┐
//!     │  bitmap (2048 bits = 256 bytes)     │
//!     └─────────────────────────────────────┘
//!     ▲                                     ▲
//!     │                                     │
//!  window base                         highest_seen
//!  (oldest valid)                      (newest seen)
//!
//! Accept conditions:
//! 1. counter > highest_seen → Accept, advance window
//! 2. counter >= window base AND not in bitmap → Accept, mark in bitmap
//! 3. counter < window base → Stale (too old to judge)
//! 4. counter in bitmap → Replay
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Record a counter ONLY after its envelope authenticated; forged
//!   counters must not be able to advance the window
//!
//! ## Last Modified
//! v0.1.0 - Initial replay window implementation

// ============================================
// Constants
// ============================================

/// Size of the replay window in counters. Allows reordering of up to
/// 2048 envelopes while still detecting replays.
pub const REPLAY_WINDOW_SIZE: u64 = 2048;

/// Size of the bitmap in u64 words (2048 / 64 = 32).
const BITMAP_WORDS: usize = (REPLAY_WINDOW_SIZE / 64) as usize;

// ============================================
// CounterCheck
// ============================================

/// Result of a replay check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterCheck {
    /// Counter is fresh and has been recorded.
    Accept,
    /// Counter was already seen (replay).
    Replay,
    /// Counter is older than the window can judge.
    Stale,
}

// ============================================
// ReplayWindow
// ============================================

/// Sliding window replay detection over nonce counters.
///
/// Maintains the highest counter seen and a bitmap covering the
/// `REPLAY_WINDOW_SIZE` most recent counters, so out-of-order delivery
/// within the window is accepted exactly once.
pub struct ReplayWindow {
    /// Highest counter value seen so far.
    highest_seen: u64,
    /// Bitmap tracking seen counters within the window.
    /// Bit at position (counter % WINDOW_SIZE) indicates if counter was seen.
    bitmap: [u64; BITMAP_WORDS],
}

impl ReplayWindow {
    /// Creates a new replay window with no counters recorded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            highest_seen: 0,
            bitmap: [0u64; BITMAP_WORDS],
        }
    }

    /// Checks a counter and records it if fresh.
    ///
    /// # Arguments
    /// * `counter` - The authenticated envelope's nonce counter
    ///
    /// # Returns
    /// - `Accept` if the counter has not been seen (window advances as
    ///   needed)
    /// - `Replay` if the counter was already recorded
    /// - `Stale` if the counter is before the window
    pub fn check_and_record(&mut self, counter: u64) -> CounterCheck {
        // Counter ahead of everything seen: advance the window
        if counter > self.highest_seen {
            let advance = counter - self.highest_seen;

            if advance >= REPLAY_WINDOW_SIZE {
                // Way ahead - the whole bitmap falls out of the window
                self.bitmap = [0u64; BITMAP_WORDS];
            } else {
                // Clear the slots that just rotated out of the window
                for i in 1..=advance {
                    self.clear_bit(self.highest_seen + i);
                }
            }

            self.highest_seen = counter;
            self.set_bit(counter);
            return CounterCheck::Accept;
        }

        if counter < self.window_base() {
            return CounterCheck::Stale;
        }

        if self.get_bit(counter) {
            return CounterCheck::Replay;
        }

        self.set_bit(counter);
        CounterCheck::Accept
    }

    /// Returns the highest counter seen so far.
    #[must_use]
    pub fn highest_seen(&self) -> u64 {
        self.highest_seen
    }

    /// Returns the oldest counter the window can still judge.
    #[must_use]
    pub fn window_base(&self) -> u64 {
        if self.highest_seen >= REPLAY_WINDOW_SIZE - 1 {
            self.highest_seen - REPLAY_WINDOW_SIZE + 1
        } else {
            0
        }
    }

    #[inline]
    fn get_bit(&self, counter: u64) -> bool {
        let bit_index = (counter % REPLAY_WINDOW_SIZE) as usize;
        (self.bitmap[bit_index / 64] & (1u64 << (bit_index % 64))) != 0
    }

    #[inline]
    fn set_bit(&mut self, counter: u64) {
        let bit_index = (counter % REPLAY_WINDOW_SIZE) as usize;
        self.bitmap[bit_index / 64] |= 1u64 << (bit_index % 64);
    }

    #[inline]
    fn clear_bit(&mut self, counter: u64) {
        let bit_index = (counter % REPLAY_WINDOW_SIZE) as usize;
        self.bitmap[bit_index / 64] &= !(1u64 << (bit_index % 64));
    }
}

impl Default for ReplayWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReplayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayWindow")
            .field("highest_seen", &self.highest_seen)
            .field("window_base", &self.window_base())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================
