// ============================================
// File: crates/veilwire-core/src/handshake/coordinator.rs
// ============================================
//! # Handshake Coordinator
//!
//! ## Creation Reason
//! Drives the handshake state machine: generates and signs the local
//! ephemeral key, validates the peer's message against the resolver
//! and its own signature, and derives the session key only when every
//! check passes.
//!
//! ## State Machine
//! ```text
//! ┌──────┐ begin_handshake ┌──────────────┐
//! │ Idle │ ───────────────►│ OutgoingSent │
//! └──────┘                 └──────┬───────┘
//!                                 │ complete_handshake
//!                  ┌──────────────┼──────────────┐
//!                  ▼                             ▼
//!           ┌─────────────┐               ┌──────────┐
//!           │ Established │               │ Rejected │ (terminal)
//!           └─────────────┘               └──────────┘
//! ```
//!
//! No intermediate "half-open" state exposes a session key, and a
//! rejected coordinator never retries: fresh ephemeral material
//! requires a fresh coordinator.
//!
//! ## Check Ordering
//! 1. Resolver: the claimed locator must bind to exactly the presented
//!    identity key. Not-found and different-key are indistinguishable
//!    failures, and no signature work happens for them.
//! 2. Signature: the identity key must have signed the raw ephemeral
//!    public bytes.
//! 3. Only then: key derivation, transition to `Established`.
//!
//! ## ⚠️ Important Note for Next Developer
//! - `complete_handshake` must stay atomic from the caller's view:
//!   either both checks passed and a key is returned, or no key exists
//! - The retained ephemeral key is consumed or dropped on every path
//!
//! ## Last Modified
//! v0.1.0 - Initial coordinator implementation

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use veilwire_common::types::Locator;

use crate::crypto::{
    derive_session_key, verify_detached, EphemeralKeyPair, IdentityKeyPair, IdentityPublicKey,
    SessionKey, SESSION_CONTEXT,
};
use crate::error::{CoreError, Result};
use crate::handshake::resolver::PeerKeyResolver;
use crate::protocol::messages::HandshakeMessage;

// ============================================
// States
// ============================================

/// Why a handshake was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The resolver does not bind the claimed locator to the presented
    /// identity key.
    ResolverMismatch,
    /// The signature over the ephemeral public key did not verify.
    SignatureInvalid,
    /// Session key derivation failed after both checks passed. Not
    /// reachable with well-formed inputs; kept so the state machine
    /// has no panicking path.
    DerivationFailed,
}

/// Handshake coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// No handshake attempt started.
    Idle,
    /// Our signed ephemeral key has been produced; awaiting the peer.
    OutgoingSent,
    /// Both checks passed and the session key was released.
    Established,
    /// The handshake was rejected (terminal).
    Rejected(RejectReason),
}

// ============================================
// HandshakeCoordinator
// ============================================

/// Drives one handshake attempt for one party.
///
/// # Purpose
/// Owns the party's long-term identity for signing and the pending
/// ephemeral key pair between `begin_handshake` and
/// `complete_handshake`. One attempt is permitted per coordinator;
/// concurrent calls on the same instance are impossible through
/// `&mut self`, and misordered calls fail with `InvalidState`.
///
/// # Cancellation
/// There is none beyond dropping the coordinator before it reaches
/// `Established`; a partially-completed handshake holds no session key
/// and is safe to discard.
///
/// # Example
/// ```
/// use veilwire_core::crypto::IdentityKeyPair;
/// use veilwire_core::handshake::{HandshakeCoordinator, Locator, StaticKeyResolver};
///
/// let alice_identity = IdentityKeyPair::generate();
/// let bob_identity = IdentityKeyPair::generate();
///
/// // Each side trusts the other's long-term key via its resolver
/// let alice_resolver = StaticKeyResolver::new()
///     .with_key(Locator::new("bob").unwrap(), bob_identity.public_key_bytes());
/// let bob_resolver = StaticKeyResolver::new()
///     .with_key(Locator::new("alice").unwrap(), alice_identity.public_key_bytes());
///
/// let mut alice = HandshakeCoordinator::new(alice_identity);
/// let mut bob = HandshakeCoordinator::new(bob_identity);
///
/// let alice_msg = alice.begin_handshake().unwrap();
/// let bob_msg = bob.begin_handshake().unwrap();
///
/// let alice_key = alice
///     .complete_handshake(&bob_msg, &Locator::new("bob").unwrap(), &alice_resolver)
///     .unwrap();
/// let bob_key = bob
///     .complete_handshake(&alice_msg, &Locator::new("alice").unwrap(), &bob_resolver)
///     .unwrap();
///
/// assert_eq!(alice_key, bob_key);
/// ```
pub struct HandshakeCoordinator {
    /// This party's long-term identity key pair
    identity: IdentityKeyPair,
    /// HKDF context label for session key derivation
    context_label: Vec<u8>,
    /// Current state
    state: HandshakeState,
    /// Ephemeral key retained for the pending handshake only
    pending: Option<EphemeralKeyPair>,
}

impl HandshakeCoordinator {
    /// Creates a coordinator for one handshake attempt.
    ///
    /// # Arguments
    /// * `identity` - This party's long-term Ed25519 key pair
    #[must_use]
    pub fn new(identity: IdentityKeyPair) -> Self {
        Self {
            identity,
            context_label: SESSION_CONTEXT.to_vec(),
            state: HandshakeState::Idle,
            pending: None,
        }
    }

    /// Overrides the KDF context label.
    ///
    /// Both parties must use the same label or their derived keys will
    /// not match.
    #[must_use]
    pub fn with_context_label(mut self, label: impl Into<Vec<u8>>) -> Self {
        self.context_label = label.into();
        self
    }

    /// Returns this party's identity public key.
    #[must_use]
    pub fn public_key(&self) -> IdentityPublicKey {
        self.identity.public_key()
    }

    /// Returns the current handshake state.
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Returns `true` once the handshake has established a session key.
    #[must_use]
    pub fn is_established(&self) -> bool {
        self.state == HandshakeState::Established
    }

    /// Starts a handshake: generates a fresh ephemeral key pair, signs
    /// its public bytes with the long-term identity, and returns the
    /// message to transmit.
    ///
    /// The ephemeral key pair is retained internally for the pending
    /// handshake only.
    ///
    /// # Errors
    /// Returns `InvalidState` unless the coordinator is `Idle`.
    pub fn begin_handshake(&mut self) -> Result<HandshakeMessage> {
        if self.state != HandshakeState::Idle {
            return Err(CoreError::invalid_state("begin_handshake", "Idle"));
        }

        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key_bytes();
        let signature = self.identity.sign(&ephemeral_public);

        self.pending = Some(ephemeral);
        self.state = HandshakeState::OutgoingSent;

        debug!(identity = %self.public_key(), "handshake started");

        Ok(HandshakeMessage::new(
            ephemeral_public,
            self.identity.public_key_bytes(),
            signature,
        ))
    }

    /// Completes the handshake against the peer's message.
    ///
    /// # Arguments
    /// * `peer` - The peer's handshake message
    /// * `claimed` - The identity the peer claims ("alice")
    /// * `resolver` - The trust root binding locators to keys
    ///
    /// # Returns
    /// The derived session key, observable only when both the resolver
    /// check and the signature check passed. Verification and
    /// derivation are indivisible from the caller's perspective.
    ///
    /// # Errors
    /// - `InvalidState` unless the coordinator is `OutgoingSent`
    /// - `ResolverMismatch` if the resolver reports no binding for
    ///   `claimed`, or a different key than the message presents
    /// - `SignatureInvalid` if the signature over the ephemeral public
    ///   bytes does not verify
    ///
    /// Rejections are terminal: the retained ephemeral key is dropped
    /// and the coordinator cannot be reused.
    pub fn complete_handshake(
        &mut self,
        peer: &HandshakeMessage,
        claimed: &Locator,
        resolver: &dyn PeerKeyResolver,
    ) -> Result<SessionKey> {
        if self.state != HandshakeState::OutgoingSent {
            return Err(CoreError::invalid_state(
                "complete_handshake",
                "OutgoingSent",
            ));
        }

        // 1. Resolver check. Not-found and found-but-different are the
        //    same failure; no signature work happens for either.
        let authorized = match resolver.resolve(claimed) {
            Some(trusted) => bool::from(trusted.ct_eq(&peer.identity_public)),
            None => false,
        };
        if !authorized {
            self.reject(RejectReason::ResolverMismatch);
            warn!(peer = %claimed, "handshake rejected: claimed identity not authorized");
            return Err(CoreError::resolver_mismatch(claimed.as_str()));
        }

        // 2. Signature over the raw ephemeral public bytes.
        if !verify_detached(&peer.identity_public, &peer.ephemeral_public, &peer.signature) {
            self.reject(RejectReason::SignatureInvalid);
            warn!(peer = %claimed, "handshake rejected: invalid signature");
            return Err(CoreError::SignatureInvalid);
        }

        // 3. Both checks passed: consume the retained ephemeral key and
        //    derive the session key.
        let ephemeral = self.pending.take().ok_or_else(|| {
            CoreError::invalid_state("complete_handshake", "a pending ephemeral key")
        })?;

        match derive_session_key(ephemeral, &peer.ephemeral_public, &self.context_label) {
            Ok(session_key) => {
                self.state = HandshakeState::Established;
                debug!(peer = %claimed, "handshake established");
                Ok(session_key)
            }
            Err(err) => {
                self.reject(RejectReason::DerivationFailed);
                Err(err)
            }
        }
    }

    /// Transitions to a terminal rejected state, dropping the pending
    /// ephemeral key.
    fn reject(&mut self, reason: RejectReason) {
        self.pending = None;
        self.state = HandshakeState::Rejected(reason);
    }
}

impl std::fmt::Debug for HandshakeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeCoordinator")
            .field("identity", &self.public_key())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::resolver::StaticKeyResolver;

    fn locator(s: &str) -> Locator {
        Locator::new(s).unwrap()
    }

    /// Two identities plus resolvers that trust each other.
    fn trusted_pair() -> (
        HandshakeCoordinator,
        HandshakeCoordinator,
        StaticKeyResolver,
        StaticKeyResolver,
    ) {
        let alice_identity = IdentityKeyPair::generate();
        let bob_identity = IdentityKeyPair::generate();

        let alice_resolver =
            StaticKeyResolver::new().with_key(locator("bob"), bob_identity.public_key_bytes());
        let bob_resolver =
            StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());

        (
            HandshakeCoordinator::new(alice_identity),
            HandshakeCoordinator::new(bob_identity),
            alice_resolver,
            bob_resolver,
        )
    }

    #[test]
    fn test_full_handshake_yields_identical_keys() {
        let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_pair();

        let alice_msg = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let alice_key = alice
            .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
            .unwrap();
        let bob_key = bob
            .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
            .unwrap();

        assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
        assert!(alice.is_established());
        assert!(bob.is_established());
    }

    #[test]
    fn test_resolver_not_found_rejects() {
        let (mut alice, mut bob, _, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let empty = StaticKeyResolver::new();
        let result = alice.complete_handshake(&bob_msg, &locator("bob"), &empty);

        assert!(matches!(result, Err(CoreError::ResolverMismatch { .. })));
        assert_eq!(
            alice.state(),
            HandshakeState::Rejected(RejectReason::ResolverMismatch)
        );
    }

    #[test]
    fn test_resolver_different_key_rejects() {
        let (mut alice, mut bob, _, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        // Resolver binds "bob" to somebody else's key
        let wrong =
            StaticKeyResolver::new().with_key(locator("bob"), [0x99; 32]);
        let result = alice.complete_handshake(&bob_msg, &locator("bob"), &wrong);

        assert!(matches!(result, Err(CoreError::ResolverMismatch { .. })));
    }

    #[test]
    fn test_attacker_identity_substitution_rejected() {
        // Mallory presents her own identity key while claiming "alice".
        // Bob's resolver binds "alice" to the real key, so the claim
        // fails authorization and no session key is ever produced.
        let alice_identity = IdentityKeyPair::generate();
        let mallory_identity = IdentityKeyPair::generate();

        let bob_identity = IdentityKeyPair::generate();
        let bob_resolver =
            StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());
        let mut bob = HandshakeCoordinator::new(bob_identity);
        let _ = bob.begin_handshake().unwrap();

        let mut mallory = HandshakeCoordinator::new(mallory_identity);
        let mallory_msg = mallory.begin_handshake().unwrap();

        let result = bob.complete_handshake(&mallory_msg, &locator("alice"), &bob_resolver);

        assert!(matches!(result, Err(CoreError::ResolverMismatch { .. })));
        assert!(!bob.is_established());
    }

    #[test]
    fn test_tampered_ephemeral_rejects_with_signature_invalid() {
        let (mut alice, mut bob, alice_resolver, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let mut bob_msg = bob.begin_handshake().unwrap();

        // Flip a single bit of the signed ephemeral key
        bob_msg.ephemeral_public[0] ^= 0x01;

        let result = alice.complete_handshake(&bob_msg, &locator("bob"), &alice_resolver);

        assert!(matches!(result, Err(CoreError::SignatureInvalid)));
        assert_eq!(
            alice.state(),
            HandshakeState::Rejected(RejectReason::SignatureInvalid)
        );
    }

    #[test]
    fn test_corrupted_signature_rejects() {
        let (mut alice, mut bob, alice_resolver, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let mut bob_msg = bob.begin_handshake().unwrap();
        bob_msg.signature[0] ^= 0xFF;

        let result = alice.complete_handshake(&bob_msg, &locator("bob"), &alice_resolver);
        assert!(matches!(result, Err(CoreError::SignatureInvalid)));
    }

    #[test]
    fn test_resolver_checked_before_signature() {
        // A message with a garbage signature and an unauthorized
        // identity must fail with ResolverMismatch: no signature check
        // is even required to fail safely.
        let (mut alice, _, _, _) = trusted_pair();
        let _ = alice.begin_handshake().unwrap();

        let forged = HandshakeMessage::new([0x01; 32], [0x02; 32], [0x03; 64]);
        let empty = StaticKeyResolver::new();

        let result = alice.complete_handshake(&forged, &locator("bob"), &empty);
        assert!(matches!(result, Err(CoreError::ResolverMismatch { .. })));
    }

    #[test]
    fn test_complete_before_begin_is_state_error() {
        let (mut alice, mut bob, alice_resolver, _) = trusted_pair();
        let bob_msg = bob.begin_handshake().unwrap();

        let result = alice.complete_handshake(&bob_msg, &locator("bob"), &alice_resolver);
        assert!(matches!(result, Err(CoreError::InvalidState { .. })));
    }

    #[test]
    fn test_double_begin_is_state_error() {
        let (mut alice, _, _, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let result = alice.begin_handshake();
        assert!(matches!(result, Err(CoreError::InvalidState { .. })));
    }

    #[test]
    fn test_rejected_coordinator_is_terminal() {
        let (mut alice, mut bob, _, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let empty = StaticKeyResolver::new();
        let _ = alice.complete_handshake(&bob_msg, &locator("bob"), &empty);

        // No recovery: neither beginning nor completing works again
        assert!(matches!(
            alice.begin_handshake(),
            Err(CoreError::InvalidState { .. })
        ));
        assert!(matches!(
            alice.complete_handshake(&bob_msg, &locator("bob"), &empty),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_established_coordinator_rejects_reuse() {
        let (mut alice, mut bob, alice_resolver, _) = trusted_pair();

        let _ = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();
        let _ = alice
            .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
            .unwrap();

        assert!(matches!(
            alice.complete_handshake(&bob_msg, &locator("bob"), &alice_resolver),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_custom_context_label_must_match() {
        let alice_identity = IdentityKeyPair::generate();
        let bob_identity = IdentityKeyPair::generate();

        let alice_resolver =
            StaticKeyResolver::new().with_key(locator("bob"), bob_identity.public_key_bytes());
        let bob_resolver =
            StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());

        let mut alice =
            HandshakeCoordinator::new(alice_identity).with_context_label(&b"app-x/v2"[..]);
        let mut bob = HandshakeCoordinator::new(bob_identity); // default label

        let alice_msg = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let alice_key = alice
            .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
            .unwrap();
        let bob_key = bob
            .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
            .unwrap();

        // Mismatched labels mean mismatched keys
        assert_ne!(alice_key.as_bytes(), bob_key.as_bytes());
    }

    #[test]
    fn test_closure_resolver_accepted() {
        let alice_identity = IdentityKeyPair::generate();
        let bob_identity = IdentityKeyPair::generate();
        let bob_key_bytes = bob_identity.public_key_bytes();

        let mut alice = HandshakeCoordinator::new(alice_identity);
        let mut bob = HandshakeCoordinator::new(bob_identity);

        let _ = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let lookup = crate::handshake::ResolverFn(move |loc: &Locator| {
            (loc.as_str() == "bob").then_some(bob_key_bytes)
        });
        let key = alice.complete_handshake(&bob_msg, &locator("bob"), &lookup);
        assert!(key.is_ok());
    }
}
