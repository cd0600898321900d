// ============================================
// File: crates/veilwire-core/tests/secure_channel.rs
// ============================================
//! End-to-end scenarios: two parties establish an authenticated
//! session over simulated untrusted transport and exchange messages,
//! with the attacks the design must survive.

use veilwire_core::protocol::codec::{
    decode_envelope, decode_handshake, encode_envelope, encode_handshake,
};
use veilwire_core::{
    CoreError, HandshakeCoordinator, IdentityKeyPair, Locator, SessionCipher, SessionPolicy,
    StaticKeyResolver,
};

fn locator(s: &str) -> Locator {
    Locator::new(s).unwrap()
}

/// Builds two coordinators whose resolvers trust each other's identity.
fn trusted_parties() -> (
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
fn alice_and_bob_exchange_messages() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    // Handshake messages cross the wire as raw bytes
    let alice_wire = encode_handshake(&alice.begin_handshake().unwrap());
    let bob_wire = encode_handshake(&bob.begin_handshake().unwrap());

    let alice_key = alice
        .complete_handshake(
            &decode_handshake(&bob_wire).unwrap(),
            &locator("bob"),
            &alice_resolver,
        )
        .unwrap();
    let bob_key = bob
        .complete_handshake(
            &decode_handshake(&alice_wire).unwrap(),
            &locator("alice"),
            &bob_resolver,
        )
        .unwrap();

    // Both sides derived identical session keys
    assert_eq!(alice_key, bob_key);

    let alice_session = SessionCipher::new(alice_key);
    let bob_session = SessionCipher::new(bob_key);

    // Alice -> Bob across the wire
    let envelope = alice_session.encrypt(b"test-message-1", b"").unwrap();
    let wire = encode_envelope(&envelope);
    let received = decode_envelope(&wire).unwrap();

    assert_eq!(bob_session.decrypt(&received, b"").unwrap(), b"test-message-1");

    // Bob -> Alice too
    let reply = bob_session.encrypt(b"ack", b"").unwrap();
    assert_eq!(alice_session.decrypt(&reply, b"").unwrap(), b"ack");
}

#[test]
fn flipped_tag_byte_is_rejected() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    let alice_msg = alice.begin_handshake().unwrap();
    let bob_msg = bob.begin_handshake().unwrap();
    let alice_key = alice
        .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
        .unwrap();
    let bob_key = bob
        .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
        .unwrap();

    let alice_session = SessionCipher::new(alice_key);
    let bob_session = SessionCipher::new(bob_key);

    let envelope = alice_session.encrypt(b"test-message-1", b"").unwrap();

    // An attacker flips the final tag byte in transit
    let mut wire = encode_envelope(&envelope).to_vec();
    *wire.last_mut().unwrap() ^= 0x01;
    let tampered = decode_envelope(&wire).unwrap();

    let result = bob_session.decrypt(&tampered, b"");
    assert!(matches!(result, Err(CoreError::AuthenticationFailure)));

    // The original message still decrypts; only the forgery was dropped
    assert_eq!(
        bob_session.decrypt(&envelope, b"").unwrap(),
        b"test-message-1"
    );
}

#[test]
fn mallory_claiming_alice_is_rejected_by_resolver() {
    let alice_identity = IdentityKeyPair::generate();
    let bob_identity = IdentityKeyPair::generate();
    let mallory_identity = IdentityKeyPair::generate();

    let bob_resolver =
        StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());

    let mut bob = HandshakeCoordinator::new(bob_identity);
    let _ = bob.begin_handshake().unwrap();

    // Mallory's message is internally consistent: her signature over
    // her own ephemeral key verifies under her own identity key. Only
    // the resolver check can catch her.
    let mut mallory = HandshakeCoordinator::new(mallory_identity);
    let mallory_msg = mallory.begin_handshake().unwrap();

    let result = bob.complete_handshake(&mallory_msg, &locator("alice"), &bob_resolver);

    assert!(matches!(result, Err(CoreError::ResolverMismatch { .. })));
    assert!(!bob.is_established());
}

#[test]
fn stolen_identity_key_bytes_fail_signature_check() {
    // Mallory embeds Alice's real identity key (which the resolver does
    // trust) but cannot produce Alice's signature over her ephemeral key.
    let alice_identity = IdentityKeyPair::generate();
    let bob_identity = IdentityKeyPair::generate();
    let mallory_identity = IdentityKeyPair::generate();

    let bob_resolver =
        StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());

    let mut bob = HandshakeCoordinator::new(bob_identity);
    let _ = bob.begin_handshake().unwrap();

    let mut mallory = HandshakeCoordinator::new(mallory_identity);
    let mut forged = mallory.begin_handshake().unwrap();
    forged.identity_public = alice_identity.public_key_bytes();

    let result = bob.complete_handshake(&forged, &locator("alice"), &bob_resolver);

    assert!(matches!(result, Err(CoreError::SignatureInvalid)));
    assert!(!bob.is_established());
}

#[test]
fn handshake_wire_format_is_fixed_128_bytes() {
    let (mut alice, _, _, _) = trusted_parties();
    let wire = encode_handshake(&alice.begin_handshake().unwrap());

    assert_eq!(wire.len(), 128);

    // Truncation is caught before any field parsing
    assert!(matches!(
        decode_handshake(&wire[..100]),
        Err(CoreError::MessageTooShort { .. })
    ));
}

#[test]
fn sessions_with_aad_bind_their_context() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    let alice_msg = alice.begin_handshake().unwrap();
    let bob_msg = bob.begin_handshake().unwrap();
    let alice_key = alice
        .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
        .unwrap();
    let bob_key = bob
        .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
        .unwrap();

    let alice_session = SessionCipher::new(alice_key);
    let bob_session = SessionCipher::new(bob_key);

    for (message, aad) in [
        (&b""[..], &b""[..]),
        (b"x", b"channel-1"),
        (&[0xA5; 4096][..], b"channel-2"),
    ] {
        let envelope = alice_session.encrypt(message, aad).unwrap();
        assert_eq!(bob_session.decrypt(&envelope, aad).unwrap(), message);
    }

    // Same ciphertext, different context: rejected
    let envelope = alice_session.encrypt(b"bound", b"channel-1").unwrap();
    assert!(matches!(
        bob_session.decrypt(&envelope, b"channel-9"),
        Err(CoreError::AuthenticationFailure)
    ));
}

#[test]
fn replayed_envelope_is_dropped() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    let alice_msg = alice.begin_handshake().unwrap();
    let bob_msg = bob.begin_handshake().unwrap();
    let alice_key = alice
        .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
        .unwrap();
    let bob_key = bob
        .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
        .unwrap();

    let alice_session = SessionCipher::new(alice_key);
    let bob_session = SessionCipher::new(bob_key);

    let envelope = alice_session.encrypt(b"pay 100", b"").unwrap();
    assert!(bob_session.decrypt(&envelope, b"").is_ok());

    // The attacker re-sends the captured envelope verbatim
    let replayed = decode_envelope(&encode_envelope(&envelope)).unwrap();
    assert!(matches!(
        bob_session.decrypt(&replayed, b""),
        Err(CoreError::ReplayDetected { .. })
    ));
}

#[test]
fn fresh_handshakes_derive_fresh_keys() {
    // Two complete handshakes between the same identities must never
    // share a session key (forward secrecy via ephemeral material).
    let alice_identity = IdentityKeyPair::generate();
    let bob_identity = IdentityKeyPair::generate();

    let alice_resolver =
        StaticKeyResolver::new().with_key(locator("bob"), bob_identity.public_key_bytes());
    let bob_resolver =
        StaticKeyResolver::new().with_key(locator("alice"), alice_identity.public_key_bytes());

    let mut keys = Vec::new();
    for _ in 0..2 {
        let mut alice = HandshakeCoordinator::new(
            IdentityKeyPair::from_bytes(&alice_identity.to_bytes()).unwrap(),
        );
        let mut bob = HandshakeCoordinator::new(
            IdentityKeyPair::from_bytes(&bob_identity.to_bytes()).unwrap(),
        );

        let alice_msg = alice.begin_handshake().unwrap();
        let bob_msg = bob.begin_handshake().unwrap();

        let alice_key = alice
            .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
            .unwrap();
        let bob_key = bob
            .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
            .unwrap();
        assert_eq!(alice_key, bob_key);

        keys.push(alice_key);
    }

    assert_ne!(keys[0], keys[1]);
}

#[test]
fn closed_session_refuses_all_traffic() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    let alice_msg = alice.begin_handshake().unwrap();
    let bob_msg = bob.begin_handshake().unwrap();
    let alice_key = alice
        .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
        .unwrap();
    let bob_key = bob
        .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
        .unwrap();

    let alice_session = SessionCipher::new(alice_key);
    let bob_session = SessionCipher::new(bob_key);

    let envelope = alice_session.encrypt(b"before close", b"").unwrap();

    bob_session.close();
    assert!(matches!(
        bob_session.decrypt(&envelope, b""),
        Err(CoreError::InvalidState { .. })
    ));

    alice_session.close();
    assert!(matches!(
        alice_session.encrypt(b"after close", b""),
        Err(CoreError::InvalidState { .. })
    ));
}

#[test]
fn fail_closed_session_shuts_down_under_forgery_flood() {
    let (mut alice, mut bob, alice_resolver, bob_resolver) = trusted_parties();

    let alice_msg = alice.begin_handshake().unwrap();
    let bob_msg = bob.begin_handshake().unwrap();
    let alice_key = alice
        .complete_handshake(&bob_msg, &locator("bob"), &alice_resolver)
        .unwrap();
    let bob_key = bob
        .complete_handshake(&alice_msg, &locator("alice"), &bob_resolver)
        .unwrap();

    let alice_session = SessionCipher::new(alice_key);
    let bob_session =
        SessionCipher::with_policy(bob_key, SessionPolicy::new().fail_closed_after(5));

    for _ in 0..5 {
        let mut forged = alice_session.encrypt(b"m", b"").unwrap();
        forged.ciphertext[0] ^= 0xFF;
        assert!(bob_session.decrypt(&forged, b"").is_err());
    }

    assert!(bob_session.is_closed());
}
