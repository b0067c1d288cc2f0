//! Claim engine behavior against a mock gateway: every precondition of
//! claim creation and validation rejects independently, and the
//! sender-to-receiver round trip succeeds.

mod common;

use alloy::primitives::{Bytes, U256};
use common::{open_channel, receiver, sender, settling_channel, stranger, MockGateway};
use unichannel::{ChannelEngine, ChannelError, ChannelId, Claim, ErrorKind};

fn engine_with_channel(channel_id: ChannelId, value: u64) -> ChannelEngine<MockGateway> {
    ChannelEngine::new(MockGateway::new().with_channel(channel_id, open_channel(value)))
}

fn claim(channel_id: ChannelId, value: &str) -> Claim {
    Claim {
        channel_id,
        value: value.to_string(),
        signature: Bytes::from(vec![0xab; 65]),
    }
}

// ============================================================================
// create_claim
// ============================================================================

#[tokio::test]
async fn create_claim_returns_signed_claim() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let claim = engine
        .create_claim(id, U256::from(40), sender())
        .await
        .unwrap();

    assert_eq!(claim.channel_id, id);
    assert_eq!(claim.value, "40");
    assert!(!claim.signature.is_empty());
}

#[tokio::test]
async fn create_claim_rejects_zero_value() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let err = engine
        .create_claim(id, U256::ZERO, sender())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert!(matches!(err.root_cause(), ChannelError::NonPositiveValue));
}

#[tokio::test]
async fn create_claim_rejects_missing_channel() {
    let engine = ChannelEngine::new(MockGateway::new());

    let err = engine
        .create_claim(ChannelId::random(), U256::from(1), sender())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn create_claim_rejects_non_sender() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    for account in [receiver(), stranger()] {
        let err = engine
            .create_claim(id, U256::from(40), account)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(err.root_cause(), ChannelError::NotSender(a) if *a == account));
    }
}

#[tokio::test]
async fn create_claim_rejects_settling_channel() {
    let id = ChannelId::random();
    let engine =
        ChannelEngine::new(MockGateway::new().with_channel(id, settling_channel(100, 50_000)));

    let err = engine
        .create_claim(id, U256::from(40), sender())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(matches!(err.root_cause(), ChannelError::ChannelNotOpen));
}

#[tokio::test]
async fn create_claim_rejects_value_above_channel_value() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let err = engine
        .create_claim(id, U256::from(101), sender())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert!(matches!(
        err.root_cause(),
        ChannelError::InsufficientChannelValue
    ));
}

#[tokio::test]
async fn create_claim_accepts_full_channel_value() {
    // Inclusive bound: spending exactly the channel value is allowed
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let claim = engine
        .create_claim(id, U256::from(100), sender())
        .await
        .unwrap();
    assert_eq!(claim.value, "100");
}

#[tokio::test]
async fn create_claim_requires_a_registered_signer() {
    let id = ChannelId::random();
    // Channel whose sender has no key registered in the gateway
    let raw = unichannel::RawChannel {
        sender: stranger(),
        ..open_channel(100)
    };
    let engine = ChannelEngine::new(MockGateway::new().with_channel(id, raw));

    let err = engine
        .create_claim(id, U256::from(40), stranger())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(matches!(err.root_cause(), ChannelError::NoSigner(_)));
}

// ============================================================================
// validate_claim
// ============================================================================

#[tokio::test]
async fn validate_accepts_a_good_claim() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    engine
        .validate_claim(&claim(id, "40"), receiver())
        .await
        .unwrap();
}

#[tokio::test]
async fn validate_rejects_missing_channel() {
    let engine = ChannelEngine::new(MockGateway::new());

    let err = engine
        .validate_claim(&claim(ChannelId::random(), "40"), receiver())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn validate_rejects_non_receiver() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    for account in [sender(), stranger()] {
        let err = engine
            .validate_claim(&claim(id, "40"), account)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(err.root_cause(), ChannelError::NotReceiver(a) if *a == account));
    }
}

#[tokio::test]
async fn validate_rejects_unauthorized_signature() {
    let id = ChannelId::random();
    let engine = ChannelEngine::new(
        MockGateway::new()
            .with_channel(id, open_channel(100))
            .with_can_claim(false),
    );

    let err = engine
        .validate_claim(&claim(id, "40"), receiver())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert!(matches!(err.root_cause(), ChannelError::BadSignature));
}

#[tokio::test]
async fn validate_rejects_oversized_claim() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let err = engine
        .validate_claim(&claim(id, "101"), receiver())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert!(matches!(
        err.root_cause(),
        ChannelError::ClaimExceedsChannelValue
    ));
}

#[tokio::test]
async fn validate_rejects_zero_claim() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let err = engine
        .validate_claim(&claim(id, "0"), receiver())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert!(matches!(err.root_cause(), ChannelError::NonPositiveClaim));
}

#[tokio::test]
async fn validate_rejects_unparseable_claim_value() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    let err = engine
        .validate_claim(&claim(id, "forty"), receiver())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
}

// ============================================================================
// Scenario: sender signs, receiver validates
// ============================================================================

#[tokio::test]
async fn claim_round_trip_between_sender_and_receiver() {
    let id = ChannelId::random();
    let engine = engine_with_channel(id, 100);

    // Sender A creates the claim
    let claim = engine
        .create_claim(id, U256::from(40), sender())
        .await
        .unwrap();
    assert_eq!(claim.value, "40");

    // Receiver B validates it against a gateway that confirms the signature
    engine.validate_claim(&claim, receiver()).await.unwrap();

    // Any account other than B is rejected as unauthorized
    let err = engine
        .validate_claim(&claim, stranger())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}
