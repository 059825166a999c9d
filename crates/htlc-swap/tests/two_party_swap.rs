//! # Two-Environment Atomic Swap
//!
//! Two independent services stand in for two hosts. Alice locks on host A
//! for Bob, Bob mirrors with the same hashlock on host B for Alice, and the
//! secret Alice reveals on B is what lets Bob claim on A.

use htlc_swap::{
    calculate_timelocks, create_hash_lock, generate_random_secret, validate_swap_timelocks,
    HtlcApi, HtlcConfig, HtlcError, HtlcService, Identity, InMemorySwapStore, InitiateRequest,
    ManualClock, RecordingTransferExecutor, SwapStatus, MIN_TIMELOCK_MARGIN_SECS,
};

const T: u64 = 1_700_000_000;
const RESPONDER_WINDOW: u64 = 12 * 3600;

type Host = HtlcService<InMemorySwapStore, ManualClock, RecordingTransferExecutor>;

fn host() -> Host {
    HtlcService::new(
        InMemorySwapStore::new(),
        ManualClock::new(T),
        RecordingTransferExecutor::new(),
        HtlcConfig::default(),
    )
    .unwrap()
}

fn alice() -> Identity {
    Identity::new("alice")
}

fn bob() -> Identity {
    Identity::new("bob")
}

#[tokio::test]
async fn test_secret_relay_completes_both_legs() {
    let host_a = host();
    let host_b = host();

    let secret = generate_random_secret();
    let lock = create_hash_lock(&secret);
    let (initiator_exp, responder_exp) =
        calculate_timelocks(T, RESPONDER_WINDOW, MIN_TIMELOCK_MARGIN_SECS);
    validate_swap_timelocks(initiator_exp, responder_exp, MIN_TIMELOCK_MARGIN_SECS).unwrap();

    // Alice locks 5 BTC-units for Bob on A.
    host_a
        .initiate(
            InitiateRequest {
                hash_lock: lock.to_hex(),
                recipient: Some(bob()),
                expiration: initiator_exp,
                amount: 5_000_000,
            },
            alice(),
        )
        .await
        .unwrap();

    // Bob checks A, then mirrors on B with the shorter timelock.
    let leg_a = host_a.query(&lock.to_hex()).unwrap();
    assert_eq!(leg_a.status, SwapStatus::Open);
    assert_eq!(leg_a.recipient, Some(bob()));
    host_b
        .initiate(
            InitiateRequest {
                hash_lock: lock.to_hex(),
                recipient: Some(alice()),
                expiration: responder_exp,
                amount: 80_000_000,
            },
            bob(),
        )
        .await
        .unwrap();

    // Alice claims on B, revealing the secret there.
    host_b.clock().advance(3600);
    host_b
        .claim(&lock.to_hex(), secret.as_bytes(), alice())
        .await
        .unwrap();

    // Bob reads the secret from B and claims on A.
    let revealed = host_b
        .query(&lock.to_hex())
        .unwrap()
        .revealed_secret
        .unwrap();
    let revealed = hex::decode(revealed).unwrap();

    host_a.clock().advance(3600 + 60);
    let ix = host_a
        .claim(&lock.to_hex(), &revealed, bob())
        .await
        .unwrap();
    assert_eq!(ix.to, bob());
    assert_eq!(ix.amount, 5_000_000);

    assert_eq!(host_a.executor().executed().len(), 1);
    assert_eq!(host_b.executor().executed().len(), 1);
}

#[tokio::test]
async fn test_margin_lets_responder_claim_after_late_reveal() {
    let host_a = host();
    let host_b = host();

    let secret = generate_random_secret();
    let lock = create_hash_lock(&secret);
    let (initiator_exp, responder_exp) =
        calculate_timelocks(T, RESPONDER_WINDOW, MIN_TIMELOCK_MARGIN_SECS);

    host_a
        .initiate(
            InitiateRequest {
                hash_lock: lock.to_hex(),
                recipient: Some(bob()),
                expiration: initiator_exp,
                amount: 10_000,
            },
            alice(),
        )
        .await
        .unwrap();
    host_b
        .initiate(
            InitiateRequest {
                hash_lock: lock.to_hex(),
                recipient: Some(alice()),
                expiration: responder_exp,
                amount: 10_000,
            },
            bob(),
        )
        .await
        .unwrap();

    // Alice waits until the last second of B's window.
    host_b.clock().set_time(responder_exp - 1);
    host_b
        .claim(&lock.to_hex(), secret.as_bytes(), alice())
        .await
        .unwrap();

    // A full margin later, A's leg is still open for Bob and Alice cannot refund.
    host_a
        .clock()
        .set_time(responder_exp + MIN_TIMELOCK_MARGIN_SECS);
    let err = host_a.refund(&lock.to_hex(), alice()).await.unwrap_err();
    assert!(matches!(err, HtlcError::NotYetExpired { .. }));
    host_a
        .claim(&lock.to_hex(), secret.as_bytes(), bob())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_abandoned_swap_refunds_both_sides() {
    let host_a = host();
    let host_b = host();

    let lock = create_hash_lock(&generate_random_secret());
    let (initiator_exp, responder_exp) =
        calculate_timelocks(T, RESPONDER_WINDOW, MIN_TIMELOCK_MARGIN_SECS);

    for (svc, sender, recipient, expiration) in [
        (&host_a, alice(), bob(), initiator_exp),
        (&host_b, bob(), alice(), responder_exp),
    ] {
        svc.initiate(
            InitiateRequest {
                hash_lock: lock.to_hex(),
                recipient: Some(recipient),
                expiration,
                amount: 10_000,
            },
            sender,
        )
        .await
        .unwrap();
    }

    host_b.clock().set_time(responder_exp);
    host_b.refund(&lock.to_hex(), bob()).await.unwrap();

    host_a.clock().set_time(initiator_exp);
    host_a.refund(&lock.to_hex(), alice()).await.unwrap();

    assert_eq!(
        host_a.query(&lock.to_hex()).unwrap().status,
        SwapStatus::Refunded
    );
    assert_eq!(
        host_b.query(&lock.to_hex()).unwrap().status,
        SwapStatus::Refunded
    );
}

#[test]
fn test_insufficient_margin_rejected() {
    let responder_exp = T + RESPONDER_WINDOW;
    let err = validate_swap_timelocks(
        responder_exp + MIN_TIMELOCK_MARGIN_SECS,
        responder_exp,
        MIN_TIMELOCK_MARGIN_SECS,
    )
    .unwrap_err();
    assert_eq!(err.code(), "InvalidTimelockMargin");
}
