//! # Brutal Security Tests for the Swap Core
//!
//! These tests attempt to break the swap invariants.
//!
//! ## Test Categories
//!
//! 1. **Replay Attacks** - Duplicate locks, double claims, claim after refund
//! 2. **Secret Attacks** - Wrong length, wrong preimage, leaking through reads
//! 3. **Atomicity** - Rejected calls never mutate, concurrent claim/refund races
//! 4. **Persistence** - File store survives restarts without loosening guards

use htlc_swap::{
    create_hash_lock, HtlcConfig, HtlcError, Identity, InMemorySwapStore, InitiateRequest,
    JsonFileSwapStore, ListQuery, SecureSecret, SwapId, SwapStateMachine, SwapStatus, SwapStore,
};
use std::sync::Arc;
use std::thread;

// =============================================================================
// TEST HELPERS
// =============================================================================

const T: u64 = 1_700_000_000;
const EXPIRATION: u64 = T + 3600;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_machine() -> SwapStateMachine<InMemorySwapStore> {
    init_logging();
    SwapStateMachine::new(InMemorySwapStore::new(), HtlcConfig::default()).unwrap()
}

fn secret(byte: u8) -> SecureSecret {
    SecureSecret::new([byte; 32])
}

fn request(lock: &SwapId) -> InitiateRequest {
    InitiateRequest {
        hash_lock: lock.to_hex(),
        recipient: Some(Identity::new("bob")),
        expiration: EXPIRATION,
        amount: 50_000,
    }
}

fn open<S: SwapStore>(m: &SwapStateMachine<S>, s: &SecureSecret) -> SwapId {
    let lock = create_hash_lock(s);
    m.initiate(&request(&lock), Identity::new("alice"), T)
        .unwrap()
}

fn snapshot<S: SwapStore>(m: &SwapStateMachine<S>) -> Vec<htlc_swap::SwapView> {
    m.list(ListQuery::new().with_limit(100)).unwrap().items
}

// =============================================================================
// 1. REPLAY ATTACKS
// =============================================================================

#[test]
fn brutal_reused_hash_lock_always_rejected() {
    let m = make_machine();
    let s = secret(1);
    let lock = open(&m, &s);

    // Still open.
    assert!(matches!(
        m.initiate(&request(&lock), Identity::new("mallory"), T + 1),
        Err(HtlcError::AlreadyExists(id)) if id == lock
    ));

    // Resolved.
    m.claim(&lock.to_hex(), s.as_bytes(), Identity::new("bob"), T + 5)
        .unwrap();
    assert!(matches!(
        m.initiate(&request(&lock), Identity::new("alice"), T + 6),
        Err(HtlcError::AlreadyExists(_))
    ));

    // Uppercase hex is the same commitment.
    let mut upper = request(&lock);
    upper.hash_lock = upper.hash_lock.to_uppercase();
    assert!(matches!(
        m.initiate(&upper, Identity::new("alice"), T + 7),
        Err(HtlcError::AlreadyExists(_))
    ));
    assert_eq!(m.store().len().unwrap(), 1);
}

#[test]
fn brutal_double_claim_and_claim_after_refund() {
    let m = make_machine();
    let s1 = secret(1);
    let claimed = open(&m, &s1);
    m.claim(&claimed.to_hex(), s1.as_bytes(), Identity::new("bob"), T + 5)
        .unwrap();

    let s2 = secret(2);
    let refunded = open(&m, &s2);
    m.refund(&refunded.to_hex(), Identity::new("alice"), EXPIRATION)
        .unwrap();

    for lock in [claimed, refunded] {
        let s = if lock == claimed { &s1 } else { &s2 };
        let claim = m.claim(&lock.to_hex(), s.as_bytes(), Identity::new("bob"), T + 6);
        assert_eq!(claim.unwrap_err().code(), "NotOpen");

        // Terminal guard wins over every later check, even expiration.
        let refund = m.refund(&lock.to_hex(), Identity::new("alice"), EXPIRATION + 10);
        assert_eq!(refund.unwrap_err().code(), "NotOpen");
    }
}

// =============================================================================
// 2. SECRET ATTACKS
// =============================================================================

#[test]
fn brutal_secret_length_variants() {
    let m = make_machine();
    let s = secret(3);
    let lock = open(&m, &s);

    let mut padded = s.as_bytes().to_vec();
    padded.push(0);
    for candidate in [&[][..], &s.as_bytes()[..31], &padded[..]] {
        let err = m
            .claim(&lock.to_hex(), candidate, Identity::new("bob"), T + 1)
            .unwrap_err();
        assert!(matches!(err, HtlcError::InvalidSecretLength { expected: 32, .. }));
    }

    let err = m
        .claim(&lock.to_hex(), secret(4).as_bytes(), Identity::new("bob"), T + 1)
        .unwrap_err();
    assert!(matches!(err, HtlcError::SecretMismatch));
}

#[test]
fn brutal_lock_itself_is_not_the_secret() {
    let m = make_machine();
    let lock = open(&m, &secret(5));
    let err = m
        .claim(&lock.to_hex(), lock.as_bytes(), Identity::new("bob"), T + 1)
        .unwrap_err();
    assert!(matches!(err, HtlcError::SecretMismatch));
}

#[test]
fn brutal_secret_never_leaks_while_open() {
    let m = make_machine();
    let s = secret(6);
    let lock = open(&m, &s);

    // Wrong claimer with the right secret must not publish it.
    let _ = m.claim(&lock.to_hex(), s.as_bytes(), Identity::new("eve"), T + 1);

    let view = m.query(&lock.to_hex()).unwrap();
    assert!(view.revealed_secret.is_none());
    assert!(snapshot(&m).iter().all(|v| v.revealed_secret.is_none()));

    let json = serde_json::to_string(&view).unwrap();
    assert!(!json.contains(&s.to_hex()));
    assert!(!format!("{s:?}").contains(&s.to_hex()));
}

// =============================================================================
// 3. ATOMICITY
// =============================================================================

#[test]
fn brutal_rejections_do_not_mutate() {
    let m = make_machine();
    let s = secret(7);
    let lock = open(&m, &s);
    let before = snapshot(&m);

    let bad_requests = [
        InitiateRequest {
            hash_lock: "zz".repeat(32),
            ..request(&lock)
        },
        InitiateRequest {
            amount: 0,
            ..request(&create_hash_lock(&secret(8)))
        },
        InitiateRequest {
            expiration: T,
            ..request(&create_hash_lock(&secret(8)))
        },
        request(&lock),
    ];
    for r in &bad_requests {
        assert!(m.initiate(r, Identity::new("alice"), T).is_err());
    }

    let hex = lock.to_hex();
    assert!(m.claim(&hex, s.as_bytes(), Identity::new("bob"), EXPIRATION).is_err());
    assert!(m.claim(&hex, secret(9).as_bytes(), Identity::new("bob"), T + 1).is_err());
    assert!(m.claim(&hex, s.as_bytes(), Identity::new("eve"), T + 1).is_err());
    assert!(m.refund(&hex, Identity::new("alice"), EXPIRATION - 1).is_err());
    assert!(m.refund(&hex, Identity::new("bob"), EXPIRATION).is_err());

    assert_eq!(snapshot(&m), before);
}

#[test]
fn brutal_concurrent_claim_and_refund_resolve_once() {
    // At the boundary second only refund is legal; race many of each.
    let m = Arc::new(make_machine());
    let s = secret(10);
    let lock = open(&m, &s);

    let mut handles = Vec::new();
    for i in 0..16 {
        let m = Arc::clone(&m);
        let s = s.clone();
        handles.push(thread::spawn(move || {
            if i % 2 == 0 {
                m.claim(&lock.to_hex(), s.as_bytes(), Identity::new("bob"), EXPIRATION - 1)
                    .is_ok()
            } else {
                m.refund(&lock.to_hex(), Identity::new("alice"), EXPIRATION)
                    .is_ok()
            }
        }));
    }

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    assert!(m.query(&lock.to_hex()).unwrap().status.is_terminal());
}

#[test]
fn brutal_concurrent_initiate_same_lock() {
    let m = Arc::new(make_machine());
    let lock = create_hash_lock(&secret(11));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                m.initiate(&request(&lock), Identity::new(format!("sender-{i}")), T)
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(m.store().len().unwrap(), 1);
}

#[test]
fn brutal_list_scan_is_bounded() {
    let config = HtlcConfig::default()
        .with_max_list_limit(5)
        .with_max_list_scan(10);
    let m = SwapStateMachine::new(InMemorySwapStore::new(), config).unwrap();
    for b in 0..25u8 {
        open(&m, &secret(b));
    }

    // No swap is claimed: each call examines at most 10 entries.
    let page = m
        .list(ListQuery::new().with_status(SwapStatus::Claimed).with_limit(1_000))
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor, Some(10));

    let page = m
        .list(
            ListQuery::new()
                .with_status(SwapStatus::Claimed)
                .with_cursor(20),
        )
        .unwrap();
    assert_eq!(page.next_cursor, None);

    let page = m.list(ListQuery::new().with_limit(1_000)).unwrap();
    assert_eq!(page.items.len(), 5);
}

// =============================================================================
// 4. PERSISTENCE
// =============================================================================

#[test]
fn brutal_file_store_keeps_guards_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swaps.json");
    let s = secret(12);

    let lock = {
        let m = SwapStateMachine::new(
            JsonFileSwapStore::open(&path).unwrap(),
            HtlcConfig::default(),
        )
        .unwrap();
        let lock = open(&m, &s);
        m.claim(&lock.to_hex(), s.as_bytes(), Identity::new("bob"), T + 1)
            .unwrap();
        lock
    };

    let m = SwapStateMachine::new(
        JsonFileSwapStore::open(&path).unwrap(),
        HtlcConfig::default(),
    )
    .unwrap();
    let view = m.query(&lock.to_hex()).unwrap();
    assert_eq!(view.status, SwapStatus::Claimed);
    assert_eq!(view.revealed_secret, Some(s.to_hex()));

    assert_eq!(
        m.initiate(&request(&lock), Identity::new("alice"), T + 2)
            .unwrap_err()
            .code(),
        "AlreadyExists"
    );
    assert_eq!(
        m.refund(&lock.to_hex(), Identity::new("alice"), EXPIRATION)
            .unwrap_err()
            .code(),
        "NotOpen"
    );
}
