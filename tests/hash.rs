// Integration tests for keyed hashing (one-shot + incremental) and the
// deterministic random fill.
//
// The central contract: one-shot hashing equals init → update → digest
// bit-for-bit, for any chunking of the input.

use proptest::prelude::*;
use simdbytes::{
    fill_random, hash, hash_state_digest, hash_state_init, hash_state_update, HashState,
};

// ---------------------------------------------------------------------------
// One-shot vs incremental
// ---------------------------------------------------------------------------

#[test]
fn empty_input_oneshot_equals_streaming() {
    let state = hash_state_init(0);
    assert_eq!(hash(b"", 0), hash_state_digest(&state));
}

#[test]
fn split_update_equals_oneshot() {
    let mut state = hash_state_init(0);
    hash_state_update(&mut state, b"he");
    hash_state_update(&mut state, b"llo");
    assert_eq!(
        hash(b"hello", 0),
        hash_state_digest(&state),
        "update must be associative over concatenation"
    );
}

#[test]
fn byte_by_byte_update_equals_oneshot() {
    let data = b"the quick brown fox jumps over the lazy dog";
    let seed = 0xDEAD_BEEF_u64;
    let mut state = hash_state_init(seed);
    for b in data {
        hash_state_update(&mut state, core::slice::from_ref(b));
    }
    assert_eq!(hash(data, seed), hash_state_digest(&state));
}

#[test]
fn digest_is_non_destructive() {
    let mut state = hash_state_init(7);
    hash_state_update(&mut state, b"partial");
    let mid = hash_state_digest(&state);
    assert_eq!(mid, hash_state_digest(&state), "repeated digests must agree");
    hash_state_update(&mut state, b" rest");
    assert_eq!(hash(b"partial rest", 7), hash_state_digest(&state));
}

#[test]
fn seed_affects_digest() {
    assert_ne!(hash(b"collide", 0), hash(b"collide", 1));
    assert_ne!(
        hash_state_digest(&hash_state_init(0)),
        hash_state_digest(&hash_state_init(1)),
        "seed must reach the empty digest too"
    );
}

#[test]
fn state_methods_match_dispatched_functions() {
    let mut a = hash_state_init(3);
    hash_state_update(&mut a, b"abc");
    let mut b = HashState::new(3);
    b.update(b"abc");
    assert_eq!(hash_state_digest(&a), b.digest());
}

proptest! {
    #[test]
    fn any_split_equals_oneshot(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        cut in any::<proptest::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let cut = cut.index(data.len() + 1);
        let (head, tail) = data.split_at(cut);
        let mut state = hash_state_init(seed);
        hash_state_update(&mut state, head);
        hash_state_update(&mut state, tail);
        prop_assert_eq!(hash(&data, seed), hash_state_digest(&state));
    }
}

// ---------------------------------------------------------------------------
// Random fill
// ---------------------------------------------------------------------------

#[test]
fn fill_random_is_deterministic_per_nonce() {
    let mut a = [0u8; 100];
    let mut b = [0u8; 100];
    fill_random(&mut a, 42);
    fill_random(&mut b, 42);
    assert_eq!(a, b);
}

#[test]
fn fill_random_is_positional() {
    // The stream is a function of (nonce, position): a shorter fill is a
    // prefix of a longer one.
    let mut long = [0u8; 75];
    let mut short = [0u8; 33];
    fill_random(&mut long, 9);
    fill_random(&mut short, 9);
    assert_eq!(&long[..33], &short[..]);
}

#[test]
fn fill_random_nonces_differ() {
    let mut a = [0u8; 64];
    let mut b = [0u8; 64];
    fill_random(&mut a, 0);
    fill_random(&mut b, 1);
    assert_ne!(a, b);
}

#[test]
fn fill_random_zero_length_is_noop() {
    fill_random(&mut [], 1234);
}

#[test]
fn fill_random_bytes_are_not_constant() {
    let mut buf = [0u8; 256];
    fill_random(&mut buf, 7);
    let first = buf[0];
    assert!(
        buf.iter().any(|&b| b != first),
        "keystream should not be a constant byte"
    );
}
