//! Keyed hashing and deterministic pseudo-random fill.
//!
//! The hash is XXH3-64 from the `xxhash-rust` crate: seedable, streaming,
//! and bit-identical between the one-shot and incremental forms. It is not
//! cryptographic; the seed exists to decorrelate hash tables across runs,
//! not to resist an adversary.
//!
//! # Parity vectors
//! * `hash(b"", 0)` == `Xxh3::with_seed(0).digest()`
//! * `hash(b"hello", s)` == `init(s); update(b"he"); update(b"llo"); digest()`

use xxhash_rust::xxh3::{xxh3_64_with_seed, Xxh3};

// ─────────────────────────────────────────────────────────────────────────────
// One-shot and incremental hashing
// ─────────────────────────────────────────────────────────────────────────────

/// One-shot keyed hash of `text` under `seed`.
#[inline]
pub fn hash(text: &[u8], seed: u64) -> u64 {
    xxh3_64_with_seed(text, seed)
}

/// Incremental hash state: init / update / digest.
///
/// `update` is associative over concatenation, so any chunking of the input
/// produces the digest of the concatenated whole. `digest` is
/// non-destructive; a state can be digested mid-stream and updated further.
#[derive(Clone)]
pub struct HashState {
    inner: Xxh3,
}

impl HashState {
    /// Starts a fresh state keyed by `seed`.
    #[inline]
    pub fn new(seed: u64) -> Self {
        HashState { inner: Xxh3::with_seed(seed) }
    }

    /// Absorbs `text`.
    #[inline]
    pub fn update(&mut self, text: &[u8]) {
        self.inner.update(text);
    }

    /// The digest of everything absorbed so far.
    #[inline]
    pub fn digest(&self) -> u64 {
        self.inner.digest()
    }
}

impl core::fmt::Debug for HashState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashState").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deterministic random fill
// ─────────────────────────────────────────────────────────────────────────────

/// Multiplicative constant of the SplitMix64 sequence step.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 output scrambler: a bijective avalanche over one 64-bit word.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Keystream word for the `block`-th 8-byte group of a `nonce`-keyed stream.
///
/// A pure function of (nonce, block), so concurrent consumers of the same
/// nonce observe identical bytes no matter how the destination is chunked.
#[inline]
fn keystream_word(nonce: u64, block: u64) -> u64 {
    mix64(nonce.wrapping_add(block.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}

/// Fills `dst` with a deterministic byte stream keyed by `nonce`.
///
/// Same nonce and length ⇒ identical bytes; different nonces produce
/// statistically independent streams. Suitable for sketches, bloom-filter
/// keys, and dedup salts — not for key material.
pub fn fill_random(dst: &mut [u8], nonce: u64) {
    let mut block: u64 = 0;
    let mut chunks = dst.chunks_exact_mut(8);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&keystream_word(nonce, block).to_le_bytes());
        block += 1;
    }
    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let word = keystream_word(nonce, block).to_le_bytes();
        tail.copy_from_slice(&word[..tail.len()]);
    }
}
