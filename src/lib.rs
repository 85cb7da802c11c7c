// simdbytes — runtime-dispatched byte-string primitives.
//
// A leaf library: byte search (forward/reverse, single byte, substring,
// byte-set), equality and lexicographic ordering, bulk copy/move/fill/
// lookup-table transform, byte-sum, keyed hashing, deterministic random
// fill, stable permutation sorts, and multiset intersection — each routed
// at runtime to the fastest kernel the host CPU supports.

pub mod alloc;
pub mod argsort;
pub mod caps;
pub mod dispatch;
pub mod hash;
pub mod intersect;
pub mod scalar;
pub mod seq;
pub mod simd;
pub mod sort;
pub mod types;

#[cfg(feature = "c-abi")]
pub mod abi;

// ─────────────────────────────────────────────────────────────────────────────
// Capability detection
// ─────────────────────────────────────────────────────────────────────────────

/// Bitset of instruction tiers the host supports.
pub use caps::Capabilities;
/// Detects the host's supported tiers. `SERIAL` is always reported.
pub use caps::capabilities;
/// Stable textual rendering of a capability bitset.
pub use caps::capabilities_to_string;

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch table lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Populates the dispatch table from detected capabilities (idempotent;
/// also runs lazily before the first operation).
pub use dispatch::dispatch_table_init;
/// Re-points the table at the kernels for a capability subset (tests).
pub use dispatch::dispatch_table_update;

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

pub use dispatch::{
    bytesum, copy, equal, fill, fill_random, find, find_byte, find_byteset, hash,
    hash_state_digest, hash_state_init, hash_state_update, lookup, lookup_inplace, move_bytes,
    order, pgrams_sort, rfind, rfind_byte, rfind_byteset, sequence_argsort, sequence_intersect,
};

// ─────────────────────────────────────────────────────────────────────────────
// Value types at the boundary
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-provided allocator record for kernel scratch memory.
pub use alloc::ScratchAllocator;
/// Incremental keyed-hash state (init / update / digest).
pub use hash::HashState;
/// Indexed collection of byte spans, as consumed by sort and intersect.
pub use seq::Sequence;
/// Tape sequences: shared buffer plus 32- or 64-bit length arrays.
pub use seq::{Tape32, Tape64};
/// 256-bit byte membership filter.
pub use types::ByteSet;
/// Failures from the fallible operations.
pub use types::Error;
/// C-ABI status codes mirroring [`Error`].
pub use types::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Version
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION_MAJOR: i32 = 1;
pub const VERSION_MINOR: i32 = 0;
pub const VERSION_PATCH: i32 = 0;
pub const VERSION_STRING: &str = "1.0.0";

/// Returns the library version number (e.g. 10000 for v1.0.0).
pub fn version_number() -> i32 {
    VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_PATCH
}

/// Returns the library version string (e.g. `"1.0.0"`).
pub fn version_string() -> &'static str {
    VERSION_STRING
}
