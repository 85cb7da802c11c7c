//! The process-wide dispatch table and the public operation surface.
//!
//! One cache-line-aligned record of function pointers, one pointer per
//! operation. The record starts as the scalar table, is populated from the
//! detected [`Capabilities`] exactly once — eagerly via
//! [`dispatch_table_init`] or lazily on the first operation call — and can
//! be overwritten afterwards only through [`dispatch_table_update`].
//! Selection is a capability ladder from the lowest tier to the highest,
//! each tier overwriting the entries it accelerates.
//!
//! Calling any operation concurrently with an update is undefined; callers
//! that re-point the table (tests, benchmarks) must quiesce first.

use core::cell::UnsafeCell;
use core::cmp::Ordering;
use std::sync::Once;

use crate::alloc::ScratchAllocator;
use crate::caps::{capabilities, Capabilities};
use crate::hash::HashState;
use crate::seq::Sequence;
use crate::types::{ByteSet, Error};
use crate::{argsort, hash as hash_mod, intersect, scalar, sort};

// ─────────────────────────────────────────────────────────────────────────────
// Operation signatures
// ─────────────────────────────────────────────────────────────────────────────

type EqualFn = fn(&[u8], &[u8]) -> bool;
type OrderFn = fn(&[u8], &[u8]) -> Ordering;
type CopyFn = fn(&mut [u8], &[u8]);
type MoveFn = fn(&mut [u8], usize, usize, usize);
type FillFn = fn(&mut [u8], u8);
type LookupFn = fn(&mut [u8], &[u8], &[u8; 256]);
type BytesumFn = fn(&[u8]) -> u64;
type FindByteFn = fn(&[u8], u8) -> Option<usize>;
type FindFn = fn(&[u8], &[u8]) -> Option<usize>;
type FindBytesetFn = fn(&[u8], &ByteSet) -> Option<usize>;
type HashFn = fn(&[u8], u64) -> u64;
type HashInitFn = fn(u64) -> HashState;
type HashUpdateFn = fn(&mut HashState, &[u8]);
type HashDigestFn = fn(&HashState) -> u64;
type FillRandomFn = fn(&mut [u8], u64);
type PgramsSortFn = fn(&mut [u64], &ScratchAllocator, &mut [usize]) -> Result<(), Error>;
type SequenceArgsortFn = fn(&dyn Sequence, &ScratchAllocator, &mut [usize]) -> Result<(), Error>;
type SequenceIntersectFn = fn(
    &dyn Sequence,
    &dyn Sequence,
    &ScratchAllocator,
    u64,
    &mut [usize],
    &mut [usize],
) -> Result<usize, Error>;

// ─────────────────────────────────────────────────────────────────────────────
// The table
// ─────────────────────────────────────────────────────────────────────────────

#[repr(align(64))]
#[derive(Clone, Copy)]
struct DispatchTable {
    equal: EqualFn,
    order: OrderFn,

    copy: CopyFn,
    move_bytes: MoveFn,
    fill: FillFn,
    lookup: LookupFn,

    bytesum: BytesumFn,
    hash: HashFn,
    hash_state_init: HashInitFn,
    hash_state_update: HashUpdateFn,
    hash_state_digest: HashDigestFn,
    fill_random: FillRandomFn,

    find_byte: FindByteFn,
    rfind_byte: FindByteFn,
    find: FindFn,
    rfind: FindFn,
    find_byteset: FindBytesetFn,
    rfind_byteset: FindBytesetFn,

    pgrams_sort: PgramsSortFn,
    sequence_argsort: SequenceArgsortFn,
    sequence_intersect: SequenceIntersectFn,
}

fn hash_state_init_serial(seed: u64) -> HashState {
    HashState::new(seed)
}

fn hash_state_update_serial(state: &mut HashState, text: &[u8]) {
    state.update(text);
}

fn hash_state_digest_serial(state: &HashState) -> u64 {
    state.digest()
}

const SERIAL_TABLE: DispatchTable = DispatchTable {
    equal: scalar::equal,
    order: scalar::order,

    copy: scalar::copy,
    move_bytes: scalar::move_bytes,
    fill: scalar::fill,
    lookup: scalar::lookup,

    bytesum: scalar::bytesum,
    hash: hash_mod::hash,
    hash_state_init: hash_state_init_serial,
    hash_state_update: hash_state_update_serial,
    hash_state_digest: hash_state_digest_serial,
    fill_random: hash_mod::fill_random,

    find_byte: scalar::find_byte,
    rfind_byte: scalar::rfind_byte,
    find: scalar::find,
    rfind: scalar::rfind,
    find_byteset: scalar::find_byteset,
    rfind_byteset: scalar::rfind_byteset,

    pgrams_sort: sort::pgrams_sort,
    sequence_argsort: argsort::sequence_argsort,
    sequence_intersect: intersect::sequence_intersect,
};

impl DispatchTable {
    /// Builds the table for a capability set: scalar everywhere, then each
    /// supported tier overwrites the entries it accelerates, lowest first.
    fn for_capabilities(caps: Capabilities) -> DispatchTable {
        let mut table = SERIAL_TABLE;
        let _ = caps; // On targets without accelerated tiers the ladder is empty.

        #[cfg(target_arch = "x86_64")]
        {
            use crate::simd::{haswell, skylake};

            if caps.contains(Capabilities::HASWELL) {
                table.equal = haswell::equal;
                table.order = haswell::order;

                table.copy = haswell::copy;
                table.move_bytes = haswell::move_bytes;
                table.fill = haswell::fill;

                table.bytesum = haswell::bytesum;

                table.find_byte = haswell::find_byte;
                table.rfind_byte = haswell::rfind_byte;
                table.find = haswell::find;
                table.rfind = haswell::rfind;
                table.find_byteset = haswell::find_byteset;
                table.rfind_byteset = haswell::rfind_byteset;
            }

            if caps.contains(Capabilities::SKYLAKE) {
                table.equal = skylake::equal;
                table.order = skylake::order;

                table.copy = skylake::copy;
                table.move_bytes = skylake::move_bytes;
                table.fill = skylake::fill;

                table.bytesum = skylake::bytesum;

                table.find_byte = skylake::find_byte;
                table.rfind_byte = skylake::rfind_byte;
                table.find = skylake::find;
                table.rfind = skylake::rfind;

                table.pgrams_sort = skylake::pgrams_sort;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            use crate::simd::neon;

            if caps.contains(Capabilities::NEON) {
                table.equal = neon::equal;

                table.copy = neon::copy;
                table.move_bytes = neon::move_bytes;
                table.fill = neon::fill;
                table.lookup = neon::lookup;

                table.bytesum = neon::bytesum;

                table.find_byte = neon::find_byte;
                table.rfind_byte = neon::rfind_byte;
                table.find = neon::find;
                table.rfind = neon::rfind;
                table.find_byteset = neon::find_byteset;
                table.rfind_byteset = neon::rfind_byteset;
            }
        }

        table
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process-wide storage
// ─────────────────────────────────────────────────────────────────────────────

struct TableCell(UnsafeCell<DispatchTable>);

// The cell is written by `dispatch_table_init` (once) and
// `dispatch_table_update` (caller-quiesced); all other access is reads of
// plain function pointers. Concurrent reads are fine; racing an update is
// documented undefined behavior, mirroring the C dynamic-dispatch contract.
unsafe impl Sync for TableCell {}

static TABLE: TableCell = TableCell(UnsafeCell::new(SERIAL_TABLE));
static TABLE_INIT: Once = Once::new();

/// Populates the dispatch table from the host's detected capabilities.
///
/// Runs the detection at most once; later calls are no-ops. Every public
/// operation calls this lazily, so explicit initialization is only needed
/// by embedders that want the detection cost paid at load time.
pub fn dispatch_table_init() {
    TABLE_INIT.call_once(|| unsafe {
        *TABLE.0.get() = DispatchTable::for_capabilities(capabilities());
    });
}

/// Re-points the dispatch table at the kernels for `caps`.
///
/// Intended for tests and benchmarks that pin a tier. The caller must pass
/// a subset of the host's actual [`capabilities`]: installing kernels the
/// CPU cannot execute is undefined behavior, as is calling any operation
/// concurrently with the update.
pub fn dispatch_table_update(caps: Capabilities) {
    TABLE_INIT.call_once(|| {});
    unsafe {
        *TABLE.0.get() = DispatchTable::for_capabilities(caps);
    }
}

#[inline]
fn table() -> &'static DispatchTable {
    dispatch_table_init();
    unsafe { &*TABLE.0.get() }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public operation surface
// ─────────────────────────────────────────────────────────────────────────────

/// True when `a` and `b` are byte-identical. Two empty spans are equal;
/// spans of different lengths are not.
#[inline]
pub fn equal(a: &[u8], b: &[u8]) -> bool {
    (table().equal)(a, b)
}

/// Lexicographic comparison over unsigned bytes; a strict prefix is
/// `Less` than its extension.
#[inline]
pub fn order(a: &[u8], b: &[u8]) -> Ordering {
    (table().order)(a, b)
}

/// Copies `src` into `dst`. Panics if the lengths differ.
#[inline]
pub fn copy(dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len(), "copy requires equal-length spans");
    (table().copy)(dst, src)
}

/// Moves `len` bytes within `buf` from `src` to `dst`, correct for any
/// overlap. Panics if either range leaves `buf`.
#[inline]
pub fn move_bytes(buf: &mut [u8], src: usize, dst: usize, len: usize) {
    (table().move_bytes)(buf, src, dst, len)
}

/// Fills `dst` with `value`.
#[inline]
pub fn fill(dst: &mut [u8], value: u8) {
    (table().fill)(dst, value)
}

/// Applies a 256-byte substitution table: `dst[i] = lut[src[i]]`. Panics if
/// the lengths differ. `dst` and `src` cannot overlap here; for the
/// identical-span case use [`lookup_inplace`].
#[inline]
pub fn lookup(dst: &mut [u8], src: &[u8], lut: &[u8; 256]) {
    assert_eq!(dst.len(), src.len(), "lookup requires equal-length spans");
    (table().lookup)(dst, src, lut)
}

/// In-place [`lookup`]: `buf[i] = lut[buf[i]]`.
#[inline]
pub fn lookup_inplace(buf: &mut [u8], lut: &[u8; 256]) {
    scalar::lookup_inplace(buf, lut)
}

/// Sum of the byte values of `text` as a `u64`.
#[inline]
pub fn bytesum(text: &[u8]) -> u64 {
    (table().bytesum)(text)
}

/// One-shot keyed hash; equals `HashState::new(seed)` → `update(text)` →
/// `digest()` bit-for-bit.
#[inline]
pub fn hash(text: &[u8], seed: u64) -> u64 {
    (table().hash)(text, seed)
}

/// Starts an incremental hash keyed by `seed`.
#[inline]
pub fn hash_state_init(seed: u64) -> HashState {
    (table().hash_state_init)(seed)
}

/// Absorbs `text` into `state`; associative over concatenation.
#[inline]
pub fn hash_state_update(state: &mut HashState, text: &[u8]) {
    (table().hash_state_update)(state, text)
}

/// Digest of everything absorbed so far; non-destructive.
#[inline]
pub fn hash_state_digest(state: &HashState) -> u64 {
    (table().hash_state_digest)(state)
}

/// Fills `dst` with the deterministic byte stream keyed by `nonce`.
#[inline]
pub fn fill_random(dst: &mut [u8], nonce: u64) {
    (table().fill_random)(dst, nonce)
}

/// Index of the first occurrence of `needle` in `haystack`.
#[inline]
pub fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    (table().find_byte)(haystack, needle)
}

/// Index of the last occurrence of `needle` in `haystack`.
#[inline]
pub fn rfind_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    (table().rfind_byte)(haystack, needle)
}

/// Index of the first occurrence of `needle` as a substring; an empty
/// needle matches at 0.
#[inline]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    (table().find)(haystack, needle)
}

/// Index of the last occurrence of `needle` as a substring; an empty
/// needle matches at `haystack.len()`.
#[inline]
pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    (table().rfind)(haystack, needle)
}

/// Index of the first byte of `text` whose bit is set in `set`.
#[inline]
pub fn find_byteset(text: &[u8], set: &ByteSet) -> Option<usize> {
    (table().find_byteset)(text, set)
}

/// Index of the last byte of `text` whose bit is set in `set`.
#[inline]
pub fn rfind_byteset(text: &[u8], set: &ByteSet) -> Option<usize> {
    (table().rfind_byteset)(text, set)
}

/// Stable permutation sort of 64-bit p-grams; see
/// [`sort::pgrams_sort`](crate::sort::pgrams_sort) for the contract.
#[inline]
pub fn pgrams_sort(
    keys: &mut [u64],
    alloc: &ScratchAllocator,
    order: &mut [usize],
) -> Result<(), Error> {
    (table().pgrams_sort)(keys, alloc, order)
}

/// Stable lexicographic argsort of a sequence; see
/// [`argsort::sequence_argsort`](crate::argsort::sequence_argsort).
#[inline]
pub fn sequence_argsort(
    seq: &dyn Sequence,
    alloc: &ScratchAllocator,
    order: &mut [usize],
) -> Result<(), Error> {
    (table().sequence_argsort)(seq, alloc, order)
}

/// Multiset intersection of two sequences; see
/// [`intersect::sequence_intersect`](crate::intersect::sequence_intersect).
#[inline]
pub fn sequence_intersect(
    a: &dyn Sequence,
    b: &dyn Sequence,
    alloc: &ScratchAllocator,
    seed: u64,
    a_pos: &mut [usize],
    b_pos: &mut [usize],
) -> Result<usize, Error> {
    (table().sequence_intersect)(a, b, alloc, seed, a_pos, b_pos)
}
