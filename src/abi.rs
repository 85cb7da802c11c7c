//! C-ABI shims — export the stable `sb_*` symbols.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced staticlib exposes one entry per dispatch-table operation
//! with plain pointers and lengths, so C callers and FFI veneers link
//! directly against the runtime-dispatched kernels. With the
//! `libc-override` feature the libc `mem*` family is exported as well,
//! for LD_PRELOAD-style interposition.

use std::os::raw::c_int;
use std::slice;

use crate::alloc::ScratchAllocator;
use crate::caps::Capabilities;
use crate::seq::Tape64;
use crate::types::{ByteSet, Status};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Borrows `(ptr, len)` as a byte slice; a zero length never dereferences.
#[inline]
unsafe fn bytes<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

/// Mutable variant of [`bytes`].
#[inline]
unsafe fn bytes_mut<'a>(ptr: *mut u8, len: usize) -> &'a mut [u8] {
    if len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len)
    }
}

/// Maps an index result back to libc's pointer-or-null convention.
#[inline]
fn at_or_null(base: *const u8, hit: Option<usize>) -> *const u8 {
    match hit {
        Some(i) => unsafe { base.add(i) },
        None => core::ptr::null(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle and introspection
// ─────────────────────────────────────────────────────────────────────────────

#[no_mangle]
pub extern "C" fn sb_dispatch_table_init() {
    crate::dispatch_table_init();
}

#[no_mangle]
pub extern "C" fn sb_dispatch_table_update(caps: u32) {
    crate::dispatch_table_update(Capabilities::from_bits_truncate(caps));
}

#[no_mangle]
pub extern "C" fn sb_capabilities() -> u32 {
    crate::capabilities().bits()
}

#[no_mangle]
pub extern "C" fn sb_version_major() -> c_int {
    crate::VERSION_MAJOR
}

#[no_mangle]
pub extern "C" fn sb_version_minor() -> c_int {
    crate::VERSION_MINOR
}

#[no_mangle]
pub extern "C" fn sb_version_patch() -> c_int {
    crate::VERSION_PATCH
}

// ─────────────────────────────────────────────────────────────────────────────
// Compare and bulk memory
// ─────────────────────────────────────────────────────────────────────────────

/// Returns 1 when the two spans of length `n` are byte-identical.
#[no_mangle]
pub unsafe extern "C" fn sb_equal(a: *const u8, b: *const u8, n: usize) -> c_int {
    crate::equal(bytes(a, n), bytes(b, n)) as c_int
}

/// Returns -1/0/1 for less/equal/greater in lexicographic byte order.
#[no_mangle]
pub unsafe extern "C" fn sb_order(
    a: *const u8,
    a_len: usize,
    b: *const u8,
    b_len: usize,
) -> c_int {
    match crate::order(bytes(a, a_len), bytes(b, b_len)) {
        core::cmp::Ordering::Less => -1,
        core::cmp::Ordering::Equal => 0,
        core::cmp::Ordering::Greater => 1,
    }
}

#[no_mangle]
pub unsafe extern "C" fn sb_copy(dst: *mut u8, src: *const u8, n: usize) {
    crate::copy(bytes_mut(dst, n), bytes(src, n));
}

/// `memmove` semantics: the ranges may overlap in either direction.
#[no_mangle]
pub unsafe extern "C" fn sb_move(dst: *mut u8, src: *const u8, n: usize) {
    if n == 0 {
        return;
    }
    // Rebase both ranges into one span covering their union so the
    // overlap-aware kernel sees a single buffer.
    let d = dst as usize;
    let s = src as usize;
    let lo = d.min(s);
    let hi = d.max(s) + n;
    let buf = slice::from_raw_parts_mut(lo as *mut u8, hi - lo);
    crate::move_bytes(buf, s - lo, d - lo, n);
}

#[no_mangle]
pub unsafe extern "C" fn sb_fill(dst: *mut u8, n: usize, value: u8) {
    crate::fill(bytes_mut(dst, n), value);
}

/// `dst[i] = lut[src[i]]` for a 256-byte table. `dst == src` is allowed;
/// any other overlap is undefined.
#[no_mangle]
pub unsafe extern "C" fn sb_lookup(dst: *mut u8, n: usize, src: *const u8, lut: *const u8) {
    let lut = &*(lut as *const [u8; 256]);
    if core::ptr::eq(dst as *const u8, src) {
        crate::lookup_inplace(bytes_mut(dst, n), lut);
    } else {
        crate::lookup(bytes_mut(dst, n), bytes(src, n), lut);
    }
}

#[no_mangle]
pub unsafe extern "C" fn sb_bytesum(text: *const u8, n: usize) -> u64 {
    crate::bytesum(bytes(text, n))
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer to the first occurrence of `*needle`, or null.
#[no_mangle]
pub unsafe extern "C" fn sb_find_byte(
    haystack: *const u8,
    h_len: usize,
    needle: *const u8,
) -> *const u8 {
    at_or_null(haystack, crate::find_byte(bytes(haystack, h_len), *needle))
}

/// Pointer to the last occurrence of `*needle`, or null.
#[no_mangle]
pub unsafe extern "C" fn sb_rfind_byte(
    haystack: *const u8,
    h_len: usize,
    needle: *const u8,
) -> *const u8 {
    at_or_null(haystack, crate::rfind_byte(bytes(haystack, h_len), *needle))
}

/// Pointer to the first substring occurrence; an empty needle matches at
/// the haystack start.
#[no_mangle]
pub unsafe extern "C" fn sb_find(
    haystack: *const u8,
    h_len: usize,
    needle: *const u8,
    n_len: usize,
) -> *const u8 {
    at_or_null(
        haystack,
        crate::find(bytes(haystack, h_len), bytes(needle, n_len)),
    )
}

/// Pointer to the last substring occurrence; an empty needle matches at
/// the haystack end.
#[no_mangle]
pub unsafe extern "C" fn sb_rfind(
    haystack: *const u8,
    h_len: usize,
    needle: *const u8,
    n_len: usize,
) -> *const u8 {
    at_or_null(
        haystack,
        crate::rfind(bytes(haystack, h_len), bytes(needle, n_len)),
    )
}

/// Pointer to the first byte whose bit is set in `*set`, or null.
#[no_mangle]
pub unsafe extern "C" fn sb_find_byteset(
    text: *const u8,
    n: usize,
    set: *const ByteSet,
) -> *const u8 {
    at_or_null(text, crate::find_byteset(bytes(text, n), &*set))
}

/// Pointer to the last byte whose bit is set in `*set`, or null.
#[no_mangle]
pub unsafe extern "C" fn sb_rfind_byteset(
    text: *const u8,
    n: usize,
    set: *const ByteSet,
) -> *const u8 {
    at_or_null(text, crate::rfind_byteset(bytes(text, n), &*set))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash and random fill
// ─────────────────────────────────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn sb_hash(text: *const u8, n: usize, seed: u64) -> u64 {
    crate::hash(bytes(text, n), seed)
}

#[no_mangle]
pub unsafe extern "C" fn sb_fill_random(dst: *mut u8, n: usize, nonce: u64) {
    crate::fill_random(bytes_mut(dst, n), nonce);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sort and intersect (tape flavor)
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves a possibly-null allocator record to the malloc default.
#[inline]
unsafe fn allocator_or_default(alloc: *const ScratchAllocator) -> ScratchAllocator {
    if alloc.is_null() {
        ScratchAllocator::new_malloc()
    } else {
        *alloc
    }
}

/// Stable permutation sort of `count` 64-bit keys. Pass a null allocator
/// to use malloc-backed scratch.
#[no_mangle]
pub unsafe extern "C" fn sb_pgrams_sort(
    keys: *mut u64,
    count: usize,
    alloc: *const ScratchAllocator,
    order: *mut usize,
) -> Status {
    let alloc = allocator_or_default(alloc);
    let keys = if count == 0 { &mut [][..] } else { slice::from_raw_parts_mut(keys, count) };
    let order = if count == 0 { &mut [][..] } else { slice::from_raw_parts_mut(order, count) };
    crate::pgrams_sort(keys, &alloc, order).into()
}

/// Stable argsort of a 64-bit tape: `data` split by `lengths[0..count]`.
#[no_mangle]
pub unsafe extern "C" fn sb_sequence_argsort(
    data: *const u8,
    data_len: usize,
    lengths: *const u64,
    count: usize,
    alloc: *const ScratchAllocator,
    order: *mut usize,
) -> Status {
    let lengths = if count == 0 { &[][..] } else { slice::from_raw_parts(lengths, count) };
    let tape = match Tape64::new(bytes(data, data_len), lengths) {
        Ok(tape) => tape,
        Err(e) => return Err::<(), _>(e).into(),
    };
    let order = if count == 0 { &mut [][..] } else { slice::from_raw_parts_mut(order, count) };
    let alloc = allocator_or_default(alloc);
    crate::sequence_argsort(&tape, &alloc, order).into()
}

/// Multiset intersection of two 64-bit tapes. `a_pos`/`b_pos` must hold at
/// least `min(a_count, b_count)` entries; `*pair_count` receives `k`.
#[no_mangle]
pub unsafe extern "C" fn sb_sequence_intersect(
    a_data: *const u8,
    a_data_len: usize,
    a_lengths: *const u64,
    a_count: usize,
    b_data: *const u8,
    b_data_len: usize,
    b_lengths: *const u64,
    b_count: usize,
    alloc: *const ScratchAllocator,
    seed: u64,
    pair_count: *mut usize,
    a_pos: *mut usize,
    b_pos: *mut usize,
) -> Status {
    let a_lengths = if a_count == 0 { &[][..] } else { slice::from_raw_parts(a_lengths, a_count) };
    let b_lengths = if b_count == 0 { &[][..] } else { slice::from_raw_parts(b_lengths, b_count) };
    let (a, b) = match (
        Tape64::new(bytes(a_data, a_data_len), a_lengths),
        Tape64::new(bytes(b_data, b_data_len), b_lengths),
    ) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => return Err::<(), _>(e).into(),
    };
    let cap = a_count.min(b_count);
    let a_pos = if cap == 0 { &mut [][..] } else { slice::from_raw_parts_mut(a_pos, cap) };
    let b_pos = if cap == 0 { &mut [][..] } else { slice::from_raw_parts_mut(b_pos, cap) };
    let alloc = allocator_or_default(alloc);
    match crate::sequence_intersect(&a, &b, &alloc, seed, a_pos, b_pos) {
        Ok(k) => {
            *pair_count = k;
            Status::Success
        }
        Err(e) => Err::<(), _>(e).into(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// libc interposition
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "libc-override")]
mod libc_override {
    use core::ffi::c_void;
    use std::os::raw::c_int;

    use super::{bytes, bytes_mut};

    #[no_mangle]
    pub unsafe extern "C" fn memchr(s: *const c_void, c: c_int, n: usize) -> *mut c_void {
        match crate::find_byte(bytes(s as *const u8, n), c as u8) {
            Some(i) => (s as *mut u8).add(i) as *mut c_void,
            None => core::ptr::null_mut(),
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn memcpy(dest: *mut c_void, src: *const c_void, n: usize) -> *mut c_void {
        crate::copy(bytes_mut(dest as *mut u8, n), bytes(src as *const u8, n));
        dest
    }

    #[no_mangle]
    pub unsafe extern "C" fn memmove(dest: *mut c_void, src: *const c_void, n: usize) -> *mut c_void {
        super::sb_move(dest as *mut u8, src as *const u8, n);
        dest
    }

    #[no_mangle]
    pub unsafe extern "C" fn memset(s: *mut c_void, c: c_int, n: usize) -> *mut c_void {
        crate::fill(bytes_mut(s as *mut u8, n), c as u8);
        s
    }

    #[cfg(not(windows))]
    #[no_mangle]
    pub unsafe extern "C" fn memmem(
        haystack: *const c_void,
        h_len: usize,
        needle: *const c_void,
        n_len: usize,
    ) -> *mut c_void {
        match crate::find(bytes(haystack as *const u8, h_len), bytes(needle as *const u8, n_len)) {
            Some(i) => (haystack as *mut u8).add(i) as *mut c_void,
            None => core::ptr::null_mut(),
        }
    }

    #[cfg(not(windows))]
    #[no_mangle]
    pub unsafe extern "C" fn memrchr(s: *const c_void, c: c_int, n: usize) -> *mut c_void {
        match crate::rfind_byte(bytes(s as *const u8, n), c as u8) {
            Some(i) => (s as *mut u8).add(i) as *mut c_void,
            None => core::ptr::null_mut(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
