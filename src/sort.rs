//! Stable permutation sort of 64-bit p-grams.
//!
//! Short runs use a pair-moving insertion sort with no scratch at all.
//! Larger inputs take eight least-significant-byte radix passes over 256
//! buckets, ping-ponging between the caller's arrays and allocator-provided
//! scratch; passes whose histogram collapses into a single bucket are
//! skipped, so nearly-uniform high bytes cost nothing.

use crate::alloc::{ScratchAllocator, ScratchVec};
use crate::types::Error;

/// Below this count the insertion path wins and no scratch is requested.
pub(crate) const INSERTION_CUTOFF: usize = 32;

/// Stable insertion sort of `(key, order)` pairs. Strict comparison keeps
/// equal keys in input order.
pub(crate) fn insertion_sort_pairs(keys: &mut [u64], order: &mut [usize]) {
    for i in 1..keys.len() {
        let (key, idx) = (keys[i], order[i]);
        let mut j = i;
        while j > 0 && keys[j - 1] > key {
            keys[j] = keys[j - 1];
            order[j] = order[j - 1];
            j -= 1;
        }
        keys[j] = key;
        order[j] = idx;
    }
}

/// One stable counting pass on the byte at `shift`.
///
/// Returns `false` without writing anything when all keys share that byte
/// (single occupied bucket), letting the caller skip the copy.
fn scatter_pass(
    src_keys: &[u64],
    src_order: &[usize],
    dst_keys: &mut [u64],
    dst_order: &mut [usize],
    shift: u32,
) -> bool {
    let mut counts = [0usize; 256];
    for &key in src_keys {
        counts[(key >> shift) as usize & 0xFF] += 1;
    }
    if counts.iter().any(|&c| c == src_keys.len()) {
        return false;
    }

    // Bucket prefix sums become the stable destination cursors.
    let mut cursors = [0usize; 256];
    let mut offset = 0usize;
    for (cursor, &count) in cursors.iter_mut().zip(&counts) {
        *cursor = offset;
        offset += count;
    }

    for (&key, &idx) in src_keys.iter().zip(src_order) {
        let bucket = (key >> shift) as usize & 0xFF;
        let dst = cursors[bucket];
        cursors[bucket] += 1;
        dst_keys[dst] = key;
        dst_order[dst] = idx;
    }
    true
}

/// Stably sorts `keys` in non-decreasing unsigned order and records the
/// permutation: `order[i]` is the original index of the key now at `i`.
///
/// Scratch (2 × n × 8 bytes) comes from `alloc`; on [`Error::BadAlloc`] both
/// `keys` and `order` are left untouched.
pub fn pgrams_sort(
    keys: &mut [u64],
    alloc: &ScratchAllocator,
    order: &mut [usize],
) -> Result<(), Error> {
    if order.len() != keys.len() {
        return Err(Error::InvalidArgument);
    }
    let n = keys.len();

    if n <= INSERTION_CUTOFF {
        for (i, slot) in order.iter_mut().enumerate() {
            *slot = i;
        }
        insertion_sort_pairs(keys, order);
        return Ok(());
    }

    // Both buffers are claimed before the outputs are touched, so a failed
    // second allocation still leaves the inputs unchanged.
    let mut alt_keys: ScratchVec<u64> = ScratchVec::new(alloc, n)?;
    let mut alt_order: ScratchVec<usize> = ScratchVec::new(alloc, n)?;
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = i;
    }

    // Ping-pong between the caller's arrays and the scratch pair; skipped
    // passes do not flip the side.
    let mut in_alt = false;
    for pass in 0..8u32 {
        let shift = pass * 8;
        let performed = if in_alt {
            scatter_pass(&alt_keys, &alt_order, keys, order, shift)
        } else {
            scatter_pass(keys, order, &mut alt_keys, &mut alt_order, shift)
        };
        if performed {
            in_alt = !in_alt;
        }
    }
    if in_alt {
        keys.copy_from_slice(&alt_keys);
        order.copy_from_slice(&alt_order);
    }
    Ok(())
}
