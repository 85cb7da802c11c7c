//! Multiset intersection of two string sequences.
//!
//! An open-addressed table (linear probing, load factor ≤ ½) is built over
//! the smaller sequence, keyed by the core hash under a caller-supplied seed
//! so table shapes are unpredictable across runs. The larger sequence then
//! probes; every fingerprint hit is confirmed with a full byte compare
//! before a pair is emitted. Duplicate elements occupy one slot per
//! occurrence and pair first-in-first-out, so each value contributes
//! `min(multiplicity_A, multiplicity_B)` pairs.

use crate::alloc::{ScratchAllocator, ScratchVec};
use crate::hash;
use crate::seq::Sequence;
use crate::sort;
use crate::types::Error;

/// One table entry. `idx_plus_one == 0` marks an empty slot; `consumed`
/// marks an occurrence already paired with a probe element.
#[derive(Clone, Copy)]
struct Slot {
    fingerprint: u64,
    idx_plus_one: usize,
    consumed: bool,
}

/// Intersects `a` and `b`, writing aligned position pairs.
///
/// Returns `k`, the number of pairs; for each `i < k`,
/// `a.get(a_pos[i]) == b.get(b_pos[i])` byte-for-byte. Pairs are emitted in
/// ascending `a_pos` order. Both output arrays must hold at least
/// `min(a.len(), b.len())` entries.
pub fn sequence_intersect(
    a: &dyn Sequence,
    b: &dyn Sequence,
    alloc: &ScratchAllocator,
    seed: u64,
    a_pos: &mut [usize],
    b_pos: &mut [usize],
) -> Result<usize, Error> {
    let cap = a.len().min(b.len());
    if a_pos.len() < cap || b_pos.len() < cap {
        return Err(Error::InvalidArgument);
    }
    if cap == 0 {
        return Ok(0);
    }

    let a_is_table = a.len() <= b.len();
    let (table_seq, probe_seq) = if a_is_table { (a, b) } else { (b, a) };

    let slots_len = (table_seq.len() * 2).next_power_of_two().max(4);
    let mask = slots_len - 1;
    let mut slots: ScratchVec<Slot> = ScratchVec::new(alloc, slots_len)?;

    for i in 0..table_seq.len() {
        let fingerprint = hash::hash(table_seq.get(i), seed);
        let mut j = fingerprint as usize & mask;
        while slots[j].idx_plus_one != 0 {
            j = (j + 1) & mask;
        }
        slots[j] = Slot { fingerprint, idx_plus_one: i + 1, consumed: false };
    }

    let mut k = 0usize;
    for p in 0..probe_seq.len() {
        let elem = probe_seq.get(p);
        let fingerprint = hash::hash(elem, seed);
        let mut j = fingerprint as usize & mask;
        loop {
            let slot = slots[j];
            if slot.idx_plus_one == 0 {
                break;
            }
            if slot.fingerprint == fingerprint && !slot.consumed {
                let t = slot.idx_plus_one - 1;
                if table_seq.get(t) == elem {
                    slots[j].consumed = true;
                    if a_is_table {
                        a_pos[k] = t;
                        b_pos[k] = p;
                    } else {
                        a_pos[k] = p;
                        b_pos[k] = t;
                    }
                    k += 1;
                    break;
                }
            }
            j = (j + 1) & mask;
        }
    }

    // When A was the probe side the pairs are already in ascending A order;
    // otherwise restore the canonical ordering with a stable permutation
    // pass over the emitted positions.
    if a_is_table && k > 1 {
        let mut keys: ScratchVec<u64> = ScratchVec::new(alloc, k)?;
        let mut perm: ScratchVec<usize> = ScratchVec::new(alloc, k)?;
        let mut paired: ScratchVec<usize> = ScratchVec::new(alloc, k)?;
        for i in 0..k {
            keys[i] = a_pos[i] as u64;
        }
        sort::pgrams_sort(&mut keys, alloc, &mut perm)?;
        for i in 0..k {
            paired[i] = a_pos[perm[i]];
        }
        a_pos[..k].copy_from_slice(&paired);
        for i in 0..k {
            paired[i] = b_pos[perm[i]];
        }
        b_pos[..k].copy_from_slice(&paired);
    }
    Ok(k)
}
