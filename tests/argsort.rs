// Integration tests for sequence_argsort: lexicographic order with the
// shorter-prefix-first rule, stability, deep common prefixes, and the tape
// flavors.

use core::ffi::c_void;

use proptest::prelude::*;
use simdbytes::{sequence_argsort, Error, ScratchAllocator, Sequence, Tape32};

fn malloc_alloc() -> ScratchAllocator {
    ScratchAllocator::new_malloc()
}

fn argsort_of(items: &[&[u8]]) -> Vec<usize> {
    let alloc = malloc_alloc();
    let mut order = vec![0usize; items.len()];
    sequence_argsort(&&items[..], &alloc, &mut order).unwrap();
    order
}

/// Reference: stable sort of indices by the element bytes.
fn reference_argsort<T: AsRef<[u8]>>(items: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[a].as_ref().cmp(items[b].as_ref()));
    order
}

// ---------------------------------------------------------------------------
// Basic ordering
// ---------------------------------------------------------------------------

#[test]
fn shorter_prefix_sorts_first_and_ties_stay_stable() {
    // "ban" < "banana" < "banana" < "band": common prefixes rank by the
    // next byte, a strict prefix ranks first, and the two equal elements
    // keep their input order.
    let items: Vec<&[u8]> = vec![b"banana", b"ban", b"band", b"banana"];
    assert_eq!(argsort_of(&items), vec![1, 0, 3, 2]);
}

#[test]
fn empty_strings_rank_first() {
    let items: Vec<&[u8]> = vec![b"b", b"", b"a", b""];
    assert_eq!(argsort_of(&items), vec![1, 3, 2, 0]);
}

#[test]
fn embedded_nul_ranks_above_end_of_string() {
    // "ab" < "ab\0" < "ab\0x" < "aba"
    let items: Vec<&[u8]> = vec![b"ab\0x", b"aba", b"ab", b"ab\0"];
    assert_eq!(argsort_of(&items), vec![2, 3, 0, 1]);
}

#[test]
fn unsigned_byte_order() {
    let items: Vec<&[u8]> = vec![b"\xFF", b"\x00", b"a"];
    assert_eq!(argsort_of(&items), vec![1, 2, 0]);
}

#[test]
fn mismatched_order_array_is_invalid() {
    let items: Vec<&[u8]> = vec![b"a"];
    let mut order = vec![0usize; 2];
    assert_eq!(
        sequence_argsort(&&items[..], &malloc_alloc(), &mut order).unwrap_err(),
        Error::InvalidArgument
    );
}

// ---------------------------------------------------------------------------
// The p-gram rounds (ranges above the direct cutoff)
// ---------------------------------------------------------------------------

#[test]
fn large_input_with_shared_prefixes() {
    // 60 strings sharing an 18-byte prefix force at least two p-gram
    // rounds before any byte can discriminate.
    let items: Vec<Vec<u8>> = (0..60)
        .map(|i| format!("shared-long-prefix:{:04}", (i * 37) % 60).into_bytes())
        .collect();
    let refs: Vec<&[u8]> = items.iter().map(|v| v.as_slice()).collect();
    assert_eq!(argsort_of(&refs), reference_argsort(&items));
}

#[test]
fn large_input_with_duplicates_is_stable() {
    let items: Vec<&[u8]> = (0..80)
        .map(|i| [&b"tick"[..], &b"tock"[..], &b"tick-tock"[..]][i % 3])
        .collect();
    assert_eq!(argsort_of(&items), reference_argsort(&items));
}

#[test]
fn very_deep_common_prefix() {
    // Two multi-kilobyte strings differing only in the last byte, plus
    // enough padding strings to stay above the direct-sort cutoff.
    let mut long_a = vec![b'p'; 4096];
    long_a.push(1);
    let mut long_b = vec![b'p'; 4096];
    long_b.push(2);
    let mut items: Vec<&[u8]> = vec![&long_b, &long_a];
    let filler: Vec<Vec<u8>> = (0..40).map(|i| format!("z{i:02}").into_bytes()).collect();
    items.extend(filler.iter().map(|v| v.as_slice()));
    let order = argsort_of(&items);
    assert_eq!(&order[..2], &[1, 0], "long strings must rank by final byte");
}

// ---------------------------------------------------------------------------
// Tapes
// ---------------------------------------------------------------------------

#[test]
fn tape_sequence_sorts_like_slices() {
    let tape = Tape32::new(b"bananabandban", &[6, 4, 3]).unwrap();
    assert_eq!(tape.get(1), b"band");
    let mut order = vec![0usize; tape.len()];
    sequence_argsort(&tape, &malloc_alloc(), &mut order).unwrap();
    // "ban" < "banana" < "band"
    assert_eq!(order, vec![2, 0, 1]);
}

// ---------------------------------------------------------------------------
// Allocation failure
// ---------------------------------------------------------------------------

#[test]
fn failed_allocation_reports_bad_alloc() {
    unsafe fn no_allocate(_size: usize, _handle: *mut c_void) -> *mut u8 {
        core::ptr::null_mut()
    }
    unsafe fn no_free(_ptr: *mut u8, _size: usize, _handle: *mut c_void) {}
    let failing =
        ScratchAllocator { allocate: no_allocate, free: no_free, handle: core::ptr::null_mut() };

    let items: Vec<Vec<u8>> = (0..100).map(|i| format!("item{i}").into_bytes()).collect();
    let refs: Vec<&[u8]> = items.iter().map(|v| v.as_slice()).collect();
    let mut order = vec![0usize; refs.len()];
    assert_eq!(
        sequence_argsort(&&refs[..], &failing, &mut order).unwrap_err(),
        Error::BadAlloc
    );
}

// ---------------------------------------------------------------------------
// Randomized agreement with the reference
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn agrees_with_stable_index_sort(
        items in proptest::collection::vec(
            proptest::collection::vec(0u8..4, 0..12),
            0..120,
        ),
    ) {
        // Narrow alphabet and short strings maximize shared prefixes and
        // exact duplicates.
        let refs: Vec<&[u8]> = items.iter().map(|v| v.as_slice()).collect();
        prop_assert_eq!(argsort_of(&refs), reference_argsort(&items));
    }
}
