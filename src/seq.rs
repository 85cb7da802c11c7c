//! Sequences of variable-length byte strings, as seen by the sort and
//! intersect kernels.
//!
//! The kernels only need indexed access — a count and the i-th element — so
//! the boundary is an object-safe trait rather than a concrete container.
//! Two concrete "tape" flavors are provided for columnar callers: a shared
//! data buffer plus a parallel array of 32- or 64-bit lengths, with element
//! boundaries derived by prefix sum at construction time.

use crate::types::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────────────────────────────────────

/// An indexed collection of byte spans.
///
/// Implementations must return a stable view for each index for the duration
/// of a kernel call; `get(i)` with `i >= len()` may panic.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// The `i`-th element.
    fn get(&self, i: usize) -> &[u8];

    /// True when the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Any slice of byte-string-like values is a sequence.
impl<'a, T: AsRef<[u8]>> Sequence for &'a [T] {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn get(&self, i: usize) -> &[u8] {
        self[i].as_ref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tapes
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! define_tape {
    ($(#[$doc:meta])* $name:ident, $len_ty:ty) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name<'a> {
            data: &'a [u8],
            offsets: Vec<usize>,
        }

        impl<'a> $name<'a> {
            /// Builds a tape over `data` split by `lengths`.
            ///
            /// The lengths must sum to exactly `data.len()`; otherwise the
            /// tape is rejected with [`Error::InvalidArgument`].
            pub fn new(data: &'a [u8], lengths: &[$len_ty]) -> Result<Self, Error> {
                let mut offsets = Vec::with_capacity(lengths.len() + 1);
                let mut total: usize = 0;
                offsets.push(0);
                for &len in lengths {
                    total = total
                        .checked_add(len as usize)
                        .ok_or(Error::InvalidArgument)?;
                    offsets.push(total);
                }
                if total != data.len() {
                    return Err(Error::InvalidArgument);
                }
                Ok($name { data, offsets })
            }
        }

        impl Sequence for $name<'_> {
            #[inline]
            fn len(&self) -> usize {
                self.offsets.len() - 1
            }

            #[inline]
            fn get(&self, i: usize) -> &[u8] {
                &self.data[self.offsets[i]..self.offsets[i + 1]]
            }
        }
    };
}

define_tape!(
    /// A tape with 32-bit per-element lengths.
    Tape32,
    u32
);
define_tape!(
    /// A tape with 64-bit per-element lengths.
    Tape64,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tape32_elements_follow_prefix_sums() {
        let tape = Tape32::new(b"bananaband", &[6, 3, 1]).unwrap();
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.get(0), b"banana");
        assert_eq!(tape.get(1), b"ban");
        assert_eq!(tape.get(2), b"d");
    }

    #[test]
    fn tape_rejects_inconsistent_lengths() {
        assert_eq!(
            Tape64::new(b"abc", &[1, 1]).unwrap_err(),
            Error::InvalidArgument
        );
        assert_eq!(
            Tape32::new(b"abc", &[2, 2]).unwrap_err(),
            Error::InvalidArgument
        );
    }

    #[test]
    fn tape_supports_empty_elements() {
        let tape = Tape32::new(b"xy", &[0, 1, 0, 1, 0]).unwrap();
        assert_eq!(tape.len(), 5);
        assert_eq!(tape.get(0), b"");
        assert_eq!(tape.get(1), b"x");
        assert_eq!(tape.get(2), b"");
        assert_eq!(tape.get(3), b"y");
        assert_eq!(tape.get(4), b"");
    }
}
