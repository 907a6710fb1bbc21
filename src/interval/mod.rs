use std::cmp::Ordering;
use std::fmt;

use crate::depth::Depth;
use crate::error::Result;

mod int_range;

pub use self::int_range::IntRange;

/// A single interval over an ordered domain, or the empty interval.
///
/// The multirange core never looks inside an interval: ordering, overlap,
/// adjacency, union and hashing are all delegated to this trait. The packed
/// form is the interval's in-memory byte image, copied verbatim into the
/// multirange buffer.
pub trait Interval: fmt::Debug + Clone {
    /// Returns `true` for the empty interval.
    fn is_empty(&self) -> bool;

    /// Total order over intervals: by lower bound, then by upper bound.
    fn cmp_bounds(&self, other: &Self) -> Ordering;

    /// Interval equality, consistent with [`Interval::cmp_bounds`].
    fn eq_bounds(&self, other: &Self) -> bool {
        self.cmp_bounds(other) == Ordering::Equal
    }

    /// [`Interval::cmp_bounds`] under a recursion budget.
    ///
    /// Multirange comparison calls this with its own descended [`Depth`].
    /// Interval types whose bounds can themselves hold ranges or multiranges
    /// override it to pass `depth` on to the nested comparison.
    fn cmp_bounds_in(&self, other: &Self, _depth: Depth) -> Result<Ordering> {
        Ok(self.cmp_bounds(other))
    }

    /// [`Interval::eq_bounds`] under a recursion budget.
    fn eq_bounds_in(&self, other: &Self, depth: Depth) -> Result<bool> {
        Ok(self.cmp_bounds_in(other, depth)? == Ordering::Equal)
    }

    /// Returns `true` if both intervals share at least one point.
    fn overlaps(&self, other: &Self) -> bool;

    /// Returns `true` if the intervals touch without overlapping.
    fn adjacent(&self, other: &Self) -> bool;

    /// Union of two intervals that overlap or are adjacent, `self` sorting first.
    fn union(&self, other: &Self) -> Self;

    fn hash32(&self) -> u32;

    fn hash64(&self, seed: u64) -> u64;

    /// Expected size in bytes of the packed form written by
    /// [`Interval::write_packed`], used to size buffers.
    fn packed_size(&self) -> usize;

    /// Appends the packed form to `out`.
    fn write_packed(&self, out: &mut Vec<u8>);

    /// Reads an interval back from exactly the bytes `write_packed` produced.
    fn read_packed(bytes: &[u8]) -> Result<Self>;
}
