mod canonical;
mod fmt;
mod packed;

// Order of these modules matters as it determines the `impl` blocks order in
// the docs
mod cmp;
mod hash;
mod inherent;
mod iter;
mod serialization;
mod text;

#[cfg(feature = "serde")]
mod serde;

use std::marker::PhantomData;

pub use self::inherent::IntervalArray;
pub use self::iter::Iter;
pub use self::packed::MAXIMUM_ALIGNOF;
pub use self::text::INITIAL_RANGE_CAPACITY;

/// A finite union of disjoint intervals, stored as one immutable packed value.
///
/// The intervals are always kept in canonical form: sorted, pairwise
/// disjoint, never adjacent and never empty. A multirange with no intervals
/// is the empty multirange.
///
/// # Examples
///
/// ```rust
/// use multirange::{IntRange, Multirange};
///
/// let mr = Multirange::from_intervals(
///     IntRange::MULTIRANGE_TYPE,
///     vec![IntRange::new(5, 6), IntRange::new(1, 3), IntRange::new(3, 5), IntRange::empty()],
/// )
/// .unwrap();
///
/// assert_eq!(mr.len(), 1);
/// assert_eq!(mr.deserialize().unwrap(), vec![IntRange::new(1, 6)]);
/// ```
pub struct Multirange<R> {
    data: Box<[u8]>,
    // start of each interval slot in `data`
    offsets: Box<[usize]>,
    _interval: PhantomData<fn() -> R>,
}

impl<R> Clone for Multirange<R> {
    fn clone(&self) -> Self {
        Multirange { data: self.data.clone(), offsets: self.offsets.clone(), _interval: PhantomData }
    }
}
