use std::cmp::Ordering;

use super::Multirange;
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::interval::Interval;

impl<R: Interval> Multirange<R> {
    fn check_same_type(&self, other: &Self) -> Result<()> {
        if self.type_tag() != other.type_tag() {
            return Err(Error::TypeMismatch { left: self.type_tag(), right: other.type_tag() });
        }
        Ok(())
    }

    /// Returns `true` if both multiranges hold the same intervals.
    ///
    /// Both sides are canonical, so comparing index by index is enough.
    /// Multiranges of different types are a usage error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{Depth, IntRange, Multirange};
    ///
    /// let tag = IntRange::MULTIRANGE_TYPE;
    /// let a = Multirange::from_intervals(tag, vec![IntRange::new(1, 3), IntRange::new(3, 5)]).unwrap();
    /// let b = Multirange::from_interval(tag, IntRange::new(1, 5)).unwrap();
    /// assert!(a.try_eq(&b, Depth::new()).unwrap());
    /// ```
    pub fn try_eq(&self, other: &Self, depth: Depth) -> Result<bool> {
        let depth = depth.descend()?;
        self.check_same_type(other)?;
        if self.len() != other.len() {
            return Ok(false);
        }
        for (a, b) in self.iter().zip(other.iter()) {
            if !a?.eq_bounds_in(&b?, depth)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Total order over multiranges of one type.
    ///
    /// Intervals are compared pairwise in stored order and the first
    /// difference decides. If one side runs out first it sorts first, so a
    /// multirange is greater than any of its proper prefixes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use multirange::{Depth, IntRange, Multirange};
    ///
    /// let tag = IntRange::MULTIRANGE_TYPE;
    /// let a = Multirange::from_interval(tag, IntRange::new(1, 2)).unwrap();
    /// let b = Multirange::from_intervals(tag, vec![IntRange::new(1, 2), IntRange::new(5, 6)]).unwrap();
    /// assert_eq!(a.try_cmp(&b, Depth::new()).unwrap(), Ordering::Less);
    /// ```
    pub fn try_cmp(&self, other: &Self, depth: Depth) -> Result<Ordering> {
        let depth = depth.descend()?;
        self.check_same_type(other)?;
        for (a, b) in self.iter().zip(other.iter()) {
            match a?.cmp_bounds_in(&b?, depth)? {
                Ordering::Equal => continue,
                ordering => return Ok(ordering),
            }
        }
        Ok(self.len().cmp(&other.len()))
    }
}

/// Multiranges of different types are never equal.
impl<R: Interval> PartialEq for Multirange<R> {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_eq(other, Depth::new()), Ok(true))
    }
}

/// Multiranges of different types are incomparable.
impl<R: Interval> PartialOrd for Multirange<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other, Depth::new()).ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{IntRange, TypeTag};

    const TAG: TypeTag = IntRange::MULTIRANGE_TYPE;

    fn mr(ranges: &[(i32, i32)]) -> Multirange<IntRange> {
        Multirange::from_intervals(TAG, ranges.iter().map(|&(l, u)| IntRange::new(l, u))).unwrap()
    }

    fn cmp(a: &Multirange<IntRange>, b: &Multirange<IntRange>) -> Ordering {
        a.try_cmp(b, Depth::new()).unwrap()
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(cmp(&mr(&[(1, 2)]), &mr(&[(1, 2), (5, 6)])), Ordering::Less);
        assert_eq!(cmp(&mr(&[(1, 2), (5, 6)]), &mr(&[(1, 2)])), Ordering::Greater);
        assert_eq!(cmp(&mr(&[]), &mr(&[(1, 2)])), Ordering::Less);
        assert_eq!(cmp(&mr(&[]), &mr(&[])), Ordering::Equal);
    }

    #[test]
    fn first_difference_decides() {
        assert_eq!(cmp(&mr(&[(1, 2)]), &mr(&[(3, 4)])), Ordering::Less);
        assert_eq!(cmp(&mr(&[(1, 2), (9, 10)]), &mr(&[(3, 4)])), Ordering::Less);
        assert_eq!(cmp(&mr(&[(1, 3)]), &mr(&[(1, 2), (5, 6)])), Ordering::Greater);
    }

    #[test]
    fn equality_is_index_wise() {
        assert!(mr(&[(1, 3), (3, 5)]) == mr(&[(1, 5)]));
        assert!(mr(&[(1, 3), (4, 5)]) != mr(&[(1, 5)]));
        assert!(mr(&[(1, 3)]) < mr(&[(1, 5)]));
    }

    #[test]
    fn different_types_are_a_usage_error() {
        let a = mr(&[(1, 2)]);
        let b = Multirange::from_interval(TypeTag(1), IntRange::new(1, 2)).unwrap();
        let err = a.try_eq(&b, Depth::new()).unwrap_err();
        assert!(err.is_usage_error());
        assert!(matches!(a.try_cmp(&b, Depth::new()), Err(Error::TypeMismatch { .. })));
        assert!(a != b);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn depth_guard_trips() {
        let a = mr(&[(1, 2)]);
        assert!(matches!(
            a.try_cmp(&a, Depth::with_limit(0)),
            Err(Error::StackDepthExceeded { .. })
        ));
        assert!(matches!(
            a.try_eq(&a, Depth::with_limit(0)),
            Err(Error::StackDepthExceeded { .. })
        ));
    }

    /// An interval whose bounds compare like nested values: every
    /// comparison spends one level of the budget it is given.
    #[derive(Debug, Clone)]
    struct Nested(IntRange);

    impl Interval for Nested {
        fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        fn cmp_bounds(&self, other: &Self) -> Ordering {
            self.0.cmp_bounds(&other.0)
        }

        fn cmp_bounds_in(&self, other: &Self, depth: Depth) -> Result<Ordering> {
            depth.descend()?;
            Ok(self.cmp_bounds(other))
        }

        fn overlaps(&self, other: &Self) -> bool {
            self.0.overlaps(&other.0)
        }

        fn adjacent(&self, other: &Self) -> bool {
            self.0.adjacent(&other.0)
        }

        fn union(&self, other: &Self) -> Self {
            Nested(self.0.union(&other.0))
        }

        fn hash32(&self) -> u32 {
            self.0.hash32()
        }

        fn hash64(&self, seed: u64) -> u64 {
            self.0.hash64(seed)
        }

        fn packed_size(&self) -> usize {
            self.0.packed_size()
        }

        fn write_packed(&self, out: &mut Vec<u8>) {
            self.0.write_packed(out)
        }

        fn read_packed(bytes: &[u8]) -> Result<Self> {
            IntRange::read_packed(bytes).map(Nested)
        }
    }

    #[test]
    fn interval_comparisons_receive_the_descended_budget() {
        let a = Multirange::from_interval(TAG, Nested(IntRange::new(1, 2))).unwrap();
        let b = Multirange::from_interval(TAG, Nested(IntRange::new(3, 4))).unwrap();

        // one level for the multirange, one for the nested interval
        assert_eq!(a.try_cmp(&b, Depth::with_limit(2)).unwrap(), Ordering::Less);
        assert!(!a.try_eq(&b, Depth::with_limit(2)).unwrap());

        assert!(matches!(
            a.try_cmp(&b, Depth::with_limit(1)),
            Err(Error::StackDepthExceeded { limit: 1 })
        ));
        assert!(matches!(
            a.try_eq(&a, Depth::with_limit(1)),
            Err(Error::StackDepthExceeded { limit: 1 })
        ));

        // the empty multirange has no intervals to descend into
        let empty = Multirange::<Nested>::empty(TAG);
        assert!(empty.try_eq(&empty, Depth::with_limit(1)).unwrap());
    }
}
